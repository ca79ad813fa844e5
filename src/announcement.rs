//! # Announcement Renderer
//!
//! Builds the "Ring the Bell" announcement in Telegram HTML mode. Every
//! free-text field is escaped before it is placed inside markup so user text
//! can never open, close or inject tags.

use teloxide::utils::html;

use crate::dialogue::Announcement;
use crate::messages::Messages;

/// Render the announcement body for a completed submission
pub fn render_announcement(announcement: &Announcement, messages: &Messages) -> String {
    let update_type = announcement.update_type;
    let shipped_by = messages.get_with_args(
        "announcement-shipped-by",
        &[("submitter", &html::escape(&announcement.submitter.display_name))],
    );

    format!(
        "{}\n\n{} {}\n\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}",
        messages.get("announcement-banner"),
        update_type.emoji(),
        html::bold(update_type.label()),
        html::bold(&html::escape(&announcement.feature_name)),
        messages.get("announcement-what-it-does"),
        html::escape(&announcement.description),
        messages.get("announcement-whats-new"),
        html::escape(&announcement.improvements),
        html::italic(&shipped_by),
    )
}

/// Render the preview shown to the submitter before publishing
pub fn render_preview(announcement: &Announcement, messages: &Messages) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        messages.get("preview-title"),
        render_announcement(announcement, messages),
        messages.get("preview-question"),
        messages.get("preview-hint"),
    )
}
