//! Update-type classification for announcements.

use serde::{Deserialize, Serialize};

/// The kind of update being announced.
///
/// Selection happens by literal token (`"1"` to `"4"`), either typed by the
/// user or carried by an inline keyboard button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    NewFeature,
    BugFix,
    Improvement,
    Maintenance,
}

impl UpdateType {
    /// All variants in menu order
    pub const ALL: [UpdateType; 4] = [
        UpdateType::NewFeature,
        UpdateType::BugFix,
        UpdateType::Improvement,
        UpdateType::Maintenance,
    ];

    /// Human readable label shown in previews and announcements
    pub fn label(self) -> &'static str {
        match self {
            UpdateType::NewFeature => "New Feature",
            UpdateType::BugFix => "Bug Fix",
            UpdateType::Improvement => "Improvement",
            UpdateType::Maintenance => "Maintenance",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            UpdateType::NewFeature => "🚀",
            UpdateType::BugFix => "🐛",
            UpdateType::Improvement => "⚡",
            UpdateType::Maintenance => "🔧",
        }
    }

    /// Selection token for this variant
    pub fn token(self) -> &'static str {
        match self {
            UpdateType::NewFeature => "1",
            UpdateType::BugFix => "2",
            UpdateType::Improvement => "3",
            UpdateType::Maintenance => "4",
        }
    }

    /// Resolve a selection token, ignoring surrounding whitespace.
    ///
    /// Returns `None` for anything outside the four known tokens.
    pub fn from_token(input: &str) -> Option<Self> {
        let token = input.trim();
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }
}
