//! Announcement dialogue module holding the per-user form state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::{ChatId, UserId};

use crate::error::AnswerError;
use crate::update_type::UpdateType;

/// Longest accepted feature name, in characters
pub const MAX_FEATURE_NAME_LEN: usize = 255;
/// Longest accepted description or improvements answer, in characters.
/// Together with [`MAX_FEATURE_NAME_LEN`] this keeps the rendered preview
/// inside Telegram's message length limit.
pub const MAX_DETAIL_LEN: usize = 1500;

/// Identifies one participant's form within one chat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl ConversationKey {
    pub fn new(chat_id: ChatId, user_id: UserId) -> Self {
        Self { chat_id, user_id }
    }
}

/// Who started the submission and when
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    /// `@username` when available, otherwise the full name
    pub display_name: String,
    pub submitted_at: DateTime<Utc>,
}

/// A fully answered form, ready for preview and publishing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub submitter: Submitter,
    pub feature_name: String,
    pub description: String,
    pub improvements: String,
    pub update_type: UpdateType,
}

/// Position in the fixed form sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    AwaitingFeatureName,
    AwaitingDescription,
    AwaitingImprovements,
    AwaitingType,
    AwaitingConfirmation,
}

impl Step {
    /// Character limit for the free-text answer this step waits on
    pub fn answer_limit(self) -> Option<usize> {
        match self {
            Step::AwaitingFeatureName => Some(MAX_FEATURE_NAME_LEN),
            Step::AwaitingDescription | Step::AwaitingImprovements => Some(MAX_DETAIL_LEN),
            Step::AwaitingType | Step::AwaitingConfirmation => None,
        }
    }
}

/// Represents an in-progress submission.
///
/// Each variant carries exactly the answers collected before it, so a field
/// cannot be read before its step has been passed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    AwaitingFeatureName {
        submitter: Submitter,
    },
    AwaitingDescription {
        submitter: Submitter,
        feature_name: String,
    },
    AwaitingImprovements {
        submitter: Submitter,
        feature_name: String,
        description: String,
    },
    AwaitingType {
        submitter: Submitter,
        feature_name: String,
        description: String,
        improvements: String,
    },
    AwaitingConfirmation {
        announcement: Announcement,
    },
}

impl Submission {
    /// Fresh submission waiting for the feature name
    pub fn start(submitter: Submitter) -> Self {
        Submission::AwaitingFeatureName { submitter }
    }

    pub fn step(&self) -> Step {
        match self {
            Submission::AwaitingFeatureName { .. } => Step::AwaitingFeatureName,
            Submission::AwaitingDescription { .. } => Step::AwaitingDescription,
            Submission::AwaitingImprovements { .. } => Step::AwaitingImprovements,
            Submission::AwaitingType { .. } => Step::AwaitingType,
            Submission::AwaitingConfirmation { .. } => Step::AwaitingConfirmation,
        }
    }

    pub fn submitter(&self) -> &Submitter {
        match self {
            Submission::AwaitingFeatureName { submitter }
            | Submission::AwaitingDescription { submitter, .. }
            | Submission::AwaitingImprovements { submitter, .. }
            | Submission::AwaitingType { submitter, .. } => submitter,
            Submission::AwaitingConfirmation { announcement } => &announcement.submitter,
        }
    }

    pub fn feature_name(&self) -> Option<&str> {
        match self {
            Submission::AwaitingFeatureName { .. } => None,
            Submission::AwaitingDescription { feature_name, .. }
            | Submission::AwaitingImprovements { feature_name, .. }
            | Submission::AwaitingType { feature_name, .. } => Some(feature_name),
            Submission::AwaitingConfirmation { announcement } => Some(&announcement.feature_name),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Submission::AwaitingImprovements { description, .. }
            | Submission::AwaitingType { description, .. } => Some(description),
            Submission::AwaitingConfirmation { announcement } => Some(&announcement.description),
            _ => None,
        }
    }

    pub fn improvements(&self) -> Option<&str> {
        match self {
            Submission::AwaitingType { improvements, .. } => Some(improvements),
            Submission::AwaitingConfirmation { announcement } => Some(&announcement.improvements),
            _ => None,
        }
    }

    pub fn update_type(&self) -> Option<UpdateType> {
        match self {
            Submission::AwaitingConfirmation { announcement } => Some(announcement.update_type),
            _ => None,
        }
    }

    /// Record a free-text answer for the current step.
    ///
    /// Only the three text steps accept an answer; any other step hands the
    /// submission back unchanged in `Err`.
    pub fn answer_text(self, answer: String) -> Result<Submission, Submission> {
        match self {
            Submission::AwaitingFeatureName { submitter } => Ok(Submission::AwaitingDescription {
                submitter,
                feature_name: answer,
            }),
            Submission::AwaitingDescription {
                submitter,
                feature_name,
            } => Ok(Submission::AwaitingImprovements {
                submitter,
                feature_name,
                description: answer,
            }),
            Submission::AwaitingImprovements {
                submitter,
                feature_name,
                description,
            } => Ok(Submission::AwaitingType {
                submitter,
                feature_name,
                description,
                improvements: answer,
            }),
            other => Err(other),
        }
    }

    /// Record the update type, completing the form
    pub fn select_type(self, update_type: UpdateType) -> Result<Submission, Submission> {
        match self {
            Submission::AwaitingType {
                submitter,
                feature_name,
                description,
                improvements,
            } => Ok(Submission::AwaitingConfirmation {
                announcement: Announcement {
                    submitter,
                    feature_name,
                    description,
                    improvements,
                    update_type,
                },
            }),
            other => Err(other),
        }
    }
}

/// Validates a free-text answer of at most `max_chars` characters
pub fn validate_answer(text: &str, max_chars: usize) -> Result<String, AnswerError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(AnswerError::Empty);
    }

    if trimmed.chars().count() > max_chars {
        return Err(AnswerError::TooLong { max: max_chars });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submitter() -> Submitter {
        Submitter {
            display_name: "@alice".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_answers_advance_in_order() {
        let submission = Submission::start(submitter());
        assert_eq!(submission.step(), Step::AwaitingFeatureName);
        assert_eq!(submission.feature_name(), None);

        let submission = submission.answer_text("Dark Mode".into()).unwrap();
        assert_eq!(submission.step(), Step::AwaitingDescription);
        assert_eq!(submission.feature_name(), Some("Dark Mode"));
        assert_eq!(submission.description(), None);

        let submission = submission.answer_text("Adds a dark theme".into()).unwrap();
        let submission = submission.answer_text("Less eye strain".into()).unwrap();
        assert_eq!(submission.step(), Step::AwaitingType);
        assert_eq!(submission.improvements(), Some("Less eye strain"));
        assert_eq!(submission.update_type(), None);

        let submission = submission.select_type(UpdateType::BugFix).unwrap();
        assert_eq!(submission.step(), Step::AwaitingConfirmation);
        assert_eq!(submission.update_type(), Some(UpdateType::BugFix));
        assert_eq!(submission.description(), Some("Adds a dark theme"));
        assert_eq!(submission.submitter().display_name, "@alice");
    }

    #[test]
    fn test_text_rejected_outside_text_steps() {
        let awaiting_type = Submission::AwaitingType {
            submitter: submitter(),
            feature_name: "A".into(),
            description: "B".into(),
            improvements: "C".into(),
        };
        let rejected = awaiting_type.clone().answer_text("x".into()).unwrap_err();
        assert_eq!(rejected, awaiting_type);
    }

    #[test]
    fn test_type_rejected_before_type_step() {
        let submission = Submission::start(submitter());
        let rejected = submission
            .clone()
            .select_type(UpdateType::NewFeature)
            .unwrap_err();
        assert_eq!(rejected, submission);
    }

    #[test]
    fn test_steps_are_ordered() {
        assert!(Step::AwaitingFeatureName < Step::AwaitingDescription);
        assert!(Step::AwaitingType < Step::AwaitingConfirmation);
    }

    #[test]
    fn test_answer_validation() {
        assert_eq!(validate_answer("  Dark Mode ", 255), Ok("Dark Mode".to_string()));
        assert_eq!(validate_answer("", 255), Err(AnswerError::Empty));
        assert_eq!(validate_answer(" \n\t ", 255), Err(AnswerError::Empty));
    }

    #[test]
    fn test_answer_length_limit() {
        assert!(validate_answer(&"a".repeat(255), 255).is_ok());
        assert_eq!(
            validate_answer(&"a".repeat(256), 255),
            Err(AnswerError::TooLong { max: 255 })
        );
        // Counted in characters, not bytes
        assert!(validate_answer(&"🚀".repeat(255), 255).is_ok());
        // Surrounding whitespace does not count
        assert!(validate_answer(&format!("  {}  ", "a".repeat(255)), 255).is_ok());
    }

    #[test]
    fn test_answer_limits_per_step() {
        assert_eq!(Step::AwaitingFeatureName.answer_limit(), Some(MAX_FEATURE_NAME_LEN));
        assert_eq!(Step::AwaitingDescription.answer_limit(), Some(MAX_DETAIL_LEN));
        assert_eq!(Step::AwaitingImprovements.answer_limit(), Some(MAX_DETAIL_LEN));
        assert_eq!(Step::AwaitingType.answer_limit(), None);
    }
}
