//! Dialogue Manager module driving the announcement form.
//!
//! [`FormController`] owns the session store and turns each [`Inbound`] event
//! into a list of [`Effect`]s for the transport to carry out. It never talks
//! to Telegram itself, so the whole state machine runs without a network.

use teloxide::types::MessageId;
use teloxide::utils::html;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use super::commands::{is_command_like, Command};
use super::input::{Decision, Inbound, Input};
use super::ui_builder::{format_update_type_menu, Keyboard};
use crate::announcement::{render_announcement, render_preview};
use crate::dialogue::{validate_answer, ConversationKey, Step, Submission, Submitter};
use crate::error::AnswerError;
use crate::messages::Messages;
use crate::session_store::{InMemorySessionStore, SessionStore};
use crate::update_type::UpdateType;

/// Where an outbound message is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The chat the event came from
    Origin,
    /// The configured announcement chat, or the origin when none is set
    Broadcast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub destination: Destination,
    /// Telegram HTML text
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub reply_to: Option<MessageId>,
}

/// Side effect requested by a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Send(Outbound),
    /// Broadcast the announcement. The submission stays in the confirmation
    /// step until the transport reports the send through
    /// [`FormController::complete_publish`] or [`FormController::publish_failed`].
    Publish(Outbound),
    /// Remove the inline buttons from a message in the origin chat
    ClearKeyboard { message_id: MessageId },
}

impl Effect {
    pub fn as_send(&self) -> Option<&Outbound> {
        match self {
            Effect::Send(outbound) | Effect::Publish(outbound) => Some(outbound),
            Effect::ClearKeyboard { .. } => None,
        }
    }
}

/// What happens to the stored submission after a transition
#[derive(Debug)]
enum Next {
    Keep,
    /// Kept until the broadcast outcome is known
    AwaitBroadcast,
    Save(Submission),
    Finish,
}

/// An answer to the current step, typed or pressed
#[derive(Clone, Copy, Debug)]
enum Answer<'a> {
    Typed(&'a str),
    Pressed {
        token: &'a str,
        keyboard_message: Option<MessageId>,
    },
}

impl<'a> Answer<'a> {
    fn token(self) -> &'a str {
        match self {
            Answer::Typed(text) => text,
            Answer::Pressed { token, .. } => token,
        }
    }

    fn keyboard_message(self) -> Option<MessageId> {
        match self {
            Answer::Typed(_) => None,
            Answer::Pressed {
                keyboard_message, ..
            } => keyboard_message,
        }
    }
}

/// Conversation state machine for the announcement form
pub struct FormController<S = InMemorySessionStore> {
    store: S,
    messages: Messages,
}

impl<S: SessionStore> FormController<S> {
    pub fn new(store: S, messages: Messages) -> Self {
        Self { store, messages }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Apply one inbound event and return the effects to deliver.
    ///
    /// Events are handled by a single ordered chain: commands first, then
    /// unrecognised commands (dropped), then answers to an active session.
    /// Callers must not run two events for the same key concurrently.
    pub fn handle(&self, inbound: &Inbound) -> Vec<Effect> {
        match &inbound.input {
            Input::Command(command) => self.handle_command(*command, inbound),
            Input::Text(text) if is_command_like(text) => {
                debug!(
                    chat_id = %inbound.key.chat_id,
                    user_id = %inbound.key.user_id,
                    "Ignoring unrecognised command"
                );
                Vec::new()
            }
            Input::Text(text) => self.handle_answer(inbound, Answer::Typed(text)),
            Input::Selection {
                token,
                keyboard_message,
            } => self.handle_answer(
                inbound,
                Answer::Pressed {
                    token,
                    keyboard_message: *keyboard_message,
                },
            ),
        }
    }

    fn handle_command(&self, command: Command, inbound: &Inbound) -> Vec<Effect> {
        let key = inbound.key;
        match command {
            Command::RingTheBell => {
                let submitter = Submitter {
                    display_name: inbound.sender_name.clone(),
                    submitted_at: inbound.received_at,
                };
                let restarted = self.store.get(&key).is_some();
                self.store.set(key, Submission::start(submitter));
                info!(
                    chat_id = %key.chat_id,
                    user_id = %key.user_id,
                    restarted,
                    "Announcement form started"
                );

                let text = format!(
                    "{}\n\n{}\n\n{}",
                    self.messages.get("form-start-title"),
                    self.messages.get("form-start-intro"),
                    self.messages.get("prompt-feature-name"),
                );
                vec![self.reply(inbound, text, None)]
            }
            Command::Cancel => match self.store.delete(&key) {
                Some(submission) => {
                    info!(
                        chat_id = %key.chat_id,
                        user_id = %key.user_id,
                        step = ?submission.step(),
                        "Announcement form cancelled"
                    );
                    vec![self.reply(inbound, self.messages.get("cancelled"), None)]
                }
                None => {
                    debug!(chat_id = %key.chat_id, user_id = %key.user_id, "Nothing to cancel");
                    Vec::new()
                }
            },
            Command::Help => {
                let text = format!(
                    "{}\n\n{}\n\n{}",
                    self.messages.get("help-title"),
                    self.messages.get("help-description"),
                    html::escape(&Command::descriptions().to_string()),
                );
                vec![self.reply(inbound, text, None)]
            }
        }
    }

    fn handle_answer(&self, inbound: &Inbound, answer: Answer<'_>) -> Vec<Effect> {
        let key = inbound.key;
        let Some(submission) = self.store.get(&key) else {
            debug!(chat_id = %key.chat_id, user_id = %key.user_id, "No active submission, ignoring");
            return Vec::new();
        };

        let step = submission.step();
        let (next, effects) = self.transition(submission, answer, inbound);
        self.apply(key, step, next);
        effects
    }

    fn apply(&self, key: ConversationKey, from: Step, next: Next) {
        match next {
            Next::Keep => {
                debug!(chat_id = %key.chat_id, user_id = %key.user_id, step = ?from, "Answer rejected");
            }
            Next::AwaitBroadcast => {
                debug!(chat_id = %key.chat_id, user_id = %key.user_id, "Waiting for broadcast");
            }
            Next::Save(submission) => {
                debug!(
                    chat_id = %key.chat_id,
                    user_id = %key.user_id,
                    from = ?from,
                    to = ?submission.step(),
                    "Submission advanced"
                );
                self.store.set(key, submission);
            }
            Next::Finish => {
                self.store.delete(&key);
            }
        }
    }

    /// Total transition function over (current step, answer)
    fn transition(
        &self,
        submission: Submission,
        answer: Answer<'_>,
        inbound: &Inbound,
    ) -> (Next, Vec<Effect>) {
        match submission.step() {
            Step::AwaitingFeatureName | Step::AwaitingDescription | Step::AwaitingImprovements => {
                self.transition_text(submission, answer, inbound)
            }
            Step::AwaitingType => self.transition_type(submission, answer, inbound),
            Step::AwaitingConfirmation => self.transition_confirmation(submission, answer, inbound),
        }
    }

    fn transition_text(
        &self,
        submission: Submission,
        answer: Answer<'_>,
        inbound: &Inbound,
    ) -> (Next, Vec<Effect>) {
        let Answer::Typed(text) = answer else {
            // Buttons from an older prompt carry no free-text answer.
            return (Next::Keep, Vec::new());
        };

        let step = submission.step();
        let limit = step.answer_limit().unwrap_or(usize::MAX);
        let answer = match validate_answer(text, limit) {
            Ok(answer) => answer,
            Err(AnswerError::Empty) => return (Next::Keep, vec![self.prompt(step, inbound)]),
            Err(AnswerError::TooLong { max }) => {
                let text = self
                    .messages
                    .get_with_args("answer-too-long", &[("max", &max.to_string())]);
                return (Next::Keep, vec![self.reply(inbound, text, None)]);
            }
        };

        match submission.answer_text(answer) {
            Ok(next) => {
                let effect = self.prompt(next.step(), inbound);
                (Next::Save(next), vec![effect])
            }
            Err(_) => (Next::Keep, Vec::new()),
        }
    }

    fn transition_type(
        &self,
        submission: Submission,
        answer: Answer<'_>,
        inbound: &Inbound,
    ) -> (Next, Vec<Effect>) {
        let Some(update_type) = UpdateType::from_token(answer.token()) else {
            let effect = self.reply(inbound, self.messages.get("type-invalid"), None);
            return (Next::Keep, vec![effect]);
        };

        match submission.select_type(update_type) {
            Ok(next) => {
                let mut effects = clear_keyboard(answer);
                if let Submission::AwaitingConfirmation { announcement } = &next {
                    effects.push(self.reply(
                        inbound,
                        render_preview(announcement, &self.messages),
                        Some(Keyboard::Confirmation),
                    ));
                }
                (Next::Save(next), effects)
            }
            Err(_) => (Next::Keep, Vec::new()),
        }
    }

    fn transition_confirmation(
        &self,
        submission: Submission,
        answer: Answer<'_>,
        inbound: &Inbound,
    ) -> (Next, Vec<Effect>) {
        let Submission::AwaitingConfirmation { announcement } = submission else {
            return (Next::Keep, Vec::new());
        };

        let key = inbound.key;
        match Decision::parse(answer.token()) {
            Some(Decision::Publish) => {
                info!(
                    chat_id = %key.chat_id,
                    user_id = %key.user_id,
                    feature = %announcement.feature_name,
                    update_type = ?announcement.update_type,
                    started_at = %announcement.submitter.submitted_at,
                    "Publishing announcement"
                );
                let mut effects = clear_keyboard(answer);
                effects.push(Effect::Publish(Outbound {
                    destination: Destination::Broadcast,
                    text: render_announcement(&announcement, &self.messages),
                    keyboard: None,
                    reply_to: None,
                }));
                (Next::AwaitBroadcast, effects)
            }
            Some(Decision::Discard) => {
                info!(chat_id = %key.chat_id, user_id = %key.user_id, "Announcement discarded");
                let mut effects = clear_keyboard(answer);
                effects.push(self.reply(inbound, self.messages.get("cancelled"), None));
                (Next::Finish, effects)
            }
            None => {
                let effect = self.reply(inbound, self.messages.get("confirm-invalid"), None);
                (Next::Keep, vec![effect])
            }
        }
    }

    /// Finish the submission whose [`Effect::Publish`] was delivered.
    ///
    /// Returns the success notice, or `None` when no submission is pending.
    pub fn complete_publish(&self, inbound: &Inbound) -> Option<Outbound> {
        let key = inbound.key;
        self.store.delete(&key)?;
        info!(chat_id = %key.chat_id, user_id = %key.user_id, "Announcement published");
        Some(self.notice(inbound, "published"))
    }

    /// Keep the submission whose [`Effect::Publish`] could not be delivered so
    /// the submitter can confirm again.
    pub fn publish_failed(&self, inbound: &Inbound) -> Outbound {
        let key = inbound.key;
        warn!(
            chat_id = %key.chat_id,
            user_id = %key.user_id,
            step = ?self.store.get(&key).map(|submission| submission.step()),
            "Announcement not delivered, submission kept"
        );
        Outbound {
            keyboard: Some(Keyboard::Confirmation),
            ..self.notice(inbound, "publish-failed")
        }
    }

    fn notice(&self, inbound: &Inbound, key: &str) -> Outbound {
        Outbound {
            destination: Destination::Origin,
            text: self.messages.get(key),
            keyboard: None,
            reply_to: inbound.reply_to,
        }
    }

    /// Prompt asking for the answer `step` waits on
    fn prompt(&self, step: Step, inbound: &Inbound) -> Effect {
        match step {
            Step::AwaitingFeatureName => {
                self.reply(inbound, self.messages.get("prompt-feature-name"), None)
            }
            Step::AwaitingDescription => {
                self.reply(inbound, self.messages.get("prompt-description"), None)
            }
            Step::AwaitingImprovements => {
                self.reply(inbound, self.messages.get("prompt-improvements"), None)
            }
            Step::AwaitingType | Step::AwaitingConfirmation => {
                let text = format!(
                    "{}\n\n{}\n{}",
                    self.messages.get("prompt-type"),
                    self.messages.get("prompt-type-hint"),
                    format_update_type_menu(),
                );
                self.reply(inbound, text, Some(Keyboard::UpdateTypes))
            }
        }
    }

    fn reply(&self, inbound: &Inbound, text: String, keyboard: Option<Keyboard>) -> Effect {
        Effect::Send(Outbound {
            destination: Destination::Origin,
            text,
            keyboard,
            reply_to: inbound.reply_to,
        })
    }
}

fn clear_keyboard(answer: Answer<'_>) -> Vec<Effect> {
    answer
        .keyboard_message()
        .map(|message_id| Effect::ClearKeyboard { message_id })
        .into_iter()
        .collect()
}
