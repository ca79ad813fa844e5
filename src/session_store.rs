//! # Session Store Module
//!
//! Keeps in-progress submissions keyed by conversation identity. Entries live
//! only in memory; nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::dialogue::{ConversationKey, Submission};

/// Storage for in-progress submissions.
///
/// Every operation is atomic for a single key. Ordering between operations on
/// the same key is the caller's responsibility.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &ConversationKey) -> Option<Submission>;

    /// Insert or overwrite the submission for `key`
    fn set(&self, key: ConversationKey, submission: Submission);

    /// Remove the submission for `key`, returning it if one existed
    fn delete(&self, key: &ConversationKey) -> Option<Submission>;
}

/// Process-local session store backed by a `HashMap`.
///
/// No eviction and no TTL: a stalled conversation stays until it is
/// cancelled, completed, restarted or the process exits.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<ConversationKey, Submission>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every pending submission
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ConversationKey, Submission>> {
        // The map holds plain data; a panic mid-operation cannot leave it torn.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &ConversationKey) -> Option<Submission> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: ConversationKey, submission: Submission) {
        self.lock().insert(key, submission);
    }

    fn delete(&self, key: &ConversationKey) -> Option<Submission> {
        self.lock().remove(key)
    }
}
