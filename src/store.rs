//! Keyed, in-process conversation state.
//!
//! Each identity owns one entry behind its own mutex: locking it is what
//! serializes events from the same user, while users never contend with each
//! other beyond the brief map lookup. Everything here is transient; losing it
//! on restart is accepted behavior.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::event::UserIdentity;
use crate::machine::{RegistrationRecord, RegistrationState};

/// One user's in-flight registration.
#[derive(Debug, Default)]
pub struct Conversation {
    pub state: RegistrationState,
    pub record: RegistrationRecord,
}

#[derive(Default)]
pub struct ConversationStore {
    entries: Mutex<HashMap<UserIdentity, Arc<Mutex<Conversation>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the entry for `identity`, creating an idle one if absent.
    /// Callers hold the returned entry's lock for the whole event.
    pub async fn entry(&self, identity: UserIdentity) -> Arc<Mutex<Conversation>> {
        let mut entries = self.entries.lock().await;
        entries.entry(identity).or_default().clone()
    }

    /// Drop the entry outright. Used at completion; the identity lives on in
    /// the completed set only.
    pub async fn clear(&self, identity: UserIdentity) {
        self.entries.lock().await.remove(&identity);
    }

    /// Remove the entry if the conversation never left `Idle` and nothing
    /// else holds it, so stray contacts or stale button presses leave no
    /// state behind. An entry another task has already fetched is kept:
    /// evicting it would orphan that task's writes.
    pub async fn discard_if_idle(&self, identity: UserIdentity) {
        let mut entries = self.entries.lock().await;
        let discard = match entries.get(&identity) {
            Some(entry) => {
                Arc::strong_count(entry) == 1
                    && entry
                        .try_lock()
                        .map(|convo| convo.state == RegistrationState::Idle)
                        .unwrap_or(false)
            }
            None => false,
        };
        if discard {
            entries.remove(&identity);
        }
    }

    /// Peek at a conversation's current state, if any. Test/diagnostic aid;
    /// event handling goes through [`ConversationStore::entry`].
    pub async fn current_state(&self, identity: UserIdentity) -> Option<RegistrationState> {
        let entry = {
            let entries = self.entries.lock().await;
            entries.get(&identity).cloned()
        };
        match entry {
            Some(entry) => Some(entry.lock().await.state),
            None => None,
        }
    }
}

/// Identities whose registration has been finalized. Outlives the
/// conversation entry; insertion is permanent for the process lifetime.
#[derive(Default)]
pub struct CompletedSet {
    inner: RwLock<HashSet<UserIdentity>>,
}

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, identity: UserIdentity) {
        self.inner.write().await.insert(identity);
    }

    pub async fn contains(&self, identity: UserIdentity) -> bool {
        self.inner.read().await.contains(&identity)
    }
}
