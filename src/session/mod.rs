//! Chat session context
//!
//! All mutable per-process state lives in one [`ChatSession`] owned by the
//! caller and handed to each pipeline stage by reference. Nothing is global,
//! so several sessions can coexist in one process.

pub mod history;
pub mod state;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{ChatError, Result};
use crate::memory::{KnowledgeBase, KnowledgeStore, LearnedResponses, LoadStatus, PreferenceStore};

pub use history::{format_duration, ConversationHistory, Exchange, Speaker};
pub use state::{SessionEvent, SessionState};

/// Preference key used for the user's name
pub const NAME_KEY: &str = "name";

pub struct ChatSession {
    id: Uuid,
    state: SessionState,
    bot_name: String,
    pub preferences: PreferenceStore,
    pub learned: LearnedResponses,
    pub knowledge: KnowledgeBase,
    pub history: ConversationHistory,
    store: Option<KnowledgeStore>,
    load_status: Option<LoadStatus>,
    persist_learned: bool,
}

impl ChatSession {
    /// New idle session over an already-built knowledge base
    pub fn new(bot_name: impl Into<String>, knowledge: KnowledgeBase) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            bot_name: bot_name.into(),
            preferences: PreferenceStore::new(),
            learned: LearnedResponses::new(),
            knowledge,
            history: ConversationHistory::new(),
            store: None,
            load_status: None,
            persist_learned: false,
        }
    }

    /// Attach a backing file; learned pairs are written there when `persist_learned`
    pub fn with_store(mut self, store: KnowledgeStore, persist_learned: bool) -> Self {
        self.store = Some(store);
        self.persist_learned = persist_learned;
        self
    }

    /// Apply a lifecycle event
    pub fn transition(&mut self, event: SessionEvent) -> Result<SessionState> {
        let next = self.state.transition(event)?;
        if next != self.state {
            debug!(session = %self.id, from = ?self.state, to = ?next, "Session transition");
        }
        self.state = next;
        Ok(next)
    }

    /// Reload the knowledge base from the attached file, keeping the scoring
    /// settings. Falls back to the defaults on any problem; `None` when no
    /// file is attached.
    pub fn load_knowledge(&mut self) -> Option<LoadStatus> {
        let store = self.store.as_ref()?;
        let (entries, status) = store.load_or_default();
        self.knowledge =
            KnowledgeBase::new(entries, self.knowledge.method(), self.knowledge.threshold());
        self.load_status = Some(status.clone());
        Some(status)
    }

    /// Teach a trigger/reply pair.
    ///
    /// Returns `Ok(true)` when the pair was also written to the knowledge
    /// file. A blank trigger is a `KnowledgeError`.
    pub fn learn(&mut self, trigger: &str, reply: &str) -> Result<bool> {
        if !self.learned.learn(trigger, reply) {
            return Err(ChatError::KnowledgeError(
                "trigger phrase must not be empty".to_string(),
            ));
        }
        if !self.persist_learned {
            return Ok(false);
        }
        self.knowledge.add(trigger, reply)?;
        self.save_knowledge()
    }

    /// Write the knowledge base to its file. `Ok(false)` when no file is attached.
    ///
    /// An unreadable file that could not be moved aside is never overwritten.
    pub fn save_knowledge(&self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        if self.load_status.as_ref().is_some_and(LoadStatus::blocks_save) {
            warn!(path = %store.path().display(), "Not overwriting unreadable knowledge file");
            return Err(ChatError::StoreProtected(store.path().display().to_string()));
        }
        store.save(self.knowledge.entries())?;
        Ok(true)
    }

    /// Forget preferences, learned replies and history; knowledge is kept
    pub fn reset(&mut self) {
        self.preferences.clear();
        self.learned.clear();
        self.history.reset();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn user_name(&self) -> Option<&str> {
        self.preferences.get(NAME_KEY)
    }

    pub fn store(&self) -> Option<&KnowledgeStore> {
        self.store.as_ref()
    }

    /// Outcome of the last knowledge file load
    pub fn load_status(&self) -> Option<&LoadStatus> {
        self.load_status.as_ref()
    }
}
