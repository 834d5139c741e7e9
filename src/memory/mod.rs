//! Conversation memory: preferences, learned replies and the knowledge base

pub mod knowledge;
pub mod learned;
pub mod persistence;
pub mod preferences;

pub use knowledge::{KnowledgeBase, KnowledgeEntry, KnowledgeMatch, ScoringMethod};
pub use learned::{LearnedResponse, LearnedResponses};
pub use persistence::{KnowledgeStore, LoadStatus};
pub use preferences::PreferenceStore;
