//! Knowledge retrieval and conversation memory for chorus.
//!
//! Both are shared mutable state across concurrent requests:
//! - [`KnowledgeIndex`] takes a single writer for mutations; searches run
//!   under a shared read lock and bump usage counters atomically.
//! - [`ConversationMemory`] locks per user, so appends for different users
//!   never contend.
//!
//! [`store`] is the persistence boundary (get/put/delete by key).

pub mod conversation;
pub mod features;
pub mod knowledge;
pub mod seed;
pub mod store;
pub mod vector;

pub use conversation::{ANONYMOUS_USER, ConversationMemory, ConversationTurn, ScoredTurn};
pub use knowledge::{
    IndexSettings, IndexStats, KnowledgeEntry, KnowledgeIndex, KnowledgeUpdate, NewKnowledge,
    ScoredEntry, SearchRequest, SearchResults,
};
pub use store::{FileStore, InMemoryStore, KeyValueStore};
pub use vector::cosine_similarity;
