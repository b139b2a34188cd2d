//! # clipix-memory
//!
//! The assistant's long-term memory:
//!
//! - **Knowledge base**: categorized facts with the time each was added.
//! - **Fact store**: the knowledge base persisted as a JSON file, with
//!   expiration of stale facts in fast-moving categories.
//! - **Memory index**: an inverted word → facts table and the relevance
//!   scorer used to answer questions from memory.
//! - **Classifier**: keyword rules for time-sensitive questions and facts.
//! - **Ingest**: extracting facts from text documents.

pub mod classify;
pub mod index;
pub mod ingest;
pub mod knowledge;
pub mod store;

pub use index::{FactFilter, MemoryIndex, MemoryMatch};
pub use knowledge::{ExpirationPolicy, ExpiredFact, FactId, KnowledgeBase, fact_id};
pub use store::FactStore;
