//! # clipix-search
//!
//! Web search used when the assistant's memory has no answer. Providers
//! return raw hits; [`ranking`] picks the freshest-looking one.

pub mod google;
pub mod mock;
pub mod provider;
pub mod ranking;

pub use google::GoogleSearch;
pub use mock::MockSearch;
pub use provider::{SearchHit, SearchProvider, SearchRequest};
pub use ranking::pick_most_recent;
