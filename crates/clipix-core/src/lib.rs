//! # clipix-core
//!
//! Shared vocabulary for the Clipix assistant: the unified error type and the
//! small set of types that cross crate boundaries (statistics, teach results).

pub mod error;
pub mod types;

pub use error::{ClipixError, Result};
pub use types::*;
