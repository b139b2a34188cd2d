//! # clipix-runtime
//!
//! The assistant itself. Each question walks a fixed chain and stops at
//! the first source that answers:
//!
//! ```text
//!   question
//!      │
//!      ▼
//!  ┌────────┐  hit   ┌────────────────┐
//!  │ Memory │──────▶ │ 🤖 answer      │
//!  └───┬────┘        └────────────────┘
//!      │ miss
//!      ▼
//!  ┌────────┐ result ┌────────────────┐
//!  │ Search │──────▶ │ learn + answer │
//!  └───┬────┘        └────────────────┘
//!      │ miss / error
//!      ▼
//!  ┌────────┐ reply  ┌────────────────┐
//!  │  LLM   │──────▶ │ learn + answer │
//!  └───┬────┘        └────────────────┘
//!      │ error
//!      ▼
//!   "I don't know about that yet"
//! ```

pub mod answer;
pub mod assistant;
pub mod strategy;
pub mod training;

pub use answer::{Answer, AnswerSource, SearchKind, UNKNOWN_REPLY};
pub use assistant::{Assistant, LlmSettings};
pub use training::{DocumentReport, TrainingReport};
