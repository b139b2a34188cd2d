//! # clipix-cli
//!
//! Command-line interface for the Clipix assistant.
//!
//! ## Commands
//!
//! - `clipix trainer`: interactive training menu
//! - `clipix chat` / `clipix ask`: talk to the assistant in the terminal
//! - `clipix serve`: run the HTTP API for the mobile client
//! - `clipix train` / `clipix teach`: grow the knowledge base
//! - `clipix stats`, `clipix config`, `clipix set`, `clipix init`, `clipix doctor`

pub mod commands;

pub use commands::Cli;
