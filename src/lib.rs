//! ProLUG bot: chat logging, weekly activity reports and chat commands.
//!
//! Single-crate library: the message store, lexical analysis and topic
//! estimation, the weekly report, and the command layer driven by the
//! `prolug-bot` binary.

// Foundation types
pub mod chat_message;
pub mod time_utils;

// Core types
pub mod config;
pub mod constants;
pub mod error;
pub mod provider;

// Sub-systems
pub mod api;
pub mod commands;
pub mod processing;
pub mod report;
pub mod storage;
pub mod tracing_init;

#[cfg(test)]
pub mod test_helpers;

// Re-exports for convenience
pub use error::{BotError, BotResult};
