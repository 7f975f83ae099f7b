//! Core building blocks shared by every AML assistant crate.
//!
//! - [`types`] — OpenAI-style chat messages, tool calls, and tool definitions
//! - [`config`] — JSON config schema, loader, and env var overrides
//! - [`utils`] — data directory and string helpers

pub mod config;
pub mod types;
pub mod utils;
