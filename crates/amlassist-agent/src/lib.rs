//! AML assistant agent — backend tools and the turn driver.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, backend client, data-query tools, and the import tool
//! - **turn**: one model ⇄ tool exchange, metered against the billing backend

pub mod tools;
pub mod turn;

pub use tools::{build_tool_registry, BackendClient, PendingImport, Tool, ToolRegistry};
pub use turn::{run_turn, TurnError, TurnOutcome, TurnSettings};
