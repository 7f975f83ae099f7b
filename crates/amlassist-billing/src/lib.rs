//! Usage metering for the AML assistant.
//!
//! - [`usage`] — pure quota math: trackers, percentages, token formatting
//! - [`client::BillingClient`] — reports consumption to, and reads quota
//!   snapshots from, the billing backend

pub mod client;
pub mod usage;

pub use client::{BillingClient, BillingError, UsageSnapshot};
pub use usage::{
    calculate_total_tokens, calculate_usage_percentage, create_usage_tracker,
    format_token_count, get_usage_percentage, is_over_limit, TokenUsage, UsageTracker,
};
