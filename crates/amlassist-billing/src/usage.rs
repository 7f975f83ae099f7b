//! Quota math over token counts.
//!
//! Two percentage functions exist on purpose: [`get_usage_percentage`] is the
//! raw figure and exceeds 100 on overage, [`calculate_usage_percentage`] feeds
//! a bounded progress bar and is clamped to `0..=100`.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// TokenUsage
// ─────────────────────────────────────────────

/// Token counts for one request. `total_tokens == input_tokens + output_tokens`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Build a [`TokenUsage`] from its two components.
pub fn calculate_total_tokens(input: u64, output: u64) -> TokenUsage {
    TokenUsage {
        input_tokens: input,
        output_tokens: output,
        total_tokens: input + output,
    }
}

impl std::ops::Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        calculate_total_tokens(
            self.input_tokens + rhs.input_tokens,
            self.output_tokens + rhs.output_tokens,
        )
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

// ─────────────────────────────────────────────
// UsageTracker
// ─────────────────────────────────────────────

/// Display snapshot of consumption against a quota.
///
/// `remaining == limit - used`; negative `remaining` means overage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTracker {
    pub limit: i64,
    pub used: i64,
    pub remaining: i64,
}

impl UsageTracker {
    pub fn new(limit: i64, used: i64) -> Self {
        Self {
            limit,
            used,
            remaining: limit - used,
        }
    }

    /// A tracker with nothing consumed yet.
    pub fn with_limit(limit: i64) -> Self {
        Self::new(limit, 0)
    }

    pub fn is_over_limit(&self) -> bool {
        is_over_limit(self.used, self.limit)
    }

    pub fn percentage(&self, decimals: u32) -> f64 {
        get_usage_percentage(self.used, self.limit, decimals)
    }
}

/// Equivalent to [`UsageTracker::new`].
pub fn create_usage_tracker(limit: i64, used: i64) -> UsageTracker {
    UsageTracker::new(limit, used)
}

// ─────────────────────────────────────────────
// Quota math
// ─────────────────────────────────────────────

/// Strictly over the limit; `used == limit` is not.
pub fn is_over_limit(used: i64, limit: i64) -> bool {
    used > limit
}

/// Most decimal places an `f64` percentage can meaningfully carry.
const MAX_PERCENTAGE_DECIMALS: u32 = 15;

/// Uncapped usage percentage rounded to `decimals` places. `0` when `limit == 0`.
///
/// `decimals` above 15 is treated as 15.
pub fn get_usage_percentage(used: i64, limit: i64, decimals: u32) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    let pct = used as f64 / limit as f64 * 100.0;
    let factor = 10f64.powi(decimals.min(MAX_PERCENTAGE_DECIMALS) as i32);
    (pct * factor).round() / factor
}

/// Progress-bar percentage: whole number clamped to `0..=100`. `0` when
/// `included` is not positive.
pub fn calculate_usage_percentage(used: i64, included: i64) -> u32 {
    if included <= 0 {
        return 0;
    }
    let pct = (used as f64 / included as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Abbreviate a token count: `1500` → `"1.5K"`, `1000000` → `"1M"`.
///
/// Rounding happens before the suffix is chosen, so `999_999` is `"1M"`.
pub fn format_token_count(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }
    let tenths_k = round_div(n, 100);
    if tenths_k < 10_000 {
        return format!("{}K", one_decimal(tenths_k));
    }
    format!("{}M", one_decimal(round_div(n, 100_000)))
}

/// `n / d` rounded half up, without overflowing near `u64::MAX`.
fn round_div(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d >= d / 2)
}

/// Render a count of tenths with one decimal place, dropping a trailing `.0`.
fn one_decimal(tenths: u64) -> String {
    match tenths % 10 {
        0 => (tenths / 10).to_string(),
        frac => format!("{}.{}", tenths / 10, frac),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
