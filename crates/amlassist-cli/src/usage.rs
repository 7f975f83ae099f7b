//! `amlassist usage` — the organization's token quota for the current period.

use anyhow::{Context, Result};
use colored::Colorize;

use amlassist_billing::{calculate_usage_percentage, format_token_count, BillingClient};
use amlassist_core::config::load_config;

use crate::helpers;

/// Run the usage command.
pub async fn run(token: &str) -> Result<()> {
    let config = load_config(None);
    let client = BillingClient::new(&config.billing.api_url, token);
    let snapshot = client
        .get_token_usage()
        .await
        .context("failed to fetch token usage")?;
    let tracker = snapshot.tracker();

    println!();
    println!("{}", "Token usage".cyan().bold());
    println!();

    if let (Some(start), Some(end)) = (snapshot.period_start, snapshot.period_end) {
        println!(
            "  {:<12} {} → {}",
            "Period:".bold(),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
    }
    println!(
        "  {:<12} {} of {} ({}%)",
        "Used:".bold(),
        format_token_count(count(tracker.used)),
        format_token_count(count(tracker.limit)),
        tracker.percentage(1)
    );

    let bar = helpers::usage_bar(calculate_usage_percentage(snapshot.used, snapshot.included));
    if tracker.is_over_limit() {
        println!("  {:<12} {}", "", bar.red());
        println!(
            "  {:<12} {} over quota ({} overage event(s))",
            "Overage:".bold(),
            format_token_count(count(-tracker.remaining)).red(),
            snapshot.overage_count
        );
    } else {
        println!("  {:<12} {}", "", bar.green());
        println!(
            "  {:<12} {}",
            "Remaining:".bold(),
            format_token_count(count(tracker.remaining))
        );
    }
    println!();

    Ok(())
}

/// Token counts from the billing backend are signed; display clamps at zero.
fn count(n: i64) -> u64 {
    n.max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_clamps_negative() {
        assert_eq!(count(-5), 0);
        assert_eq!(count(1_500), 1_500);
    }
}
