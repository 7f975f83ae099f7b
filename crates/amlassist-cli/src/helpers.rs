//! Shared CLI helpers — path expansion, response printing, progress bars.

use std::path::PathBuf;

use colored::Colorize;

const BAR_WIDTH: usize = 30;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print an assistant response to stdout.
pub fn print_response(response: &str) {
    println!();
    println!("{}", "AML Assistant".cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// A fixed-width bar for a `0..=100` percentage.
pub fn usage_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/exports/clients.csv");
        assert!(result.ends_with("exports/clients.csv"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn usage_bar_bounds() {
        assert_eq!(usage_bar(0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(usage_bar(100), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(usage_bar(250), usage_bar(100));
        assert_eq!(usage_bar(50).matches('#').count(), BAR_WIDTH / 2);
    }
}
