//! CLI progress display utilities
//!
//! Step indicators, emojis and the batch progress bar.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for scanning the source folder
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for archive extraction
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Warning sign - for failed archives
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/2] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(status: &str, elapsed: Duration) {
    println!("{} {} in {}", SPARKLE, status, HumanDuration(elapsed));
}

/// Print a failed archive line: `⚠️  broken.zip: failed at extract: ...`
pub fn print_failure(name: &str, msg: &str) {
    println!("{}{}: {}", WARNING, style(name).yellow(), msg);
}

// =============================================================================
// Progress Styles
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `car.zip [████████░░░░░░░░] 5/10`
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}
