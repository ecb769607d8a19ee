//! Pure formatting functions for UI output.
//!
//! All display logic lives here, separated from user interaction. Functions
//! have no side effects beyond printing.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning message with a yellow marker.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the proposed version change and tag.
pub fn display_proposed_bump(current: &str, next: &str, tag: &str) {
    println!("\n{}", style("Proposed version bump:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {} (tag {})", style(next).green(), style(tag).cyan());
}

/// Display the working tree paths that would go into the bump commit.
///
/// Shows up to 10 paths; the rest are summarized as a count.
pub fn display_dirty_paths(paths: &[String]) {
    println!("\n{}", style("Uncommitted changes:").bold());
    for path in paths.iter().take(10) {
        println!("  {}", path);
    }
    if paths.len() > 10 {
        println!("  ... and {} more", paths.len() - 10);
    }
}

/// Display what a rollback reverted and what needs manual attention.
pub fn display_rollback_summary(warnings: &[String]) {
    if warnings.is_empty() {
        display_status("All recorded changes were reverted");
    } else {
        display_status("Rollback ran; some steps need manual attention:");
        for warning in warnings {
            display_warning(warning);
        }
    }
}

/// Display the steps a dry run would perform.
pub fn display_dry_run_plan(tag: &str, will_stash: bool) {
    display_status("Dry run - no changes made:");
    if will_stash {
        display_success("  Step 1: would stash uncommitted changes");
    }
    display_success(&format!("  Would bump the manifest and commit as {}", tag));
    display_success(&format!("  Would create tag {}", tag));
    display_success("  Would ask whether to push to the remote");
}
