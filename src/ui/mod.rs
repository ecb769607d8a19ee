//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts behind the [Prompter] trait
//!
//! The workflow consumes the [Prompter] trait so tests can script every
//! answer; [TerminalPrompter] is the stdin-backed implementation used by the
//! binary.

use std::io::{self, Write};

use crate::domain::BumpKind;
use crate::error::{GitBumpError, Result};

pub mod formatter;

pub use formatter::{
    display_dirty_paths, display_dry_run_plan, display_error, display_proposed_bump,
    display_rollback_summary, display_status, display_success, display_warning,
};

/// How the user wants to handle uncommitted changes before a bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyChoice {
    /// Include the changes in the bump commit
    Include,
    /// Stash the changes and restore them after the bump
    Stash,
    /// Abort the run
    Abort,
}

/// Interactive input collection for the bump workflow
pub trait Prompter {
    /// Ask which version component to bump
    fn select_bump_kind(&self) -> Result<BumpKind>;

    /// Ask for the commit message
    fn input_message(&self) -> Result<String>;

    /// Ask for a pre-release identifier, offering a default extracted from
    /// the latest tag when one was found
    fn input_pre_identifier(&self, default: Option<&str>) -> Result<Option<String>>;

    /// Ask what to do about uncommitted changes
    fn dirty_tree_choice(&self, changed_paths: &[String]) -> Result<DirtyChoice>;

    /// Ask whether to push the bump to a remote
    fn confirm_push(&self, remote: &str, branch: &str) -> Result<bool>;
}

/// Stdin-backed prompter used by the CLI
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self) -> Result<String> {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn select_bump_kind(&self) -> Result<BumpKind> {
        println!("\n{}", console::style("Bump kinds:").bold());
        for (i, kind) in BumpKind::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, kind);
        }

        print!("\nSelect a bump kind (1-{}) or type its name: ", BumpKind::ALL.len());
        io::stdout().flush()?;

        let input = self.read_line()?;
        if let Ok(index) = input.parse::<usize>() {
            if index >= 1 && index <= BumpKind::ALL.len() {
                return Ok(BumpKind::ALL[index - 1]);
            }
            return Err(GitBumpError::input(format!("Invalid selection: {}", index)));
        }

        input.parse()
    }

    fn input_message(&self) -> Result<String> {
        print!("\nCommit message: ");
        io::stdout().flush()?;

        let message = self.read_line()?;
        if message.is_empty() {
            return Err(GitBumpError::input("Commit message must not be empty"));
        }
        Ok(message)
    }

    fn input_pre_identifier(&self, default: Option<&str>) -> Result<Option<String>> {
        match default {
            Some(d) => print!("\nPre-release identifier [default: {}]: ", d),
            None => print!("\nPre-release identifier (empty for none): "),
        }
        io::stdout().flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            return Ok(default.map(str::to_string));
        }
        crate::domain::prerelease::validate_identifier(&input).map(Some)
    }

    fn dirty_tree_choice(&self, changed_paths: &[String]) -> Result<DirtyChoice> {
        formatter::display_dirty_paths(changed_paths);
        print!("\nInclude them in the bump commit (i), stash them (s), or abort (a)? [i/s/A]: ");
        io::stdout().flush()?;

        match self.read_line()?.to_lowercase().as_str() {
            "i" | "include" => Ok(DirtyChoice::Include),
            "s" | "stash" => Ok(DirtyChoice::Stash),
            _ => Ok(DirtyChoice::Abort),
        }
    }

    fn confirm_push(&self, remote: &str, branch: &str) -> Result<bool> {
        print!("\nPush {} and tags to '{}'? (y/N): ", branch, remote);
        io::stdout().flush()?;

        let response = self.read_line()?.to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}
