//! The bump transaction workflow
//!
//! Orchestrates the end-to-end release bump: validate the environment,
//! resolve inputs, guard the branch, stash dirty work if asked to, mutate the
//! manifest, commit and tag, restore the stash, and optionally push. Every
//! reversible side effect is recorded in a [CleanupLedger] the moment it
//! succeeds; any later failure or interrupt replays the recorded inverses in
//! reverse order before the run terminates.
//!
//! The pipeline is strictly sequential. Cancellation is cooperative: the
//! shared [InterruptFlag] is checked at every state boundary, never
//! preemptively mid-operation, so an operation that completed is always
//! accounted for before the run halts.

use crate::cleanup::{CleanupAction, CleanupLedger};
use crate::config::Settings;
use crate::domain::prerelease::validate_identifier;
use crate::domain::{BumpKind, Tag, Version};
use crate::error::{GitBumpError, Result};
use crate::git::Repository;
use crate::interrupt::InterruptFlag;
use crate::manifest::Manifest;
use crate::ui::{self, DirtyChoice, Prompter};

/// Remote the push step targets
pub const DEFAULT_REMOTE: &str = "origin";

/// Label attached to the pre-bump stash entry
const STASH_LABEL: &str = "git-bump: pre-bump stash";

/// Trailer appended to every bump commit
const ATTRIBUTION_TRAILER: &str = "Released-with: git-bump";

/// Raw inputs for a run, before prompting fills in the gaps
#[derive(Debug, Clone, Default)]
pub struct WorkflowInputs {
    pub kind: Option<BumpKind>,
    pub message: Option<String>,
    pub pre_id: Option<String>,
    pub verbose: bool,
    /// Stash dirty changes without asking
    pub stash_on_dirty: bool,
    /// Skip the branch allow-list guard
    pub branch_override: bool,
    /// Preview the plan without mutating anything
    pub dry_run: bool,
}

/// Fully resolved configuration for one run
///
/// Built once after input resolution and never mutated; a retry builds a new
/// one.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub kind: BumpKind,
    pub message: String,
    pub pre_id: Option<String>,
    pub verbose: bool,
    pub stash_on_dirty: bool,
    pub branch_override: bool,
}

/// Terminal result of a run
#[derive(Debug)]
pub enum RunOutcome {
    Success,
    AbortedByUser,
    Failed(GitBumpError),
}

/// How dirty working-tree changes are handled for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StashPlan {
    /// Clean tree, nothing to do
    None,
    /// Dirty changes ride along in the bump commit
    Include,
    /// Dirty changes are stashed and restored afterwards
    Stash,
}

/// Build the bump commit message: `(<version>) <message>` plus the trailer
pub fn commit_message(version: &Version, message: &str) -> String {
    format!("({}) {}\n\n{}", version, message, ATTRIBUTION_TRAILER)
}

/// The bump transaction state machine
pub struct BumpWorkflow<'a, R: Repository, P: Prompter> {
    repo: &'a mut R,
    manifest: &'a Manifest,
    prompter: &'a P,
    settings: &'a Settings,
    interrupt: InterruptFlag,
    ledger: CleanupLedger,
    unwound: bool,
}

impl<'a, R: Repository, P: Prompter> BumpWorkflow<'a, R, P> {
    pub fn new(
        repo: &'a mut R,
        manifest: &'a Manifest,
        prompter: &'a P,
        settings: &'a Settings,
        interrupt: InterruptFlag,
    ) -> Self {
        BumpWorkflow {
            repo,
            manifest,
            prompter,
            settings,
            interrupt,
            ledger: CleanupLedger::new(),
            unwound: false,
        }
    }

    /// Ledger introspection, mainly for tests
    pub fn ledger(&self) -> &CleanupLedger {
        &self.ledger
    }

    /// Run the workflow to completion, rolling back on failure or interrupt
    pub fn run(&mut self, inputs: WorkflowInputs) -> RunOutcome {
        match self.execute(inputs) {
            Ok(outcome) => outcome,
            Err(GitBumpError::Interrupted) => {
                ui::display_status("Interrupted - rolling back");
                self.unwind();
                RunOutcome::AbortedByUser
            }
            Err(e) => {
                self.unwind();
                RunOutcome::Failed(e)
            }
        }
    }

    /// Replay the ledger exactly once
    ///
    /// The latch keeps a second signal arriving mid-unwind from triggering a
    /// concurrent second replay.
    fn unwind(&mut self) {
        if self.unwound {
            return;
        }
        self.unwound = true;

        if self.ledger.is_empty() {
            return;
        }
        let warnings = self.ledger.replay_all(&mut *self.repo);
        ui::display_rollback_summary(&warnings);
    }

    fn check_interrupt(&self) -> Result<()> {
        if self.interrupt.is_tripped() {
            return Err(GitBumpError::Interrupted);
        }
        Ok(())
    }

    fn execute(&mut self, inputs: WorkflowInputs) -> Result<RunOutcome> {
        self.validate_environment()?;
        self.check_interrupt()?;

        let dry_run = inputs.dry_run;
        let config = self.resolve_inputs(inputs)?;
        self.check_interrupt()?;

        self.check_branch(&config)?;

        let status = self.repo.status()?;
        let stash_plan = if !status.dirty {
            StashPlan::None
        } else if config.stash_on_dirty {
            StashPlan::Stash
        } else {
            match self.prompter.dirty_tree_choice(&status.changed_paths)? {
                DirtyChoice::Include => StashPlan::Include,
                DirtyChoice::Stash => StashPlan::Stash,
                DirtyChoice::Abort => {
                    ui::display_status("Aborted - nothing was changed");
                    return Ok(RunOutcome::AbortedByUser);
                }
            }
        };

        if dry_run {
            let next = self.manifest.preview(config.kind, config.pre_id.as_deref())?;
            let tag = Tag::for_version(&next);
            ui::display_dry_run_plan(&tag.name, stash_plan == StashPlan::Stash);
            return Ok(RunOutcome::Success);
        }

        let stashed = stash_plan == StashPlan::Stash;
        if stashed {
            self.check_interrupt()?;
            if config.verbose {
                ui::display_status("Stashing uncommitted changes");
            }
            self.repo.stash_push(STASH_LABEL)?;
            // The call returned, so the stash is confirmed created; record it
            // even if a signal arrived while it was in flight. An error
            // return above means nothing durable happened and nothing is
            // recorded.
            self.ledger.record(CleanupAction::StashPop);
        }

        self.bump(&config)?;

        if stashed {
            self.check_interrupt()?;
            if config.verbose {
                ui::display_status("Restoring stashed changes");
            }
            match self.repo.stash_pop() {
                Ok(()) => {
                    // The stash is gone; popping again during a rollback
                    // would corrupt the tree.
                    self.ledger
                        .remove(|a| matches!(a, CleanupAction::StashPop));
                }
                Err(e) => {
                    // The stash cannot be applied cleanly and auto-resolving
                    // is unsafe. Leave it in place for manual recovery and
                    // roll back only the remaining entries.
                    self.ledger
                        .remove(|a| matches!(a, CleanupAction::StashPop));
                    ui::display_warning(
                        "The stash could not be restored and is left in place - apply it manually with 'git stash pop'",
                    );
                    return Err(e);
                }
            }
        }

        // The bump is durably committed locally; pushing is a convenience,
        // not part of the transaction.
        self.ledger.clear();

        if let Err(e) = self.push_step(&config) {
            ui::display_warning(&format!(
                "Push failed: {} - the local commit and tag stand",
                e
            ));
        }

        Ok(RunOutcome::Success)
    }

    /// Requires a manifest and a repository before anything else runs
    fn validate_environment(&self) -> Result<()> {
        if !self.repo.is_repository() {
            return Err(GitBumpError::environment(
                "The current directory is not inside a git repository",
            ));
        }
        self.manifest.current_version()?;
        Ok(())
    }

    /// Fill in bump kind, commit message and pre-release identifier
    ///
    /// Invalid interactive input re-prompts instead of failing the run;
    /// invalid non-interactive input (CLI-provided) is an error.
    fn resolve_inputs(&mut self, inputs: WorkflowInputs) -> Result<WorkflowConfig> {
        let kind = match inputs.kind {
            Some(kind) => kind,
            None => loop {
                match self.prompter.select_bump_kind() {
                    Ok(kind) => break kind,
                    Err(GitBumpError::Input(msg)) => ui::display_error(&msg),
                    Err(e) => return Err(e),
                }
            },
        };

        let pre_id = if kind.is_pre() {
            match inputs.pre_id {
                Some(id) => Some(validate_identifier(&id)?),
                None => {
                    let default = self.default_pre_identifier();
                    self.prompter.input_pre_identifier(default.as_deref())?
                }
            }
        } else {
            None
        };

        let message = match inputs.message {
            Some(m) if !m.trim().is_empty() => m,
            Some(_) => return Err(GitBumpError::input("Commit message must not be empty")),
            None => loop {
                match self.prompter.input_message() {
                    Ok(m) => break m,
                    Err(GitBumpError::Input(msg)) => ui::display_error(&msg),
                    Err(e) => return Err(e),
                }
            },
        };

        Ok(WorkflowConfig {
            kind,
            message,
            pre_id,
            verbose: inputs.verbose,
            stash_on_dirty: inputs.stash_on_dirty,
            branch_override: inputs.branch_override,
        })
    }

    /// Identifier from the most recent tag, best-effort
    fn default_pre_identifier(&self) -> Option<String> {
        self.repo
            .latest_tag()
            .ok()
            .flatten()
            .and_then(|t| Tag::new(t).pre_release_identifier())
    }

    /// Pure guard: the current branch must be allowed unless overridden
    fn check_branch(&self, config: &WorkflowConfig) -> Result<()> {
        let branch = self.repo.current_branch()?;
        if config.branch_override || self.settings.is_branch_allowed(&branch) {
            if config.verbose {
                ui::display_status(&format!("Bumping on branch '{}'", branch));
            }
            return Ok(());
        }
        Err(GitBumpError::BranchNotAllowed { branch })
    }

    /// Mutate the manifest and create the bump commit and tag
    ///
    /// The next version is previewed first so the tag name is known (and
    /// collision-checked) before anything durable happens. The commit and tag
    /// form one logical step: the commit is recorded in the ledger the moment
    /// it exists, first without a tag name, then upgraded once the tag is
    /// created, so rollback always knows exactly what to delete.
    fn bump(&mut self, config: &WorkflowConfig) -> Result<()> {
        self.check_interrupt()?;

        let current = self.manifest.current_version()?;
        let next = self.manifest.preview(config.kind, config.pre_id.as_deref())?;
        let tag = Tag::for_version(&next);
        ui::display_proposed_bump(&current.to_string(), &next.to_string(), &tag.name);

        if self.repo.tag_exists(&tag.name)? {
            return Err(GitBumpError::TagCollision { tag: tag.name });
        }

        if config.verbose {
            ui::display_status("Staging changes");
        }
        self.repo.stage_all()?;

        let snapshot = self.manifest.snapshot()?;
        let applied = self.manifest.apply(config.kind, config.pre_id.as_deref())?;
        self.repo.stage_all()?;

        let message = commit_message(&next, &config.message);
        if let Err(e) = self.repo.commit(&message) {
            // Nothing durable in the repository yet; discard the manifest
            // edit so the tree matches the last commit again.
            let _ = self.manifest.restore(&snapshot);
            return Err(e);
        }
        self.ledger
            .record(CleanupAction::RevertVersionCommit { tag: None });

        self.repo.create_tag(&applied.name)?;
        self.ledger
            .remove(|a| matches!(a, CleanupAction::RevertVersionCommit { .. }));
        self.ledger.record(CleanupAction::RevertVersionCommit {
            tag: Some(applied.name.clone()),
        });

        ui::display_success(&format!("Created commit and tag {}", applied.name));
        Ok(())
    }

    /// Best-effort push of the branch and tags, then a fetch
    ///
    /// A missing remote is skipped with a warning rather than treated as an
    /// error. Any failure here is reported by the caller as a warning; the
    /// local bump stands either way.
    fn push_step(&mut self, config: &WorkflowConfig) -> Result<()> {
        let branch = self.repo.current_branch()?;

        match self.repo.remote_url(DEFAULT_REMOTE)? {
            None => {
                ui::display_warning(&format!(
                    "No remote '{}' configured - skipping push",
                    DEFAULT_REMOTE
                ));
                Ok(())
            }
            Some(_) => {
                if !self.prompter.confirm_push(DEFAULT_REMOTE, &branch)? {
                    ui::display_status(&format!(
                        "Not pushed - run 'git push {} {} --tags' when ready",
                        DEFAULT_REMOTE, branch
                    ));
                    return Ok(());
                }

                if config.verbose {
                    ui::display_status(&format!("Pushing {} to {}", branch, DEFAULT_REMOTE));
                }
                self.repo.push(DEFAULT_REMOTE, &branch)?;
                self.repo.push_tags(DEFAULT_REMOTE)?;
                self.repo.fetch(DEFAULT_REMOTE)?;
                ui::display_success(&format!("Pushed {} and tags to {}", branch, DEFAULT_REMOTE));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message_template() {
        let v = Version::parse("1.3.0").unwrap();
        let msg = commit_message(&v, "release the new parser");
        assert_eq!(
            msg,
            "(1.3.0) release the new parser\n\nReleased-with: git-bump"
        );
    }

    #[test]
    fn test_commit_message_prerelease_version() {
        let v = Version::parse("1.2.0-beta.1").unwrap();
        let msg = commit_message(&v, "beta cut");
        assert!(msg.starts_with("(1.2.0-beta.1) beta cut"));
        assert!(msg.ends_with(ATTRIBUTION_TRAILER));
    }

    #[test]
    fn test_workflow_inputs_default() {
        let inputs = WorkflowInputs::default();
        assert!(inputs.kind.is_none());
        assert!(!inputs.dry_run);
        assert!(!inputs.branch_override);
    }
}
