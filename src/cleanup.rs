//! Cleanup ledger: recorded side effects and their rollback
//!
//! Every reversible side effect the workflow performs is recorded here right
//! after it succeeds. On failure or interruption the ledger replays the
//! inverse operations in reverse insertion order: later effects may depend on
//! earlier ones staying in a known state, so the most recent effect is undone
//! first (popping a stash before deleting the version commit could reintroduce
//! working-tree conflicts against the commit about to be removed).

use crate::git::Repository;

/// One reversible side effect performed during a run
///
/// Each variant carries exactly what its inverse needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupAction {
    /// A stash was pushed; the inverse pops it back
    StashPop,
    /// The version commit was created; the inverse deletes the tag (when one
    /// was created) and hard-resets to the previous commit
    RevertVersionCommit { tag: Option<String> },
}

impl CleanupAction {
    fn describe(&self) -> String {
        match self {
            CleanupAction::StashPop => "restore stashed changes".to_string(),
            CleanupAction::RevertVersionCommit { tag: Some(tag) } => {
                format!("delete tag {} and revert the version commit", tag)
            }
            CleanupAction::RevertVersionCommit { tag: None } => {
                "revert the version commit".to_string()
            }
        }
    }
}

/// Ordered record of reversible side effects, drained LIFO on rollback
///
/// Owned by the workflow for the duration of one run. Append-only during
/// normal execution; entries are removed when their forward effect becomes
/// durable, and the whole ledger is consumed by [CleanupLedger::replay_all].
#[derive(Debug, Default)]
pub struct CleanupLedger {
    actions: Vec<CleanupAction>,
}

impl CleanupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a side effect that just succeeded
    pub fn record(&mut self, action: CleanupAction) {
        self.actions.push(action);
    }

    /// Drop entries whose forward effect no longer needs undoing
    pub fn remove(&mut self, predicate: impl Fn(&CleanupAction) -> bool) {
        self.actions.retain(|a| !predicate(a));
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Forget all entries without running any inverse
    ///
    /// Called once the transaction is durable and rollback is no longer
    /// desired.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Replay all inverse operations in reverse insertion order
    ///
    /// Failures of individual inverses are collected, not propagated, so one
    /// failed rollback step does not block the remaining ones. The ledger is
    /// empty afterwards regardless of per-step outcomes. Returns a warning
    /// message per failed step for the caller to display.
    pub fn replay_all(&mut self, repo: &mut dyn Repository) -> Vec<String> {
        let mut warnings = Vec::new();

        for action in self.actions.drain(..).rev() {
            match &action {
                CleanupAction::StashPop => {
                    if let Err(e) = repo.stash_pop() {
                        warnings.push(format!(
                            "Could not {}: {} - the stash is left in place",
                            action.describe(),
                            e
                        ));
                    }
                }
                CleanupAction::RevertVersionCommit { tag } => {
                    if let Some(tag) = tag {
                        if let Err(e) = repo.delete_tag(tag) {
                            warnings.push(format!("Could not delete tag {}: {}", tag, e));
                        }
                    }
                    if let Err(e) = repo.hard_reset_to_previous_commit() {
                        warnings.push(format!(
                            "Could not revert the version commit: {} - reset it manually",
                            e
                        ));
                    }
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_replay_runs_in_reverse_order() {
        let mut repo = MockRepository::new().with_tag("v1.3.0");
        repo.stash_depth = 1;

        let mut ledger = CleanupLedger::new();
        ledger.record(CleanupAction::StashPop);
        ledger.record(CleanupAction::RevertVersionCommit {
            tag: Some("v1.3.0".to_string()),
        });

        let warnings = ledger.replay_all(&mut repo);
        assert!(warnings.is_empty());
        assert!(ledger.is_empty());

        // Most recent effect is undone first
        assert_eq!(repo.ops, vec!["delete_tag v1.3.0", "hard_reset", "stash_pop"]);
    }

    #[test]
    fn test_replay_without_tag() {
        let mut repo = MockRepository::new();
        let mut ledger = CleanupLedger::new();
        ledger.record(CleanupAction::RevertVersionCommit { tag: None });

        let warnings = ledger.replay_all(&mut repo);
        assert!(warnings.is_empty());
        assert_eq!(repo.ops, vec!["hard_reset"]);
    }

    #[test]
    fn test_replay_continues_after_failed_step() {
        // No stash exists, so the pop fails; the commit revert still runs
        let mut repo = MockRepository::new();

        let mut ledger = CleanupLedger::new();
        ledger.record(CleanupAction::StashPop);
        ledger.record(CleanupAction::RevertVersionCommit { tag: None });

        let warnings = ledger.replay_all(&mut repo);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("stash"));
        assert!(ledger.is_empty());
        assert_eq!(repo.ops, vec!["hard_reset", "stash_pop"]);
    }

    #[test]
    fn test_remove_by_predicate() {
        let mut ledger = CleanupLedger::new();
        ledger.record(CleanupAction::StashPop);
        ledger.record(CleanupAction::RevertVersionCommit { tag: None });

        ledger.remove(|a| matches!(a, CleanupAction::StashPop));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut ledger = CleanupLedger::new();
        ledger.record(CleanupAction::StashPop);
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
