//! Git operations abstraction layer
//!
//! Provides a trait-based abstraction over the repository operations the bump
//! workflow needs, with two implementations:
//!
//! - [repository::Git2Repository]: the real implementation using the `git2` crate
//! - [mock::MockRepository]: a scriptable implementation for testing
//!
//! Workflow code depends on the [Repository] trait rather than a concrete
//! type, so the whole transaction (including rollback) can be exercised
//! without a real repository.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Snapshot of the working tree state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Whether any tracked or untracked changes exist
    pub dirty: bool,
    /// Paths with pending changes, for display
    pub changed_paths: Vec<String>,
}

impl WorktreeStatus {
    /// A clean working tree
    pub fn clean() -> Self {
        WorktreeStatus {
            dirty: false,
            changed_paths: Vec::new(),
        }
    }
}

/// Repository operations consumed by the bump workflow
///
/// Query methods take `&self`; every operation that mutates the repository or
/// working tree takes `&mut self`. All side effects run against real
/// repository state - there is no in-memory staging - so a call that returned
/// `Ok` is durable and must be accounted for by the caller's cleanup ledger.
pub trait Repository {
    /// Whether the working directory is inside a repository
    fn is_repository(&self) -> bool;

    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Query the working tree for pending changes
    fn status(&self) -> Result<WorktreeStatus>;

    /// Most recently created tag, by tag creation date, best-effort
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Configured URL of a remote, `None` when the remote is not set up
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Stage all pending changes (tracked and untracked)
    fn stage_all(&mut self) -> Result<()>;

    /// Create a commit from the index with the given message
    fn commit(&mut self, message: &str) -> Result<()>;

    /// Create a lightweight tag on the current HEAD
    fn create_tag(&mut self, name: &str) -> Result<()>;

    /// Delete a tag; used only during rollback
    fn delete_tag(&mut self, name: &str) -> Result<()>;

    /// Stash all working tree changes under a label
    fn stash_push(&mut self, label: &str) -> Result<()>;

    /// Pop the most recent stash
    ///
    /// Fails with [crate::error::GitBumpError::StashConflict] when the working
    /// tree cannot cleanly receive the stashed changes; the stash entry is
    /// left in place in that case.
    fn stash_pop(&mut self) -> Result<()>;

    /// Hard-reset the current branch to its previous commit; rollback only
    fn hard_reset_to_previous_commit(&mut self) -> Result<()>;

    /// Push a branch to a remote
    fn push(&mut self, remote: &str, branch: &str) -> Result<()>;

    /// Push all local tags to a remote
    fn push_tags(&mut self, remote: &str) -> Result<()>;

    /// Fetch branches and tags from a remote
    fn fetch(&mut self, remote: &str) -> Result<()>;
}
