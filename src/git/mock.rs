use crate::error::{GitBumpError, Result};
use crate::git::{Repository, WorktreeStatus};
use crate::interrupt::InterruptFlag;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Records every mutating call in `ops` (in invocation order) so tests can
/// assert on the exact sequence of side effects, including rollback order.
/// Individual operations can be scripted to fail.
pub struct MockRepository {
    pub branch: String,
    pub status: WorktreeStatus,
    pub tags: Vec<String>,
    pub remotes: HashMap<String, String>,
    pub stash_depth: usize,
    pub commit_count: usize,
    /// Ordered log of mutating operations
    pub ops: Vec<String>,
    pub is_repo: bool,
    pub fail_stash_pop_with_conflict: bool,
    pub fail_push: bool,
    /// Flag tripped right after a stash succeeds, simulating a signal that
    /// arrives while the stash operation is in flight
    pub trip_on_stash: Option<InterruptFlag>,
}

impl MockRepository {
    /// Create a mock on branch "main" with a clean working tree
    pub fn new() -> Self {
        MockRepository {
            branch: "main".to_string(),
            status: WorktreeStatus::clean(),
            tags: Vec::new(),
            remotes: HashMap::new(),
            stash_depth: 0,
            commit_count: 1,
            ops: Vec::new(),
            is_repo: true,
            fail_stash_pop_with_conflict: false,
            fail_push: false,
            trip_on_stash: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_dirty_paths(mut self, paths: &[&str]) -> Self {
        self.status = WorktreeStatus {
            dirty: true,
            changed_paths: paths.iter().map(|p| p.to_string()).collect(),
        };
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    pub fn with_remote(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.insert(name.into(), url.into());
        self
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn is_repository(&self) -> bool {
        self.is_repo
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn status(&self) -> Result<WorktreeStatus> {
        Ok(self.status.clone())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.tags.last().cloned())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.iter().any(|t| t == name))
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(name).cloned())
    }

    fn stage_all(&mut self) -> Result<()> {
        self.ops.push("stage_all".to_string());
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.ops.push(format!("commit {}", message.lines().next().unwrap_or("")));
        self.commit_count += 1;
        Ok(())
    }

    fn create_tag(&mut self, name: &str) -> Result<()> {
        self.ops.push(format!("create_tag {}", name));
        if self.tags.iter().any(|t| t == name) {
            return Err(GitBumpError::Git(git2::Error::from_str(
                "tag already exists",
            )));
        }
        self.tags.push(name.to_string());
        Ok(())
    }

    fn delete_tag(&mut self, name: &str) -> Result<()> {
        self.ops.push(format!("delete_tag {}", name));
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        if self.tags.len() == before {
            return Err(GitBumpError::Git(git2::Error::from_str("tag not found")));
        }
        Ok(())
    }

    fn stash_push(&mut self, label: &str) -> Result<()> {
        self.ops.push(format!("stash_push {}", label));
        self.stash_depth += 1;
        self.status = WorktreeStatus::clean();
        if let Some(flag) = &self.trip_on_stash {
            flag.trip();
        }
        Ok(())
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.ops.push("stash_pop".to_string());
        if self.fail_stash_pop_with_conflict {
            return Err(GitBumpError::StashConflict(
                "conflicting edits in working tree".to_string(),
            ));
        }
        if self.stash_depth == 0 {
            return Err(GitBumpError::Git(git2::Error::from_str("no stash entry")));
        }
        self.stash_depth -= 1;
        Ok(())
    }

    fn hard_reset_to_previous_commit(&mut self) -> Result<()> {
        self.ops.push("hard_reset".to_string());
        self.commit_count = self.commit_count.saturating_sub(1);
        Ok(())
    }

    fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.ops.push(format!("push {} {}", remote, branch));
        if self.fail_push {
            return Err(GitBumpError::remote("connection refused"));
        }
        Ok(())
    }

    fn push_tags(&mut self, remote: &str) -> Result<()> {
        self.ops.push(format!("push_tags {}", remote));
        if self.fail_push {
            return Err(GitBumpError::remote("connection refused"));
        }
        Ok(())
    }

    fn fetch(&mut self, remote: &str) -> Result<()> {
        self.ops.push(format!("fetch {}", remote));
        Ok(())
    }
}
