use crate::error::{GitBumpError, Result};
use crate::git::{Repository, WorktreeStatus};
use git2::{Repository as Git2Repo, ResetType, StashFlags, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository from a path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            GitBumpError::environment(format!("Not inside a git repository: {}", e))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from an existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

/// Remote callbacks with the SSH credential chain
///
/// Tries SSH keys from ~/.ssh in order of preference, then the SSH agent,
/// then default credentials.
fn remote_callbacks() -> git2::RemoteCallbacks<'static> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            let key_paths = vec![
                format!("{}/.ssh/id_ed25519", home),
                format!("{}/.ssh/id_rsa", home),
                format!("{}/.ssh/id_ecdsa", home),
            ];

            for key_path in key_paths {
                let path = std::path::Path::new(&key_path);
                if path.exists() {
                    if let Ok(cred) =
                        git2::Cred::ssh_key(username_from_url.unwrap_or("git"), None, path, None)
                    {
                        return Ok(cred);
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl Repository for Git2Repository {
    fn is_repository(&self) -> bool {
        // Construction already discovered a repository
        true
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| GitBumpError::environment("HEAD is not on a named branch"))
    }

    fn status(&self) -> Result<WorktreeStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let changed_paths: Vec<String> = statuses
            .iter()
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect();

        Ok(WorktreeStatus {
            dirty: !changed_paths.is_empty(),
            changed_paths,
        })
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        let tags = self.repo.tag_names(None)?;

        // Order by the commit time of the tagged commit; tags pointing at
        // unpeelable objects are skipped.
        let mut latest: Option<(i64, String)> = None;
        for tag_name in tags.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", tag_name)) {
                Ok(r) => r,
                Err(_) => continue,
            };
            let commit = match reference.peel_to_commit() {
                Ok(c) => c,
                Err(_) => continue,
            };
            let when = commit.time().seconds();
            if latest.as_ref().map_or(true, |(t, _)| when >= *t) {
                latest = Some((when, tag_name.to_string()));
            }
        }

        Ok(latest.map(|(_, name)| name))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn stage_all(&mut self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.repo.head()?.peel_to_commit()?;
        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    fn create_tag(&mut self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.tag_lightweight(name, head.as_object(), false)?;
        Ok(())
    }

    fn delete_tag(&mut self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        Ok(())
    }

    fn stash_push(&mut self, label: &str) -> Result<()> {
        let signature = self.repo.signature()?;
        self.repo
            .stash_save(&signature, label, Some(StashFlags::INCLUDE_UNTRACKED))?;
        Ok(())
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.repo.stash_pop(0, None).map_err(|e| {
            if matches!(
                e.code(),
                git2::ErrorCode::Conflict | git2::ErrorCode::MergeConflict
            ) {
                GitBumpError::StashConflict(e.message().to_string())
            } else {
                e.into()
            }
        })
    }

    fn hard_reset_to_previous_commit(&mut self) -> Result<()> {
        let target = self.repo.revparse_single("HEAD~1")?;
        self.repo.reset(&target, ResetType::Hard, None)?;
        Ok(())
    }

    fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitBumpError::remote(format!("Cannot find remote: {}", e)))?;

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| GitBumpError::remote(format!("Push failed: {}", e)))?;

        Ok(())
    }

    fn push_tags(&mut self, remote: &str) -> Result<()> {
        let tags = self.repo.tag_names(None)?;
        let refspecs: Vec<String> = tags
            .iter()
            .flatten()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();

        if refspecs.is_empty() {
            return Ok(());
        }

        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitBumpError::remote(format!("Cannot find remote: {}", e)))?;

        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();
        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| GitBumpError::remote(format!("Tag push failed: {}", e)))?;

        Ok(())
    }

    fn fetch(&mut self, remote_name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| GitBumpError::remote(format!("Cannot find remote: {}", e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        // Fetch all remote branches plus tags
        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = &[refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];
        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                GitBumpError::remote(format!("Failed to fetch from '{}': {}", remote_name, e))
            })?;

        Ok(())
    }
}
