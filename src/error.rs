use thiserror::Error;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum GitBumpError {
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Branch '{branch}' is not allowed for version bumps")]
    BranchNotAllowed { branch: String },

    #[error("Tag '{tag}' already exists")]
    TagCollision { tag: String },

    #[error("Stash could not be restored cleanly: {0}")]
    StashConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interrupted by user")]
    Interrupted,
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, GitBumpError>;

impl GitBumpError {
    /// Create an environment error with context
    pub fn environment(msg: impl Into<String>) -> Self {
        GitBumpError::Environment(msg.into())
    }

    /// Create an input validation error with context
    pub fn input(msg: impl Into<String>) -> Self {
        GitBumpError::Input(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitBumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitBumpError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitBumpError::Remote(msg.into())
    }

    /// True for errors that abort the run before any side effect happened
    pub fn is_pre_transaction(&self) -> bool {
        matches!(
            self,
            GitBumpError::Environment(_)
                | GitBumpError::Input(_)
                | GitBumpError::BranchNotAllowed { .. }
        )
    }
}
