//! Pre-release version handling for semantic versioning
//!
//! Supports free-form pre-release identifiers ("beta", "rc", ...) with an
//! optional iteration counter, per https://semver.org/#spec-item-9

use crate::error::{GitBumpError, Result};
use std::fmt;

/// Pre-release component of a version, e.g. "beta.1" or "rc"
///
/// The identifier is optional: a version like `1.2.4-0` carries only a
/// counter. The counter is optional when parsed from an existing version
/// (`1.2.3-beta`), but every counter produced by a bump is explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// Free-form identifier (alphanumeric and hyphens)
    pub identifier: Option<String>,
    /// Iteration counter, incremented per pre-release cycle
    pub iteration: Option<u32>,
}

impl PreRelease {
    /// Start a new pre-release cycle for the given identifier, counter at 0
    pub fn start(identifier: Option<&str>) -> Self {
        PreRelease {
            identifier: identifier.map(str::to_string),
            iteration: Some(0),
        }
    }

    /// Parse a pre-release string like "beta.1", "rc", or "0"
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(GitBumpError::version("Empty pre-release component"));
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 {
            return Err(GitBumpError::version(format!(
                "Unsupported pre-release format: '{}'",
                s
            )));
        }

        // A single numeric segment is a bare counter, not an identifier
        if parts.len() == 1 {
            if let Ok(n) = parts[0].parse::<u32>() {
                return Ok(PreRelease {
                    identifier: None,
                    iteration: Some(n),
                });
            }
        }

        let identifier = validate_identifier(parts[0])?;

        let iteration = if parts.len() == 2 {
            Some(parts[1].parse::<u32>().map_err(|_| {
                GitBumpError::version(format!("Invalid iteration number: '{}'", parts[1]))
            })?)
        } else {
            None
        };

        Ok(PreRelease {
            identifier: Some(identifier),
            iteration,
        })
    }

    /// Whether this pre-release uses the given identifier
    pub fn matches_identifier(&self, identifier: Option<&str>) -> bool {
        self.identifier.as_deref() == identifier
    }

    /// Next iteration of the same cycle: "beta.2" -> "beta.3", "beta" -> "beta.0"
    pub fn increment(&self) -> Self {
        PreRelease {
            identifier: self.identifier.clone(),
            iteration: Some(self.iteration.map_or(0, |n| n + 1)),
        }
    }
}

/// Validate a free-form pre-release identifier (non-empty, alphanumeric/hyphen)
pub fn validate_identifier(s: &str) -> Result<String> {
    if s.is_empty() {
        return Err(GitBumpError::input("Pre-release identifier must not be empty"));
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(GitBumpError::input(format!(
            "Invalid pre-release identifier: '{}'",
            s
        )));
    }
    Ok(s.to_string())
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.identifier, self.iteration) {
            (Some(id), Some(n)) => write!(f, "{}.{}", id, n),
            (Some(id), None) => write!(f, "{}", id),
            (None, Some(n)) => write!(f, "{}", n),
            (None, None) => Ok(()),
        }
    }
}
