use crate::error::{GitBumpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the user-level settings file
pub const SETTINGS_FILE: &str = ".gitbump.toml";

/// Returns the default branch allow-list for version bumps.
fn default_allowed_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_check_updates() -> bool {
    true
}

/// Persisted user-level settings for git-bump.
///
/// Governs which branches version bumps are permitted on and whether the tool
/// checks for updates on startup. The bump workflow itself consumes only the
/// branch allow-list.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_allowed_branches")]
    pub allowed_branches: Vec<String>,

    #[serde(default = "default_check_updates")]
    pub check_updates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            allowed_branches: default_allowed_branches(),
            check_updates: default_check_updates(),
        }
    }
}

impl Settings {
    /// Loads settings from file, writing defaults first if no file exists.
    ///
    /// Resolution order:
    /// 1. Custom path provided as parameter
    /// 2. `.gitbump.toml` in the user config directory
    ///
    /// When neither exists, the defaults are written to the user config
    /// directory (best-effort) and returned.
    ///
    /// # Arguments
    /// * `custom_path` - Optional path to a custom settings file
    pub fn load(custom_path: Option<&str>) -> Result<Settings> {
        if let Some(path) = custom_path {
            return Self::read_file(Path::new(path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::read_file(&path),
            Some(path) => {
                let settings = Settings::default();
                // A failed write only means the defaults are recreated next run
                let _ = settings.write_to(&path);
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Location of the settings file in the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_FILE))
    }

    fn read_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path).map_err(|e| {
            GitBumpError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| GitBumpError::config(format!("Cannot parse {}: {}", path.display(), e)))
    }

    /// Serialize the settings to a file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GitBumpError::config(format!("Cannot serialize settings: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Whether bumping is permitted on the given branch
    pub fn is_branch_allowed(&self, branch: &str) -> bool {
        self.allowed_branches.iter().any(|b| b == branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.allowed_branches, vec!["main", "master"]);
        assert!(settings.check_updates);
    }

    #[test]
    fn test_branch_allowed() {
        let settings = Settings::default();
        assert!(settings.is_branch_allowed("main"));
        assert!(settings.is_branch_allowed("master"));
        assert!(!settings.is_branch_allowed("feature/x"));
    }

    #[test]
    fn test_load_custom_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "allowed_branches = [\"release\"]\ncheck_updates = false\n",
        )
        .unwrap();

        let settings = Settings::load(path.to_str()).unwrap();
        assert_eq!(settings.allowed_branches, vec!["release"]);
        assert!(!settings.check_updates);
    }

    #[test]
    fn test_load_custom_path_missing() {
        assert!(matches!(
            Settings::load(Some("/nonexistent/gitbump.toml")),
            Err(GitBumpError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "check_updates = false\n").unwrap();

        let settings = Settings::load(path.to_str()).unwrap();
        assert_eq!(settings.allowed_branches, vec!["main", "master"]);
        assert!(!settings.check_updates);
    }

    #[test]
    fn test_write_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.allowed_branches.push("develop".to_string());
        settings.write_to(&path).unwrap();

        let loaded = Settings::load(path.to_str()).unwrap();
        assert_eq!(loaded, settings);
    }
}
