//! Package manifest access: reads and rewrites the `version` field
//!
//! The mutation is split in two phases. `preview` computes the next version
//! without touching disk, so the workflow knows the exact tag name (and can
//! check it for collisions) before anything durable happens. `apply` then
//! performs the real edit, which the bump commit picks up.

use crate::domain::{BumpKind, Tag, Version};
use crate::error::{GitBumpError, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name looked up in the working directory
pub const MANIFEST_FILE: &str = "Cargo.toml";

#[derive(Debug, Deserialize)]
struct ManifestDoc {
    package: PackageSection,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    version: String,
}

/// Handle to the project manifest holding the semantic version
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    /// Locate the manifest in a directory
    ///
    /// Fails with an environment error when the file is absent, since no bump
    /// can proceed without it.
    pub fn locate(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(GitBumpError::environment(format!(
                "No {} found in {}",
                MANIFEST_FILE,
                dir.display()
            )));
        }
        Ok(Manifest { path })
    }

    /// Open a manifest at an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Manifest { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current version from the manifest
    pub fn current_version(&self) -> Result<Version> {
        let content = fs::read_to_string(&self.path)?;
        let doc: ManifestDoc = toml::from_str(&content).map_err(|e| {
            GitBumpError::environment(format!("Cannot parse {}: {}", MANIFEST_FILE, e))
        })?;
        Version::parse(&doc.package.version)
    }

    /// Compute the next version for a bump without modifying the manifest
    ///
    /// Idempotent: repeated previews without an intervening apply return the
    /// same result.
    pub fn preview(&self, kind: BumpKind, pre_id: Option<&str>) -> Result<Version> {
        Ok(self.current_version()?.bump(kind, pre_id))
    }

    /// Capture the manifest content before an edit
    pub fn snapshot(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Discard an in-progress edit by restoring a prior snapshot
    pub fn restore(&self, snapshot: &str) -> Result<()> {
        fs::write(&self.path, snapshot)?;
        Ok(())
    }

    /// Apply the bump to the manifest on disk and return the resulting tag
    ///
    /// Only the `version` line is rewritten; the rest of the file keeps its
    /// formatting. No commit is created here - that is the workflow's job.
    pub fn apply(&self, kind: BumpKind, pre_id: Option<&str>) -> Result<Tag> {
        let current = self.current_version()?;
        let next = current.bump(kind, pre_id);

        let content = fs::read_to_string(&self.path)?;
        let re = Regex::new(r#"(?m)^(\s*version\s*=\s*")([^"]+)(")"#)
            .map_err(|e| GitBumpError::environment(format!("Version pattern error: {}", e)))?;

        if !re.is_match(&content) {
            return Err(GitBumpError::environment(format!(
                "No version field found in {}",
                MANIFEST_FILE
            )));
        }

        let updated = re
            .replacen(&content, 1, format!("${{1}}{}${{3}}", next))
            .into_owned();
        fs::write(&self.path, updated)?;

        Ok(Tag::for_version(&next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, version: &str) -> Manifest {
        let content = format!(
            "[package]\nname = \"demo\"\nversion = \"{}\"\nedition = \"2021\"\n\n[dependencies]\nserde = \"1.0\"\n",
            version
        );
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, content).unwrap();
        Manifest::at_path(path)
    }

    #[test]
    fn test_locate_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Manifest::locate(dir.path()),
            Err(GitBumpError::Environment(_))
        ));
    }

    #[test]
    fn test_current_version() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, "1.2.3");
        assert_eq!(manifest.current_version().unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_preview_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, "1.2.3");

        let first = manifest.preview(BumpKind::Minor, None).unwrap();
        let second = manifest.preview(BumpKind::Minor, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "1.3.0");

        // The file itself is untouched
        assert_eq!(manifest.current_version().unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_apply_rewrites_version_only() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, "1.2.3");

        let tag = manifest.apply(BumpKind::Minor, None).unwrap();
        assert_eq!(tag.name, "v1.3.0");

        let content = fs::read_to_string(manifest.path()).unwrap();
        assert!(content.contains("version = \"1.3.0\""));
        // Dependency versions are not touched
        assert!(content.contains("serde = \"1.0\""));
        assert!(content.contains("edition = \"2021\""));
    }

    #[test]
    fn test_apply_prerelease() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, "1.2.3-beta.2");

        let tag = manifest
            .apply(BumpKind::Prerelease, Some("beta"))
            .unwrap();
        assert_eq!(tag.name, "v1.2.3-beta.3");
        assert_eq!(
            manifest.current_version().unwrap().to_string(),
            "1.2.3-beta.3"
        );
    }
}
