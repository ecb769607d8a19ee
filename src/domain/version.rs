use crate::domain::prerelease::PreRelease;
use crate::error::{GitBumpError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which semantic-version component a bump increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
}

impl BumpKind {
    /// All accepted kinds, in prompt display order
    pub const ALL: [BumpKind; 7] = [
        BumpKind::Major,
        BumpKind::Minor,
        BumpKind::Patch,
        BumpKind::Premajor,
        BumpKind::Preminor,
        BumpKind::Prepatch,
        BumpKind::Prerelease,
    ];

    /// Whether this kind produces a pre-release version
    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            BumpKind::Premajor | BumpKind::Preminor | BumpKind::Prepatch | BumpKind::Prerelease
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::Premajor => "premajor",
            BumpKind::Preminor => "preminor",
            BumpKind::Prepatch => "prepatch",
            BumpKind::Prerelease => "prerelease",
        }
    }
}

impl FromStr for BumpKind {
    type Err = GitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            "premajor" => Ok(BumpKind::Premajor),
            "preminor" => Ok(BumpKind::Preminor),
            "prepatch" => Ok(BumpKind::Prepatch),
            "prerelease" => Ok(BumpKind::Prerelease),
            other => Err(GitBumpError::input(format!(
                "Unknown bump kind '{}' - expected one of: major, minor, patch, premajor, preminor, prepatch, prerelease",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic version with an optional pre-release component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre: Option<PreRelease>,
}

impl Version {
    /// Create a release version (no pre-release component)
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Parse a version string like "1.2.3" or "1.2.3-beta.1"
    ///
    /// A leading 'v' or 'V' prefix is tolerated so tag names parse too.
    pub fn parse(s: &str) -> Result<Self> {
        let clean = s.trim_start_matches('v').trim_start_matches('V');

        let (numeric, pre) = match clean.split_once('-') {
            Some((n, p)) => (n, Some(PreRelease::parse(p)?)),
            None => (clean, None),
        };

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() != 3 {
            return Err(GitBumpError::version(format!(
                "Invalid version format: '{}' - expected MAJOR.MINOR.PATCH[-PRERELEASE]",
                s
            )));
        }

        let component = |idx: usize, name: &str| -> Result<u32> {
            parts[idx].parse::<u32>().map_err(|_| {
                GitBumpError::version(format!("Invalid {} version: '{}'", name, parts[idx]))
            })
        };

        Ok(Version {
            major: component(0, "major")?,
            minor: component(1, "minor")?,
            patch: component(2, "patch")?,
            pre,
        })
    }

    /// Compute the next version for a bump kind
    ///
    /// Numeric bumps increment the requested component, reset lower-precedence
    /// components to zero and drop any pre-release. Pre- kinds do the same
    /// numeric bump and start a fresh `<identifier>.0` counter. `prerelease`
    /// increments the counter when the current version already carries a
    /// pre-release with the same identifier; otherwise it starts a new cycle
    /// (on top of a patch bump when the current version is a release).
    ///
    /// Pure: the receiver is never modified, so the computation can be
    /// previewed any number of times before a real apply.
    pub fn bump(&self, kind: BumpKind, pre_id: Option<&str>) -> Version {
        match kind {
            BumpKind::Major => Version::new(self.major + 1, 0, 0),
            BumpKind::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpKind::Patch => Version::new(self.major, self.minor, self.patch + 1),
            BumpKind::Premajor => Version {
                pre: Some(PreRelease::start(pre_id)),
                ..Version::new(self.major + 1, 0, 0)
            },
            BumpKind::Preminor => Version {
                pre: Some(PreRelease::start(pre_id)),
                ..Version::new(self.major, self.minor + 1, 0)
            },
            BumpKind::Prepatch => Version {
                pre: Some(PreRelease::start(pre_id)),
                ..Version::new(self.major, self.minor, self.patch + 1)
            },
            BumpKind::Prerelease => match &self.pre {
                Some(pre) if pre.matches_identifier(pre_id) => Version {
                    pre: Some(pre.increment()),
                    ..self.clone()
                },
                Some(_) => Version {
                    pre: Some(PreRelease::start(pre_id)),
                    ..self.clone()
                },
                None => Version {
                    pre: Some(PreRelease::start(pre_id)),
                    ..Version::new(self.major, self.minor, self.patch + 1)
                },
            },
        }
    }

    /// Convert to a `semver::Version` for precedence comparisons
    pub fn to_semver(&self) -> semver::Version {
        let mut v = semver::Version::new(
            u64::from(self.major),
            u64::from(self.minor),
            u64::from(self.patch),
        );
        if let Some(pre) = &self.pre {
            // Our pre-release strings are valid semver by construction
            if let Ok(p) = semver::Prerelease::new(&pre.to_string()) {
                v.pre = p;
            }
        }
        v
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver().cmp(&other.to_semver())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_with_v_prefix() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("V1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_prerelease() {
        let v = Version::parse("1.2.3-beta.2").unwrap();
        assert_eq!(v.major, 1);
        let pre = v.pre.unwrap();
        assert_eq!(pre.identifier.as_deref(), Some("beta"));
        assert_eq!(pre.iteration, Some(2));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("a.b.c").is_err());
    }

    #[test]
    fn test_bump_major() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpKind::Major, None).to_string(), "2.0.0");
    }

    #[test]
    fn test_bump_minor() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpKind::Minor, None).to_string(), "1.3.0");
    }

    #[test]
    fn test_bump_patch() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpKind::Patch, None).to_string(), "1.2.4");
    }

    #[test]
    fn test_bump_drops_prerelease() {
        let v = Version::parse("1.2.3-beta.2").unwrap();
        assert_eq!(v.bump(BumpKind::Minor, None).to_string(), "1.3.0");
    }

    #[test]
    fn test_bump_premajor() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(
            v.bump(BumpKind::Premajor, Some("beta")).to_string(),
            "2.0.0-beta.0"
        );
    }

    #[test]
    fn test_bump_preminor() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(
            v.bump(BumpKind::Preminor, Some("rc")).to_string(),
            "1.3.0-rc.0"
        );
    }

    #[test]
    fn test_bump_prepatch() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(
            v.bump(BumpKind::Prepatch, Some("alpha")).to_string(),
            "1.2.4-alpha.0"
        );
    }

    #[test]
    fn test_bump_prerelease_same_identifier() {
        let v = Version::parse("1.2.3-beta.2").unwrap();
        assert_eq!(
            v.bump(BumpKind::Prerelease, Some("beta")).to_string(),
            "1.2.3-beta.3"
        );
    }

    #[test]
    fn test_bump_prerelease_new_identifier() {
        let v = Version::parse("1.2.3-alpha.4").unwrap();
        assert_eq!(
            v.bump(BumpKind::Prerelease, Some("beta")).to_string(),
            "1.2.3-beta.0"
        );
    }

    #[test]
    fn test_bump_prerelease_from_release() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(
            v.bump(BumpKind::Prerelease, Some("beta")).to_string(),
            "1.2.4-beta.0"
        );
    }

    #[test]
    fn test_bump_prerelease_without_identifier() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpKind::Prerelease, None).to_string(), "1.2.4-0");

        let again = v.bump(BumpKind::Prerelease, None);
        assert_eq!(
            again.bump(BumpKind::Prerelease, None).to_string(),
            "1.2.4-1"
        );
    }

    #[test]
    fn test_bump_is_pure() {
        let v = Version::parse("1.2.3-beta.2").unwrap();
        let first = v.bump(BumpKind::Prerelease, Some("beta"));
        let second = v.bump(BumpKind::Prerelease, Some("beta"));
        assert_eq!(first, second);
        assert_eq!(v.to_string(), "1.2.3-beta.2");
    }

    #[test]
    fn test_bump_is_strictly_greater() {
        // Identifier switches can lower precedence (rc -> beta sorts
        // backwards), so every start here uses "beta" or an identifier that
        // sorts below it.
        let starts = ["0.0.1", "1.2.3", "1.2.3-beta.2", "9.0.0-alpha"];
        for start in starts {
            let v = Version::parse(start).unwrap();
            for kind in BumpKind::ALL {
                let id = kind.is_pre().then_some("beta");
                let next = v.bump(kind, id);
                assert!(
                    next > v,
                    "{} bumped with {} gave {} which is not greater",
                    v,
                    kind,
                    next
                );
            }
        }
    }

    #[test]
    fn test_semver_ordering() {
        let release = Version::parse("1.3.0").unwrap();
        let pre = Version::parse("1.3.0-rc.1").unwrap();
        assert!(release > pre);
    }

    #[test]
    fn test_bump_kind_from_str() {
        assert_eq!("minor".parse::<BumpKind>().unwrap(), BumpKind::Minor);
        assert_eq!(
            "PRERELEASE".parse::<BumpKind>().unwrap(),
            BumpKind::Prerelease
        );
        assert!("biggest".parse::<BumpKind>().is_err());
    }

    #[test]
    fn test_bump_kind_is_pre() {
        assert!(BumpKind::Premajor.is_pre());
        assert!(BumpKind::Prerelease.is_pre());
        assert!(!BumpKind::Patch.is_pre());
    }
}
