use crate::domain::version::Version;
use regex::Regex;

/// Conventional tag prefix used for release tags
const TAG_PREFIX: &str = "v";

/// Represents a git tag for a release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a tag from a raw name
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Build the conventional tag for a version (e.g. "v1.2.0-beta.1")
    pub fn for_version(version: &Version) -> Self {
        Tag {
            name: format!("{}{}", TAG_PREFIX, version),
        }
    }

    /// Extract a pre-release identifier from the tag name, best-effort
    ///
    /// Matches the `vMAJOR.MINOR.PATCH-IDENTIFIER[.N]` shape and returns the
    /// identifier part; `None` for release tags or anything unparsable. Used
    /// to pre-populate the identifier prompt from the most recent tag.
    pub fn pre_release_identifier(&self) -> Option<String> {
        let re = Regex::new(r"^[vV]?\d+\.\d+\.\d+-([0-9A-Za-z-]*[A-Za-z-][0-9A-Za-z-]*)(?:\.\d+)?$")
            .ok()?;
        re.captures(&self.name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_version() {
        let v = Version::parse("1.3.0").unwrap();
        assert_eq!(Tag::for_version(&v).name, "v1.3.0");
    }

    #[test]
    fn test_for_version_prerelease() {
        let v = Version::parse("1.2.0-beta.1").unwrap();
        assert_eq!(Tag::for_version(&v).name, "v1.2.0-beta.1");
    }

    #[test]
    fn test_identifier_extraction() {
        assert_eq!(
            Tag::new("v1.2.3-beta.2").pre_release_identifier().as_deref(),
            Some("beta")
        );
        assert_eq!(
            Tag::new("v1.2.3-rc").pre_release_identifier().as_deref(),
            Some("rc")
        );
    }

    #[test]
    fn test_identifier_extraction_release_tag() {
        assert_eq!(Tag::new("v1.2.3").pre_release_identifier(), None);
    }

    #[test]
    fn test_identifier_extraction_bare_counter() {
        // "v1.2.4-0" has a counter but no identifier
        assert_eq!(Tag::new("v1.2.4-0").pre_release_identifier(), None);
    }

    #[test]
    fn test_identifier_extraction_unparsable() {
        assert_eq!(Tag::new("release-2024").pre_release_identifier(), None);
        assert_eq!(Tag::new("").pre_release_identifier(), None);
    }
}
