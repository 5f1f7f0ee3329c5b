use std::fmt;

use crate::error::{ReleaseError, Result};

/// The version being released.
///
/// Parsed once from the command line and immutable afterwards. Build
/// metadata is accepted on input but never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl VersionSpec {
    /// Creates a full (non-prerelease) version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionSpec {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parses a semantic version, with or without a leading `v`.
    ///
    /// # Example
    /// ```
    /// # use release_train::version::VersionSpec;
    /// let v = VersionSpec::parse("v1.2.3-rc1").unwrap();
    /// assert_eq!(v.canonical(), "v1.2.3-rc1");
    /// assert_eq!(v.openapi_version(), "1.2.3-rc1");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parsed = semver::Version::parse(bare).map_err(|e| {
            ReleaseError::input(format!("'{}' is not a semantic version: {}", input, e))
        })?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(parsed.pre.as_str().to_string())
        };

        Ok(VersionSpec {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        })
    }

    /// True for release candidates and other prerelease builds.
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Tag form used for git tags, chart fields and dependency pins.
    pub fn canonical(&self) -> String {
        format!("v{}", self.openapi_version())
    }

    /// Unprefixed form written into OpenAPI documents.
    pub fn openapi_version(&self) -> String {
        match &self.prerelease {
            Some(pre) => format!("{}.{}.{}-{}", self.major, self.minor, self.patch, pre),
            None => format!("{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl std::str::FromStr for VersionSpec {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        VersionSpec::parse(s)
    }
}
