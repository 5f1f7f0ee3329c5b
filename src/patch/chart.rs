use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::patch::{rewrite_file, rewrite_lines};
use crate::version::VersionSpec;

fn chart_version_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(version|appVersion):").expect("valid chart regex"))
}

/// Rewrites top-level `version:` and `appVersion:` keys to the canonical tag.
///
/// Only unindented keys match, so nested `version:` fields (dependency
/// entries, for instance) are left alone. Every other line is copied through.
pub fn patch_chart(contents: &str, version: &VersionSpec) -> String {
    let tag = version.canonical();
    rewrite_lines(contents, chart_version_line(), |caps| {
        format!("{}: {}", &caps[1], tag)
    })
}

/// Patches the chart at `path` in place.
pub fn patch_chart_file(path: &Path, version: &VersionSpec) -> Result<()> {
    rewrite_file(path, |contents| patch_chart(contents, version))
}
