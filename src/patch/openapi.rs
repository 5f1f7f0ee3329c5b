use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::patch::{rewrite_file, rewrite_lines};
use crate::version::VersionSpec;

fn openapi_version_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([ \t]+version):[ \t]+[0-9]+\.[0-9]+\.[0-9]+(?:([ \t]+#.*)|[ \t]*)$")
            .expect("valid openapi regex")
    })
}

/// Rewrites indented `version: N.N.N` lines to the unprefixed release version.
///
/// Values that already carry a prerelease suffix, or are quoted, do not match.
/// A trailing comment is kept.
pub fn patch_openapi(contents: &str, version: &VersionSpec) -> String {
    let full = version.openapi_version();
    rewrite_lines(contents, openapi_version_line(), |caps| {
        let comment = caps.get(2).map_or("", |m| m.as_str());
        format!("{}: {}{}", &caps[1], full, comment)
    })
}

/// Patches the OpenAPI document at `path` in place.
pub fn patch_openapi_file(path: &Path, version: &VersionSpec) -> Result<()> {
    rewrite_file(path, |contents| patch_openapi(contents, version))
}
