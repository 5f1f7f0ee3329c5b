//! Line-preserving version rewrites for chart and OpenAPI files
//!
//! Both patchers share the same shape: discover the file with a glob
//! relative to the current directory, rewrite matching lines in memory, then
//! replace the file in one rename so an interrupted write leaves the
//! original untouched.

pub mod chart;
pub mod openapi;

pub use chart::{patch_chart, patch_chart_file};
pub use openapi::{patch_openapi, patch_openapi_file};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{ReleaseError, Result};

/// All files matching `pattern`, sorted.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry
            .map_err(|e| ReleaseError::discovery(format!("cannot read {}: {}", pattern, e)))?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

/// The single file matching `pattern`; zero or several matches is an error.
pub fn discover_one(pattern: &str) -> Result<PathBuf> {
    let mut matches = discover(pattern)?;
    match matches.len() {
        1 => Ok(matches.remove(0)),
        n => Err(ReleaseError::discovery(format!(
            "expected exactly one file matching '{}', found {}",
            pattern, n
        ))),
    }
}

/// The file matching `pattern` if there is one; several matches is an error.
pub fn discover_optional(pattern: &str) -> Result<Option<PathBuf>> {
    let mut matches = discover(pattern)?;
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches.remove(0))),
        n => Err(ReleaseError::discovery(format!(
            "expected at most one file matching '{}', found {}",
            pattern, n
        ))),
    }
}

/// Applies `rewrite` to every line of `contents` whose body (terminator
/// stripped) matches `pattern`. Line terminators are carried over as-is.
pub(crate) fn rewrite_lines<F>(contents: &str, pattern: &Regex, rewrite: F) -> String
where
    F: Fn(&regex::Captures<'_>) -> String,
{
    let mut out = String::with_capacity(contents.len());

    for line in contents.split_inclusive('\n') {
        let (body, ending) = split_ending(line);
        match pattern.captures(body) {
            Some(caps) => {
                out.push_str(&rewrite(&caps));
                out.push_str(ending);
            }
            None => out.push_str(line),
        }
    }

    out
}

fn split_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Reads `path`, transforms it and atomically replaces it with the result.
pub(crate) fn rewrite_file<F>(path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(&str) -> String,
{
    let original = fs::read_to_string(path)?;
    let updated = transform(&original);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(updated.as_bytes())?;
    tmp.as_file().sync_all()?;

    let permissions = fs::metadata(path)?.permissions();
    fs::set_permissions(tmp.path(), permissions)?;

    tmp.persist(path).map_err(|e| ReleaseError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    use crate::workdir::WorkdirGuard;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "version: 0.0.0\n").unwrap();
    }

    #[test]
    #[serial]
    fn test_discover_one_recursive_glob() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "charts/core/Chart.yaml");

        let _guard = WorkdirGuard::enter(tmp.path()).unwrap();
        let found = discover_one("charts/**/Chart.yaml").unwrap();
        assert_eq!(found, PathBuf::from("charts/core/Chart.yaml"));
    }

    #[test]
    #[serial]
    fn test_discover_one_rejects_zero_and_many() {
        let tmp = TempDir::new().unwrap();
        let _guard = WorkdirGuard::enter(tmp.path()).unwrap();

        let err = discover_one("charts/**/Chart.yaml").unwrap_err();
        assert!(err.to_string().contains("found 0"));

        touch(tmp.path(), "charts/a/Chart.yaml");
        touch(tmp.path(), "charts/b/Chart.yaml");
        let err = discover_one("charts/**/Chart.yaml").unwrap_err();
        assert!(matches!(err, ReleaseError::Discovery(_)));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    #[serial]
    fn test_discover_optional() {
        let tmp = TempDir::new().unwrap();
        let _guard = WorkdirGuard::enter(tmp.path()).unwrap();

        assert_eq!(discover_optional("pkg/openapi/*.spec.yaml").unwrap(), None);

        touch(tmp.path(), "pkg/openapi/server.spec.yaml");
        assert!(discover_optional("pkg/openapi/*.spec.yaml")
            .unwrap()
            .is_some());

        touch(tmp.path(), "pkg/openapi/other.spec.yaml");
        assert!(discover_optional("pkg/openapi/*.spec.yaml").is_err());
    }

    #[test]
    fn test_rewrite_lines_preserves_terminators() {
        let re = Regex::new(r"^(key):").unwrap();
        let out = rewrite_lines("key: a\r\nother\nkey: b", &re, |caps| {
            format!("{}: z", &caps[1])
        });
        assert_eq!(out, "key: z\r\nother\nkey: z");
    }

    #[test]
    fn test_rewrite_file_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.yaml");
        fs::write(&path, "a\nb\n").unwrap();

        rewrite_file(&path, |s| s.to_uppercase()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\n");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_rewrite_file_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = rewrite_file(&tmp.path().join("absent.yaml"), |s| s.to_string()).unwrap_err();
        assert!(matches!(err, ReleaseError::Io(_)));
    }
}
