//! Version name and code from the Flutter pubspec
//!
//! Flutter derives Android `versionName` / `versionCode` from the
//! `version: <name>+<code>` line of `pubspec.yaml`.

use crate::artifact::ArtifactKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use vocario_core::error::{Error, Result};

static VERSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^version:\s*["']?([^\s"'+#]+)(?:\+([^\s"'#]+))?["']?\s*(?:#.*)?$"#)
        .expect("version regex is valid")
});

/// Build number Flutter uses when the pubspec has none
pub const DEFAULT_VERSION_CODE: u32 = 1;

/// Application version as seen by the Android build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppVersion {
    /// Human-readable version name
    pub name: String,
    /// Monotonic integer version code
    pub code: u32,
}

/// Parse the `version:` line of pubspec text
pub fn parse_pubspec_version(text: &str) -> Result<AppVersion> {
    let caps = VERSION_LINE
        .captures(text)
        .ok_or_else(|| Error::invalid_version("No `version:` entry in pubspec"))?;

    let name = caps[1].to_string();
    let code = match caps.get(2) {
        Some(m) => m.as_str().parse::<u32>().map_err(|_| {
            let build = m.as_str();
            Error::invalid_version(format!("Build number '{}' is not a positive integer", build))
        })?,
        None => DEFAULT_VERSION_CODE,
    };

    Ok(AppVersion { name, code })
}

/// Read the version from a pubspec file
pub fn read_pubspec_version(path: &Path) -> Result<AppVersion> {
    if !path.exists() {
        return Err(Error::file_not_found(path)
            .with_suggestion("Run from the Flutter project root or pass --version-code"));
    }
    let text = std::fs::read_to_string(path)?;
    parse_pubspec_version(&text)
        .map_err(|e| e.with_context(format!("While reading {}", path.display())))
}

/// Version code to embed in artifacts
///
/// An explicit override wins; otherwise the pubspec is consulted.
pub fn resolve_version_code(explicit: Option<u32>, pubspec: &Path) -> Result<u32> {
    match explicit {
        Some(code) => Ok(code),
        None => read_pubspec_version(pubspec).map(|v| v.code),
    }
}

/// Version code for a task
///
/// Only tasks whose artifact gets renamed need a real version code, so
/// the pubspec is read for those alone.
pub fn version_code_for_task(task: &str, explicit: Option<u32>, pubspec: &Path) -> Result<u32> {
    if ArtifactKind::for_task(task).is_some() {
        resolve_version_code(explicit, pubspec)
    } else {
        Ok(explicit.unwrap_or(DEFAULT_VERSION_CODE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocario_core::error::ErrorCode;

    #[test]
    fn test_parse_name_and_code() {
        let text = "name: vocario\ndescription: Voice notes\nversion: 1.4.2+42\n\n\
                    environment:\n  sdk: '>=3.0.0'\n";
        assert_eq!(
            parse_pubspec_version(text).unwrap(),
            AppVersion {
                name: "1.4.2".to_string(),
                code: 42
            }
        );
    }

    #[test]
    fn test_parse_without_build_number() {
        let v = parse_pubspec_version("version: 2.0.0\n").unwrap();
        assert_eq!(v.name, "2.0.0");
        assert_eq!(v.code, DEFAULT_VERSION_CODE);
    }

    #[test]
    fn test_parse_quoted_with_comment() {
        let v = parse_pubspec_version("version: \"1.0.0+7\" # bump before release\n").unwrap();
        assert_eq!(v.code, 7);
    }

    #[test]
    fn test_nested_version_key_ignored() {
        let text = "dependencies:\n  foo:\n    version: 1.0.0+3\n";
        let err = parse_pubspec_version(text).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidVersion);
    }

    #[test]
    fn test_non_numeric_build_number() {
        let err = parse_pubspec_version("version: 1.0.0+beta\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidVersion);
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let missing = Path::new("/nonexistent/pubspec.yaml");
        assert_eq!(resolve_version_code(Some(9), missing).unwrap(), 9);
    }

    #[test]
    fn test_resolve_reads_pubspec() {
        let dir = tempfile::tempdir().unwrap();
        let pubspec = dir.path().join("pubspec.yaml");
        std::fs::write(&pubspec, "name: vocario\nversion: 1.0.0+12\n").unwrap();

        assert_eq!(resolve_version_code(None, &pubspec).unwrap(), 12);
    }

    #[test]
    fn test_version_code_for_non_renaming_task_skips_pubspec() {
        let missing = Path::new("/nonexistent/pubspec.yaml");
        assert_eq!(version_code_for_task("assembleDebug", None, missing).unwrap(), 1);
        assert_eq!(version_code_for_task("bundleDebug", Some(5), missing).unwrap(), 5);
        assert!(version_code_for_task("assembleRelease", None, missing).is_err());
    }

    #[test]
    fn test_missing_pubspec() {
        let err = read_pubspec_version(Path::new("/nonexistent/pubspec.yaml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
