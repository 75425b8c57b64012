//! Release preflight checks
//!
//! Release and bundle invocations must not start compiling unless both
//! the keystore and the credentials file are in place.

use std::path::{Path, PathBuf};
use vocario_core::error::{Error, Result};

/// Substrings that mark a task as release-type
const RELEASE_MARKERS: [&str; 2] = ["Release", "Bundle"];

/// Whether any requested task is a release or bundle task
///
/// The match is a case-sensitive substring test, so `assembleRelease`,
/// `bundleRelease` and `:app:signingReportBundle` all count, while
/// `bundle` alone does not.
pub fn is_release_invocation<S: AsRef<str>>(task_names: &[S]) -> bool {
    task_names.iter().any(|task| {
        let task = task.as_ref();
        RELEASE_MARKERS.iter().any(|marker| task.contains(marker))
    })
}

/// Files a release build depends on
#[derive(Debug, Clone)]
pub struct ReleaseInputs<'a> {
    /// Keystore binary
    pub keystore_file: &'a Path,
    /// Credentials text file
    pub credentials_file: &'a Path,
}

/// Verify release prerequisites for the requested tasks
///
/// Non-release invocations pass without touching the filesystem. For
/// release invocations the keystore is checked first, then the
/// credentials file; the first missing one aborts with its absolute path.
pub fn check_prerequisites<S: AsRef<str>>(
    inputs: &ReleaseInputs<'_>,
    task_names: &[S],
) -> Result<()> {
    if !is_release_invocation(task_names) {
        tracing::debug!("Not a release invocation, skipping preflight");
        return Ok(());
    }

    if !inputs.keystore_file.exists() {
        return Err(missing(
            "Keystore file",
            inputs.keystore_file,
            "exists in the android root directory",
        ));
    }

    if !inputs.credentials_file.exists() {
        return Err(missing(
            "Credentials file",
            inputs.credentials_file,
            "exists in the android root directory with keystore credentials \
             (storePassword, keyPassword, keyAlias, storeFile)",
        ));
    }

    tracing::debug!("Release prerequisites present");
    Ok(())
}

fn missing(what: &str, path: &Path, remedy: &str) -> Error {
    let absolute = absolute_path(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Error::missing_prerequisite(
        what,
        &absolute,
        format!("Please ensure '{}' {}.", name, remedy),
    )
}

/// Best-effort absolute form of a path that may not exist
pub fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocario_core::error::ErrorCode;

    #[test]
    fn test_release_invocation_detection() {
        assert!(is_release_invocation(&["assembleRelease"]));
        assert!(is_release_invocation(&["clean", "bundleRelease"]));
        assert!(is_release_invocation(&["appBundleDebug"]));
        assert!(!is_release_invocation(&["assembleDebug"]));
        assert!(!is_release_invocation(&["bundle", "release"]));
        assert!(!is_release_invocation::<&str>(&[]));
    }

    #[test]
    fn test_non_release_skips_checks() {
        let inputs = ReleaseInputs {
            keystore_file: Path::new("/nonexistent/release.jks"),
            credentials_file: Path::new("/nonexistent/credentials.txt"),
        };
        assert!(check_prerequisites(&inputs, &["assembleDebug"]).is_ok());
    }

    #[test]
    fn test_missing_keystore_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("release.jks");
        let credentials = dir.path().join("credentials.txt");
        std::fs::write(&credentials, "keyAlias: upload\n").unwrap();

        let err = check_prerequisites(
            &ReleaseInputs {
                keystore_file: &keystore,
                credentials_file: &credentials,
            },
            &["assembleRelease"],
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::MissingPrerequisite);
        assert!(err.message.contains(&keystore.display().to_string()));
        assert!(err.suggestion.unwrap().contains("release.jks"));
    }

    #[test]
    fn test_missing_credentials_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("release.jks");
        let credentials = dir.path().join("credentials.txt");
        std::fs::write(&keystore, [0xFE, 0xED, 0xFE, 0xED]).unwrap();

        let err = check_prerequisites(
            &ReleaseInputs {
                keystore_file: &keystore,
                credentials_file: &credentials,
            },
            &["bundleRelease"],
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::MissingPrerequisite);
        assert!(err.message.starts_with("Credentials file"));
        assert!(err.message.contains(&credentials.display().to_string()));
    }

    #[test]
    fn test_all_present_passes() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("release.jks");
        let credentials = dir.path().join("credentials.txt");
        std::fs::write(&keystore, b"ks").unwrap();
        std::fs::write(&credentials, "").unwrap();

        let inputs = ReleaseInputs {
            keystore_file: &keystore,
            credentials_file: &credentials,
        };
        assert!(check_prerequisites(&inputs, &["assembleRelease"]).is_ok());
    }

    #[test]
    fn test_absolute_path_of_relative() {
        let abs = absolute_path(Path::new("android/credentials.txt"));
        assert!(abs.is_absolute());
        assert!(abs.ends_with("android/credentials.txt"));
    }
}
