//! Release artifact naming
//!
//! After `assembleRelease` or `bundleRelease` the build leaves
//! `app-release.apk` / `app-release.aab` at a conventional location
//! under the build directory. These are renamed to
//! `<app>_<versionCode>.<ext>` in place.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use vocario_core::error::Error;
use walkdir::WalkDir;

/// Packaged output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Installable APK
    Apk,
    /// Play Store app bundle
    Aab,
}

impl ArtifactKind {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Apk => "apk",
            ArtifactKind::Aab => "aab",
        }
    }

    /// Artifact produced by a task, matched by exact name
    pub fn for_task(task: &str) -> Option<Self> {
        match task {
            "assembleRelease" => Some(ArtifactKind::Apk),
            "bundleRelease" => Some(ArtifactKind::Aab),
            _ => None,
        }
    }

    /// Directory holding the unrenamed artifact, relative to the build dir
    pub fn output_subdir(&self) -> &'static Path {
        match self {
            ArtifactKind::Apk => Path::new("outputs/flutter-apk"),
            ArtifactKind::Aab => Path::new("outputs/bundle/release"),
        }
    }

    /// Unrenamed artifact file name
    pub fn default_file_name(&self) -> String {
        format!("app-release.{}", self.extension())
    }

    /// Full path of the unrenamed artifact
    pub fn default_output_path(&self, build_dir: &Path) -> PathBuf {
        build_dir
            .join(self.output_subdir())
            .join(self.default_file_name())
    }

    fn display_name(&self) -> &'static str {
        match self {
            ArtifactKind::Apk => "APK",
            ArtifactKind::Aab => "AAB",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// `<app>_<versionCode>.<ext>`
pub fn renamed_file_name(app_name: &str, version_code: u32, kind: ArtifactKind) -> String {
    format!("{}_{}.{}", app_name, version_code, kind.extension())
}

/// What the rename step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenameOutcome {
    /// The task does not produce a renamable artifact
    NotTriggered,
    /// The expected artifact was not there; nothing changed
    Skipped {
        /// Path that was looked for
        expected: PathBuf,
    },
    /// Artifact moved to its versioned name
    Renamed {
        /// Artifact kind
        kind: ArtifactKind,
        /// Previous path
        from: PathBuf,
        /// New path
        to: PathBuf,
    },
    /// The move failed; the original artifact is left in place
    Failed {
        /// Previous path
        from: PathBuf,
        /// Intended path
        to: PathBuf,
        /// Error description
        reason: String,
    },
}

impl RenameOutcome {
    /// Whether the filesystem was changed
    pub fn is_renamed(&self) -> bool {
        matches!(self, RenameOutcome::Renamed { .. })
    }
}

/// Rename the artifact produced by `task`, if any
///
/// Never fails: a missing artifact is a no-op and an I/O failure is
/// logged as a warning and reported in the outcome.
pub fn rename_after_task(
    build_dir: &Path,
    task: &str,
    app_name: &str,
    version_code: u32,
) -> RenameOutcome {
    let Some(kind) = ArtifactKind::for_task(task) else {
        return RenameOutcome::NotTriggered;
    };

    let from = kind.default_output_path(build_dir);
    if !from.exists() {
        tracing::debug!(path = %from.display(), "No {} to rename", kind);
        return RenameOutcome::Skipped { expected: from };
    }

    let file_name = renamed_file_name(app_name, version_code, kind);
    let to = from.with_file_name(&file_name);

    match move_file(&from, &to) {
        Ok(()) => {
            tracing::info!(file = %file_name, "{} renamed to: {}", kind, file_name);
            RenameOutcome::Renamed { kind, from, to }
        }
        Err(err) => {
            tracing::warn!(error = %err, "{} rename failed, keeping original name", kind);
            RenameOutcome::Failed {
                from,
                to,
                reason: err.to_string(),
            }
        }
    }
}

/// Rename without clobbering an existing destination
fn move_file(from: &Path, to: &Path) -> Result<(), Error> {
    if to.exists() {
        return Err(Error::rename_failed(from, to).with_context("Destination already exists"));
    }
    std::fs::rename(from, to).map_err(|e| Error::rename_failed(from, to).with_source(e))
}

/// A packaged file found under the outputs directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFile {
    /// Format
    pub kind: ArtifactKind,
    /// Location
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// List every `.apk` / `.aab` under `<build_dir>/outputs`, sorted by path
pub fn list_artifacts(build_dir: &Path) -> Vec<ArtifactFile> {
    let mut files: Vec<ArtifactFile> = WalkDir::new(build_dir.join("outputs"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let kind = match e.path().extension().and_then(|x| x.to_str()) {
                Some("apk") => ArtifactKind::Apk,
                Some("aab") => ArtifactKind::Aab,
                _ => return None,
            };
            let size = e.metadata().map(|m| m.len()).unwrap_or(0);
            Some(ArtifactFile {
                kind,
                path: e.into_path(),
                size,
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(build_dir: &Path, kind: ArtifactKind) -> PathBuf {
        let path = kind.default_output_path(build_dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"PK").unwrap();
        path
    }

    #[test]
    fn test_for_task_exact_match() {
        assert_eq!(ArtifactKind::for_task("assembleRelease"), Some(ArtifactKind::Apk));
        assert_eq!(ArtifactKind::for_task("bundleRelease"), Some(ArtifactKind::Aab));
        assert_eq!(ArtifactKind::for_task(":app:assembleRelease"), None);
        assert_eq!(ArtifactKind::for_task("assembleDebug"), None);
    }

    #[test]
    fn test_renamed_file_name() {
        assert_eq!(renamed_file_name("vocario", 42, ArtifactKind::Apk), "vocario_42.apk");
        assert_eq!(renamed_file_name("vocario", 7, ArtifactKind::Aab), "vocario_7.aab");
    }

    #[test]
    fn test_rename_apk() {
        let dir = tempfile::tempdir().unwrap();
        let original = place(dir.path(), ArtifactKind::Apk);

        let outcome = rename_after_task(dir.path(), "assembleRelease", "vocario", 42);

        let expected = dir.path().join("outputs/flutter-apk/vocario_42.apk");
        assert_eq!(
            outcome,
            RenameOutcome::Renamed {
                kind: ArtifactKind::Apk,
                from: original.clone(),
                to: expected.clone(),
            }
        );
        assert!(!original.exists());
        assert!(expected.exists());
    }

    #[test]
    fn test_rename_aab() {
        let dir = tempfile::tempdir().unwrap();
        place(dir.path(), ArtifactKind::Aab);

        let outcome = rename_after_task(dir.path(), "bundleRelease", "vocario", 3);

        assert!(outcome.is_renamed());
        assert!(dir.path().join("outputs/bundle/release/vocario_3.aab").exists());
    }

    #[test]
    fn test_missing_artifact_is_noop() {
        let dir = tempfile::tempdir().unwrap();

        let outcome = rename_after_task(dir.path(), "assembleRelease", "vocario", 42);

        assert!(matches!(outcome, RenameOutcome::Skipped { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_other_task_not_triggered() {
        let dir = tempfile::tempdir().unwrap();
        let original = place(dir.path(), ArtifactKind::Apk);

        assert_eq!(
            rename_after_task(dir.path(), "assembleDebug", "vocario", 42),
            RenameOutcome::NotTriggered
        );
        assert!(original.exists());
    }

    #[test]
    fn test_existing_destination_is_reported_not_clobbered() {
        let dir = tempfile::tempdir().unwrap();
        let original = place(dir.path(), ArtifactKind::Apk);
        let taken = original.with_file_name("vocario_42.apk");
        std::fs::write(&taken, b"older").unwrap();

        let outcome = rename_after_task(dir.path(), "assembleRelease", "vocario", 42);

        assert!(matches!(outcome, RenameOutcome::Failed { .. }));
        assert!(original.exists());
        assert_eq!(std::fs::read(&taken).unwrap(), b"older");
    }

    #[test]
    fn test_list_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        place(dir.path(), ArtifactKind::Apk);
        place(dir.path(), ArtifactKind::Aab);
        std::fs::write(dir.path().join("outputs/flutter-apk/output-metadata.json"), b"{}").unwrap();

        let files = list_artifacts(dir.path());

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].kind, ArtifactKind::Aab);
        assert_eq!(files[1].kind, ArtifactKind::Apk);
        assert_eq!(files[1].size, 2);
    }

    #[test]
    fn test_list_artifacts_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_artifacts(dir.path()).is_empty());
    }
}
