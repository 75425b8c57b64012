//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings, defaults filled in
    pub schema: ConfigSchema,
    /// File the settings came from, `None` when defaults are used
    pub path: Option<PathBuf>,
}

/// Absolute-or-root-relative locations derived from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Flutter project root
    pub project_root: PathBuf,
    /// Android root directory, where Gradle runs
    pub android_dir: PathBuf,
    /// Release keystore inside the Android root
    pub keystore_file: PathBuf,
    /// Signing credentials inside the Android root
    pub credentials_file: PathBuf,
    /// Flutter build directory holding `outputs/`
    pub build_dir: PathBuf,
    /// `pubspec.yaml` with the version line
    pub pubspec: PathBuf,
}

impl Config {
    /// Load configuration, searching `root` when no path is given
    ///
    /// An explicit path that does not exist is an error; otherwise the
    /// standard locations under `root` are searched and defaults are used
    /// if none is found.
    pub fn load_in(root: &Path, path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(root),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Resolve configured paths against a project root
    pub fn resolve(&self, project_root: &Path) -> ProjectPaths {
        let android_dir = project_root.join(&self.schema.paths.android_dir);
        ProjectPaths {
            project_root: project_root.to_path_buf(),
            keystore_file: android_dir.join(&self.schema.signing.keystore_file),
            credentials_file: android_dir.join(&self.schema.signing.credentials_file),
            android_dir,
            build_dir: project_root.join(&self.schema.paths.build_dir),
            pubspec: project_root.join(&self.schema.app.pubspec),
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file(root: &Path) -> Option<PathBuf> {
    let candidates = [
        ".vocario-build.toml",
        "vocario-build.toml",
        ".config/vocario-build.toml",
    ];

    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("While parsing {}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.app.name, "vocario");
        assert_eq!(config.schema.signing.credentials_file, "credentials.txt");
    }

    #[test]
    fn test_config_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocario-build.toml");
        std::fs::write(&path, "[app]\nname = \"demo\"\n\n[paths]\nbuild_dir = \"out\"\n").unwrap();

        let config = Config::load_in(Path::new("."), Some(&path)).unwrap();
        assert_eq!(config.schema.app.name, "demo");
        assert_eq!(config.schema.paths.build_dir, "out");
        assert_eq!(config.schema.paths.android_dir, "android");
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_config_load_in_searches_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".vocario-build.toml");
        std::fs::write(file, "[app]\nname = \"found\"\n").unwrap();

        let config = Config::load_in(dir.path(), None).unwrap();
        assert_eq!(config.schema.app.name, "found");
    }

    #[test]
    fn test_config_load_explicit_missing_file() {
        let explicit = Path::new("/nonexistent/vocario-build.toml");
        let err = Config::load_in(Path::new("."), Some(explicit)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[app\nname = ").unwrap();

        let err = Config::load_in(Path::new("."), Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_resolve_paths() {
        let config = Config::default();
        let paths = config.resolve(Path::new("/work/app"));

        assert_eq!(paths.android_dir, PathBuf::from("/work/app/android"));
        assert_eq!(
            paths.keystore_file,
            PathBuf::from("/work/app/android/@tanim2025__vocario-keystore.bak.jks")
        );
        assert_eq!(
            paths.credentials_file,
            PathBuf::from("/work/app/android/credentials.txt")
        );
        assert_eq!(paths.build_dir, PathBuf::from("/work/app/build/app"));
        assert_eq!(paths.pubspec, PathBuf::from("/work/app/pubspec.yaml"));
    }

    #[test]
    fn test_find_config_file_in_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_none());

        std::fs::write(dir.path().join(".vocario-build.toml"), "").unwrap();
        assert_eq!(
            find_config_file(dir.path()),
            Some(dir.path().join(".vocario-build.toml"))
        );
    }
}
