//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[app]` section
    #[serde(default)]
    pub app: AppConfig,

    /// `[signing]` section
    #[serde(default)]
    pub signing: SigningFilesConfig,

    /// `[paths]` section
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Application identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product name embedded in renamed artifacts
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Android application id for the release build type
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Suffix appended to the application id for debug builds
    #[serde(default = "default_debug_id_suffix")]
    pub debug_application_id_suffix: String,

    /// Suffix appended to the version name for debug builds
    #[serde(default = "default_debug_version_suffix")]
    pub debug_version_name_suffix: String,

    /// Flutter pubspec holding `version: <name>+<code>`, relative to the project root
    #[serde(default = "default_pubspec")]
    pub pubspec: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            application_id: default_application_id(),
            debug_application_id_suffix: default_debug_id_suffix(),
            debug_version_name_suffix: default_debug_version_suffix(),
            pubspec: default_pubspec(),
        }
    }
}

fn default_app_name() -> String {
    "vocario".to_string()
}

fn default_application_id() -> String {
    "com.brainstation23.vocario".to_string()
}

fn default_debug_id_suffix() -> String {
    ".debug".to_string()
}

fn default_debug_version_suffix() -> String {
    "-debug".to_string()
}

fn default_pubspec() -> String {
    "pubspec.yaml".to_string()
}

/// Locations of the release signing inputs, relative to the android directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningFilesConfig {
    /// Keystore binary
    #[serde(default = "default_keystore_file")]
    pub keystore_file: String,

    /// Line-oriented `key: value` credentials
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

impl Default for SigningFilesConfig {
    fn default() -> Self {
        Self {
            keystore_file: default_keystore_file(),
            credentials_file: default_credentials_file(),
        }
    }
}

fn default_keystore_file() -> String {
    "@tanim2025__vocario-keystore.bak.jks".to_string()
}

fn default_credentials_file() -> String {
    "credentials.txt".to_string()
}

/// Project layout, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Android root directory (holds gradlew, keystore and credentials)
    #[serde(default = "default_android_dir")]
    pub android_dir: String,

    /// Build directory of the app module (holds `outputs/`)
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            android_dir: default_android_dir(),
            build_dir: default_build_dir(),
        }
    }
}

fn default_android_dir() -> String {
    "android".to_string()
}

fn default_build_dir() -> String {
    "build/app".to_string()
}
