//! Build types and the variant values they produce

use crate::artifact::ArtifactKind;
use crate::credentials::Credentials;
use crate::signing::SigningConfig;
use crate::version::AppVersion;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use vocario_core::config::AppConfig;
use vocario_core::error::{Error, Result};

/// Android build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Development build, debug-signed
    Debug,
    /// Store build
    Release,
}

impl BuildType {
    /// Gradle task that packages this build type in the given format
    pub fn task(&self, kind: ArtifactKind) -> &'static str {
        match (self, kind) {
            (BuildType::Debug, ArtifactKind::Apk) => "assembleDebug",
            (BuildType::Debug, ArtifactKind::Aab) => "bundleDebug",
            (BuildType::Release, ArtifactKind::Apk) => "assembleRelease",
            (BuildType::Release, ArtifactKind::Aab) => "bundleRelease",
        }
    }

    /// Signing used by this build type
    ///
    /// Debug builds always use the debug identity and never read the
    /// credentials file; release builds go through
    /// [`SigningConfig::select`].
    pub fn signing(&self, keystore_file: &Path, credentials_file: &Path) -> Result<SigningConfig> {
        match self {
            BuildType::Debug => Ok(SigningConfig::DebugSigned),
            BuildType::Release => {
                let credentials = Credentials::load(credentials_file)?;
                Ok(SigningConfig::select(keystore_file, &credentials))
            }
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Debug => f.write_str("debug"),
            BuildType::Release => f.write_str("release"),
        }
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            other => Err(Error::validation(format!(
                "Unknown build type '{}', expected debug or release",
                other
            ))),
        }
    }
}

/// Resolved values for one build type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Build type this variant belongs to
    pub build_type: BuildType,
    /// Package name installed on the device
    pub application_id: String,
    /// User-visible version
    pub version_name: String,
    /// Version code embedded in artifact names
    pub version_code: u32,
    /// Signing used for the packaged output
    pub signing: SigningConfig,
}

impl Variant {
    /// Resolve a variant
    ///
    /// `release_signing` only applies to the release build type; debug
    /// builds are always debug-signed and carry the configured suffixes.
    pub fn resolve(
        build_type: BuildType,
        app: &AppConfig,
        version: &AppVersion,
        release_signing: SigningConfig,
    ) -> Self {
        match build_type {
            BuildType::Release => Self {
                build_type,
                application_id: app.application_id.clone(),
                version_name: version.name.clone(),
                version_code: version.code,
                signing: release_signing,
            },
            BuildType::Debug => Self {
                build_type,
                application_id: format!(
                    "{}{}",
                    app.application_id, app.debug_application_id_suffix
                ),
                version_name: format!("{}{}", version.name, app.debug_version_name_suffix),
                version_code: version.code,
                signing: SigningConfig::DebugSigned,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::SigningIdentity;
    use std::path::PathBuf;

    fn version() -> AppVersion {
        AppVersion {
            name: "1.2.0".to_string(),
            code: 42,
        }
    }

    fn release_signing() -> SigningConfig {
        SigningConfig::ReleaseSigned(SigningIdentity {
            store_file: PathBuf::from("release.jks"),
            store_password: "sp".to_string(),
            key_password: "kp".to_string(),
            key_alias: "upload".to_string(),
        })
    }

    #[test]
    fn test_release_variant() {
        let app = AppConfig::default();
        let variant = Variant::resolve(BuildType::Release, &app, &version(), release_signing());

        assert_eq!(variant.application_id, "com.brainstation23.vocario");
        assert_eq!(variant.version_name, "1.2.0");
        assert_eq!(variant.version_code, 42);
        assert!(variant.signing.is_release_signed());
    }

    #[test]
    fn test_debug_variant_suffixes_and_debug_signing() {
        let app = AppConfig::default();
        let variant = Variant::resolve(BuildType::Debug, &app, &version(), release_signing());

        assert_eq!(variant.application_id, "com.brainstation23.vocario.debug");
        assert_eq!(variant.version_name, "1.2.0-debug");
        assert_eq!(variant.signing, SigningConfig::DebugSigned);
    }

    #[test]
    fn test_build_type_tasks() {
        assert_eq!(BuildType::Release.task(ArtifactKind::Apk), "assembleRelease");
        assert_eq!(BuildType::Release.task(ArtifactKind::Aab), "bundleRelease");
        assert_eq!(BuildType::Debug.task(ArtifactKind::Aab), "bundleDebug");
    }

    #[test]
    fn test_debug_signing_ignores_release_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("release.jks");
        let credentials = dir.path().join("credentials.txt");
        std::fs::write(&keystore, b"ks").unwrap();
        std::fs::write(&credentials, "keyAlias: upload\n").unwrap();

        assert_eq!(
            BuildType::Debug.signing(&keystore, &credentials).unwrap(),
            SigningConfig::DebugSigned
        );
        assert!(BuildType::Release.signing(&keystore, &credentials).unwrap().is_release_signed());
    }

    #[test]
    fn test_build_type_from_str() {
        assert_eq!("release".parse::<BuildType>().unwrap(), BuildType::Release);
        assert!("Release".parse::<BuildType>().is_err());
    }
}
