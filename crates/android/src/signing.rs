//! Signing identity selection
//!
//! A release build is signed with the upload keystore when both the
//! keystore file and credentials are available; otherwise it falls back
//! to the toolchain's debug identity.

use crate::credentials::{CredentialField, Credentials};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Keystore plus the secrets needed to use it
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SigningIdentity {
    /// Keystore binary
    pub store_file: PathBuf,
    /// Keystore password
    #[serde(skip)]
    pub store_password: String,
    /// Private key password
    #[serde(skip)]
    pub key_password: String,
    /// Alias of the signing key
    pub key_alias: String,
}

impl SigningIdentity {
    /// Build an identity from a keystore path and parsed credentials
    ///
    /// Unset fields become empty strings.
    pub fn from_credentials(store_file: &Path, credentials: &Credentials) -> Self {
        Self {
            store_file: store_file.to_path_buf(),
            store_password: credentials.get_or_empty(CredentialField::StorePassword),
            key_password: credentials.get_or_empty(CredentialField::KeyPassword),
            key_alias: credentials.get_or_empty(CredentialField::KeyAlias),
        }
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("store_file", &self.store_file)
            .field("store_password", &"********")
            .field("key_password", &"********")
            .field("key_alias", &self.key_alias)
            .finish()
    }
}

/// Signing configuration chosen for a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SigningConfig {
    /// Signed with the upload keystore
    ReleaseSigned(SigningIdentity),
    /// Signed with the toolchain's built-in debug key
    DebugSigned,
}

/// Environment variables handed to the build tool for release signing
pub mod env_vars {
    /// Keystore path
    pub const STORE_FILE: &str = "VOCARIO_SIGNING_STORE_FILE";
    /// Keystore password
    pub const STORE_PASSWORD: &str = "VOCARIO_SIGNING_STORE_PASSWORD";
    /// Private key password
    pub const KEY_PASSWORD: &str = "VOCARIO_SIGNING_KEY_PASSWORD";
    /// Key alias
    pub const KEY_ALIAS: &str = "VOCARIO_SIGNING_KEY_ALIAS";
}

impl SigningConfig {
    /// Choose the signing configuration for a release build
    ///
    /// Release signing requires the keystore to exist and at least one
    /// credential to have been parsed.
    pub fn select(keystore_file: &Path, credentials: &Credentials) -> Self {
        if keystore_file.exists() && !credentials.is_empty() {
            tracing::debug!(keystore = %keystore_file.display(), "Using release signing identity");
            let identity = SigningIdentity::from_credentials(keystore_file, credentials);
            SigningConfig::ReleaseSigned(identity)
        } else {
            tracing::debug!("Falling back to debug signing identity");
            SigningConfig::DebugSigned
        }
    }

    /// Whether the upload keystore is used
    pub fn is_release_signed(&self) -> bool {
        matches!(self, SigningConfig::ReleaseSigned(_))
    }

    /// Release identity, if any
    pub fn identity(&self) -> Option<&SigningIdentity> {
        match self {
            SigningConfig::ReleaseSigned(identity) => Some(identity),
            SigningConfig::DebugSigned => None,
        }
    }

    /// Short label for status output
    pub fn label(&self) -> &'static str {
        match self {
            SigningConfig::ReleaseSigned(_) => "release",
            SigningConfig::DebugSigned => "debug",
        }
    }

    /// Environment for the spawned build process
    ///
    /// Empty for debug signing so the build tool keeps its default key.
    pub fn to_env(&self) -> Vec<(String, String)> {
        match self {
            SigningConfig::ReleaseSigned(identity) => vec![
                (
                    env_vars::STORE_FILE.to_string(),
                    identity.store_file.display().to_string(),
                ),
                (
                    env_vars::STORE_PASSWORD.to_string(),
                    identity.store_password.clone(),
                ),
                (env_vars::KEY_PASSWORD.to_string(), identity.key_password.clone()),
                (env_vars::KEY_ALIAS.to_string(), identity.key_alias.clone()),
            ],
            SigningConfig::DebugSigned => Vec::new(),
        }
    }
}
