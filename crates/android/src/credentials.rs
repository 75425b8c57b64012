//! Credentials file parsing
//!
//! The credentials file is plain text with one `key: value` pair per line:
//!
//! ```text
//! storePassword: hunter2
//! keyPassword: hunter2
//! keyAlias: upload
//! storeFile: upload-keystore.jks
//! ```
//!
//! Keys are matched by exact prefix at the start of the line. Unknown
//! lines are ignored and a later line for the same key replaces the
//! earlier value.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use vocario_core::error::{Error, Result};

const REDACTED: &str = "********";

/// A recognized credentials key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialField {
    /// Keystore password
    StorePassword,
    /// Private key password
    KeyPassword,
    /// Alias of the signing key inside the keystore
    KeyAlias,
    /// Keystore file name as recorded by the key owner
    StoreFile,
}

impl CredentialField {
    /// All fields, in the order prefixes are tested
    pub const ALL: [CredentialField; 4] = [
        CredentialField::StorePassword,
        CredentialField::KeyPassword,
        CredentialField::KeyAlias,
        CredentialField::StoreFile,
    ];

    /// Key name as written in the file
    pub fn key(&self) -> &'static str {
        match self {
            CredentialField::StorePassword => "storePassword",
            CredentialField::KeyPassword => "keyPassword",
            CredentialField::KeyAlias => "keyAlias",
            CredentialField::StoreFile => "storeFile",
        }
    }

    /// Line prefix that selects this field
    pub fn prefix(&self) -> &'static str {
        match self {
            CredentialField::StorePassword => "storePassword:",
            CredentialField::KeyPassword => "keyPassword:",
            CredentialField::KeyAlias => "keyAlias:",
            CredentialField::StoreFile => "storeFile:",
        }
    }

    /// Whether the value must never be printed
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            CredentialField::StorePassword | CredentialField::KeyPassword
        )
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsed credentials, keyed by field
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    values: BTreeMap<CredentialField, String>,
}

impl Credentials {
    /// Parse credentials text
    pub fn parse(text: &str) -> Self {
        let mut values = BTreeMap::new();

        for line in text.lines() {
            let matched = CredentialField::ALL.iter().find_map(|field| {
                line.strip_prefix(field.prefix()).map(|rest| (*field, rest))
            });

            if let Some((field, rest)) = matched {
                values.insert(field, rest.trim().to_string());
            }
        }

        Self { values }
    }

    /// Load credentials from a file
    ///
    /// A missing file yields empty credentials. Whether that is acceptable
    /// is decided by the preflight check, not here. Invalid UTF-8 is
    /// replaced with U+FFFD rather than rejected.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No credentials file, using empty credentials");
            return Ok(Self::default());
        }

        let bytes = std::fs::read(path).map_err(|e| {
            Error::from(e).with_context(format!("While reading credentials {}", path.display()))
        })?;

        let credentials = Self::parse(&String::from_utf8_lossy(&bytes));
        tracing::debug!(
            path = %path.display(),
            fields = credentials.len(),
            "Parsed credentials file"
        );
        Ok(credentials)
    }

    /// Value for a field, if present
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Value for a field, or an empty string when unset
    pub fn get_or_empty(&self, field: CredentialField) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    /// Whether no field was parsed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of parsed fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (CredentialField, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Field/value pairs safe to print, with secrets redacted
    pub fn redacted(&self) -> Vec<(CredentialField, String)> {
        self.iter()
            .map(|(field, value)| {
                let shown = if field.is_secret() {
                    REDACTED.to_string()
                } else {
                    value.to_string()
                };
                (field, shown)
            })
            .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.redacted().into_iter().map(|(k, v)| (k.key(), v)))
            .finish()
    }
}
