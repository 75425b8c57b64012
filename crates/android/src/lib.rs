//! Android release tooling for Vocario
//!
//! This crate provides the release-side configuration layer of the
//! Android build:
//! - Credentials file parsing
//! - Release preflight checks for keystore and credentials
//! - Signing identity selection (release or debug)
//! - Post-build artifact renaming with the version code
//! - Build variants and version codes from the Flutter pubspec
//! - Gradle task invocation

#![warn(missing_docs)]

pub mod artifact;
pub mod credentials;
pub mod gradle;
pub mod preflight;
pub mod signing;
pub mod variant;
pub mod version;
