//! Core utilities for Vocario release tooling
//!
//! Shared functionality used by the Android release crate and CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults
//! - **Process execution**: running external build tools and capturing output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vocario_core::config::Config;
//!
//! let root = Path::new(".");
//! let config = Config::load_in(root, None).expect("config");
//! let paths = config.resolve(root);
//! println!("keystore expected at {}", paths.keystore_file.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::process::CommandResult;
}
