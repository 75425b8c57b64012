//! CLI utilities for Vocario release tooling
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Progress spinners
//! - Logging setup

#![warn(missing_docs)]

pub mod logging;
pub mod output;
pub mod progress;
