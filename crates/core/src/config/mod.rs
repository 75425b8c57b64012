//! Configuration loading and schema definitions

mod loader;
mod schema;

pub use loader::{Config, ProjectPaths};
pub use schema::*;
