//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the site widgets and the
//! terminal preview, plus helpers to load them from disk.

mod load;
mod schema;

pub use load::{default_log_path, default_storage_path};
pub use schema::*;
