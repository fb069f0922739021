//! Translation loading and application.
//!
//! Dictionaries are flat `key -> text` maps, one JSON file per language,
//! fetched at most once per language and cached for the session.

mod translator;

pub use translator::*;
