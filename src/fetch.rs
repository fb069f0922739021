//! Network access for data files and form submissions.
//!
//! Widgets only see the `Fetch` trait. `SiteFetcher` serves the real site,
//! either from a local checkout or from its HTTP origin.

mod site;
mod types;

pub use site::*;
pub use types::*;

#[cfg(test)]
pub mod memory;
