//! In-memory page model the widgets operate on.
//!
//! `Document` is an element arena with a tiny selector engine; `Window`
//! bundles it with the location, local storage and viewport.

mod model;
mod selector;
mod window;

pub use model::*;
pub use window::*;

#[cfg(test)]
mod tests;
