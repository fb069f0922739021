//! The playlist player: track data, formatting helpers, the media element
//! seam and the widget that binds controls to one media element.

mod catalog;
mod format;
mod media;
mod widget;

pub use catalog::*;
pub use format::*;
pub use media::*;
pub use widget::*;

#[cfg(test)]
pub mod fake;
