//! Responsive album carousel. Selecting an album replaces the player's tracks.

mod carousel;
mod paging;

pub use carousel::*;
pub use paging::*;
