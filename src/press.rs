//! Press reviews: per-language loading with a fallback language, and the
//! card carousel with dot or arrow pagination.

mod carousel;
mod model;

pub use carousel::*;
pub use model::*;
