use std::ops::Range;

use crate::config::AlbumSettings;

/// Cards per page for a viewport `width`.
pub fn page_size_for(width: f64, settings: &AlbumSettings) -> usize {
    let per = &settings.cards_per_page;
    let size = if width < f64::from(settings.narrow_breakpoint) {
        per.narrow
    } else if width < f64::from(settings.wide_breakpoint) {
        per.medium
    } else {
        per.wide
    };
    size.max(1)
}

/// Split `len` items into consecutive pages of `size`; the last page may be short.
pub fn paginate(len: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

/// Minimum horizontal drag (px) that turns a swipe into a page change.
pub fn drag_threshold(viewport_width: f64, settings: &AlbumSettings) -> f64 {
    settings
        .drag_min_px
        .max(viewport_width * settings.drag_viewport_ratio)
}
