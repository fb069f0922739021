use tracing::debug;

use super::paging::{drag_threshold, page_size_for, paginate};
use crate::config::AlbumSettings;
use crate::dom::{Document, NodeId, Window};
use crate::events::{DomEvent, Publisher, SiteEvent};
use crate::player::Album;

/// Pointer travel (px) after which a gesture no longer counts as a click.
const CLICK_SLOP: f64 = 5.0;

#[derive(Debug, Copy, Clone)]
struct Drag {
    start_x: f64,
    dx: f64,
}

/// `.albums` carousel: `.albums__track` holds one `.albums__page` per page,
/// `.albums__prev`/`.albums__next` page through them.
pub struct AlbumCarousel {
    track: NodeId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    settings: AlbumSettings,
    publisher: Publisher,
    albums: Vec<Album>,
    cards: Vec<NodeId>,
    page_size: usize,
    pages: usize,
    page: usize,
    active: Option<usize>,
    drag: Option<Drag>,
    swallow_click: bool,
}

impl AlbumCarousel {
    pub fn mount(win: &Window, settings: AlbumSettings, publisher: Publisher) -> Option<Self> {
        let doc = &win.document;
        let root = doc.select(doc.document_element(), ".albums")?;
        let track = doc.select(root, ".albums__track")?;
        let page_size = page_size_for(win.viewport.width, &settings);
        Some(Self {
            track,
            prev: doc.select(root, ".albums__prev"),
            next: doc.select(root, ".albums__next"),
            settings,
            publisher,
            albums: Vec::new(),
            cards: Vec::new(),
            page_size,
            pages: 0,
            page: 0,
            active: None,
            drag: None,
            swallow_click: false,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn active_album(&self) -> Option<usize> {
        self.active
    }

    /// Show `albums`, marking the first one as active.
    pub fn set_albums(&mut self, win: &mut Window, albums: Vec<Album>) {
        self.albums = albums;
        self.page = 0;
        self.active = (!self.albums.is_empty()).then_some(0);
        self.page_size = page_size_for(win.viewport.width, &self.settings);
        self.rebuild(&mut win.document);
    }

    fn rebuild(&mut self, doc: &mut Document) {
        doc.clear_children(self.track);
        self.cards.clear();
        let groups = paginate(self.albums.len(), self.page_size);
        self.pages = groups.len();
        for group in groups {
            let page = doc.append(self.track, "div", &[("class", "albums__page")]);
            for i in group {
                let album = &self.albums[i];
                let index = i.to_string();
                let card = doc.append(
                    page,
                    "button",
                    &[
                        ("type", "button"),
                        ("class", "album-card"),
                        ("data-album-index", index.as_str()),
                    ],
                );
                let cover = album
                    .cover
                    .as_deref()
                    .or_else(|| album.tracks.first().and_then(|t| t.cover.as_deref()))
                    .unwrap_or_default();
                doc.append(
                    card,
                    "img",
                    &[("class", "album-card__cover"), ("src", cover), ("alt", album.title.as_str())],
                );
                doc.append_text(card, "span", &[("class", "album-card__title")], &album.title);
                let meta = album.year.as_deref().unwrap_or_default();
                doc.append_text(card, "span", &[("class", "album-card__meta")], meta);
                self.cards.push(card);
            }
        }
        self.page = self.page.min(self.pages.saturating_sub(1));
        self.mark_active(doc);
        self.apply_offset(doc, 0.0);
    }

    fn mark_active(&self, doc: &mut Document) {
        for (i, &card) in self.cards.iter().enumerate() {
            let on = Some(i) == self.active;
            doc.toggle_class(card, "is-active", on);
            doc.set_attribute(card, "aria-pressed", if on { "true" } else { "false" });
        }
    }

    fn apply_offset(&self, doc: &mut Document, drag_px: f64) {
        let base = self.page as f64 * 100.0;
        let transform = if drag_px == 0.0 {
            format!("translateX(-{base}%)")
        } else {
            format!("translateX(calc(-{base}% + {drag_px}px))")
        };
        doc.set_style(self.track, "transform", &transform);

        let single = self.pages <= 1;
        if let Some(prev) = self.prev {
            doc.toggle_attribute(prev, "disabled", self.page == 0);
            doc.set_hidden(prev, single);
        }
        if let Some(next) = self.next {
            doc.toggle_attribute(next, "disabled", self.page + 1 >= self.pages);
            doc.set_hidden(next, single);
        }
    }

    /// Move to `page`, clamped to the available pages.
    pub fn go_to(&mut self, doc: &mut Document, page: usize) {
        self.page = page.min(self.pages.saturating_sub(1));
        self.apply_offset(doc, 0.0);
    }

    /// Rebuild when the viewport crosses into another size class, keeping
    /// the first visible album on screen.
    pub fn on_resize(&mut self, win: &mut Window) {
        let size = page_size_for(win.viewport.width, &self.settings);
        if size == self.page_size {
            return;
        }
        let first = self.page * self.page_size;
        debug!(from = self.page_size, to = size, "album page size changed");
        self.page_size = size;
        self.page = first / size;
        self.rebuild(&mut win.document);
    }

    /// Make album `index` active and hand its tracks to the player.
    pub fn select(&mut self, doc: &mut Document, index: usize) {
        let Some(album) = self.albums.get(index) else {
            return;
        };
        self.active = Some(index);
        self.mark_active(doc);
        self.publisher.publish(SiteEvent::TracksUpdated {
            tracks: album.tracks.clone(),
        });
    }

    fn finish_drag(&mut self, win: &mut Window, commit: bool) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        // Only a release is followed by a click.
        self.swallow_click = commit && drag.dx.abs() > CLICK_SLOP;
        let threshold = drag_threshold(win.viewport.width, &self.settings);
        let doc = &mut win.document;
        if commit && drag.dx <= -threshold && self.page + 1 < self.pages {
            self.go_to(doc, self.page + 1);
        } else if commit && drag.dx >= threshold && self.page > 0 {
            self.go_to(doc, self.page - 1);
        } else {
            self.apply_offset(doc, 0.0);
        }
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        match *event {
            DomEvent::Click { target } => {
                if std::mem::take(&mut self.swallow_click) {
                    return;
                }
                let doc = &mut win.document;
                if self.prev.is_some_and(|p| doc.contains(p, target)) {
                    self.go_to(doc, self.page.saturating_sub(1));
                } else if self.next.is_some_and(|n| doc.contains(n, target)) {
                    self.go_to(doc, self.page + 1);
                } else if let Some(i) = self.cards.iter().position(|&c| doc.contains(c, target)) {
                    self.select(doc, i);
                }
            }
            DomEvent::PointerDown { target, x } if win.document.contains(self.track, target) => {
                self.drag = Some(Drag { start_x: x, dx: 0.0 });
            }
            DomEvent::PointerMove { x, .. } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.dx = x - drag.start_x;
                    let dx = drag.dx;
                    self.apply_offset(&mut win.document, dx);
                }
            }
            DomEvent::PointerUp { x, .. } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.dx = x - drag.start_x;
                }
                self.finish_drag(win, true);
            }
            DomEvent::PointerLeave { .. } => self.finish_drag(win, false),
            DomEvent::Resize => self.on_resize(win),
            _ => {}
        }
    }
}
