use tracing::error;

use super::model::{Review, load_reviews, nearest_page, page_label_base, page_starts};
use crate::config::PressSettings;
use crate::dom::{Document, NodeId, Window};
use crate::events::DomEvent;
use crate::fetch::Fetch;
use crate::i18n::Dictionary;

const LABEL_KEY: &str = "press.pageLabel";

/// How the page's markup lets readers move between review pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PaginationStyle {
    /// One `.press-dot` per page inside `.press-pagination`.
    Dots,
    /// `.press-prev` / `.press-next` buttons.
    Arrows,
}

#[derive(Debug, Copy, Clone)]
struct Drag {
    start_x: f64,
    start_scroll: f64,
}

/// Horizontally scrolling review cards in `.press-articles`.
pub struct PressCarousel {
    container: NodeId,
    style: Option<PaginationStyle>,
    dots_wrap: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    settings: PressSettings,
    lang: Option<String>,
    label: Option<String>,
    cards: Vec<NodeId>,
    dots: Vec<NodeId>,
    starts: Vec<usize>,
    offsets: Vec<f64>,
    active: usize,
    frame_pending: bool,
    drag: Option<Drag>,
}

impl PressCarousel {
    pub fn mount(win: &Window, settings: PressSettings) -> Option<Self> {
        let doc = &win.document;
        let root = doc.document_element();
        let container = doc.select(root, ".press-articles")?;
        let dots_wrap = doc.select(root, ".press-pagination");
        let prev = doc.select(root, ".press-prev");
        let next = doc.select(root, ".press-next");
        let style = if dots_wrap.is_some() {
            Some(PaginationStyle::Dots)
        } else if prev.is_some() || next.is_some() {
            Some(PaginationStyle::Arrows)
        } else {
            None
        };
        Some(Self {
            container,
            style,
            dots_wrap,
            prev,
            next,
            settings,
            lang: None,
            label: None,
            cards: Vec::new(),
            dots: Vec::new(),
            starts: Vec::new(),
            offsets: Vec::new(),
            active: 0,
            frame_pending: false,
            drag: None,
        })
    }

    pub fn style(&self) -> Option<PaginationStyle> {
        self.style
    }

    /// Language of the reviews on display.
    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn pages(&self) -> usize {
        self.starts.len()
    }

    pub fn active_page(&self) -> usize {
        self.active
    }

    /// Load and render the reviews for `lang`, or the unavailable notice.
    pub async fn load<F: Fetch>(&mut self, win: &mut Window, fetcher: &F, lang: &str) {
        self.lang = Some(lang.to_string());
        match load_reviews(fetcher, &self.settings, lang).await {
            Ok(reviews) => self.render(&mut win.document, &reviews),
            Err(e) => {
                error!("failed to load press reviews: {e}");
                self.show_unavailable(&mut win.document);
            }
        }
    }

    /// Whether a language change should reload the reviews.
    pub fn needs_reload(&self, lang: &str) -> bool {
        self.lang.as_deref() != Some(lang)
    }

    /// Take the page label from the new dictionary and relabel the dots.
    pub fn on_dictionary(&mut self, doc: &mut Document, dict: &Dictionary) {
        self.label = dict.get(LABEL_KEY).filter(|l| !l.is_empty()).cloned();
        self.label_dots(doc);
    }

    pub fn render(&mut self, doc: &mut Document, reviews: &[Review]) {
        doc.clear_children(self.container);
        self.cards.clear();
        for (i, review) in reviews.iter().enumerate() {
            let id = format!("press-card-{i}-title");
            let card = doc.append(
                self.container,
                "article",
                &[
                    ("class", "press-card"),
                    ("role", "article"),
                    ("aria-labelledby", id.as_str()),
                ],
            );
            doc.append_text(card, "h3", &[("id", id.as_str())], &review.title);
            doc.append_text(card, "div", &[("class", "press-meta")], &review.meta_line());
            doc.append_text(card, "div", &[("class", "press-text")], &review.body());
            self.cards.push(card);
        }
        self.build_pagination(doc);
        self.update_active(doc);
    }

    fn show_unavailable(&mut self, doc: &mut Document) {
        doc.clear_children(self.container);
        self.cards.clear();
        let msg = doc.append_text(
            self.container,
            "p",
            &[("class", "press-unavailable")],
            "Press reviews unavailable.",
        );
        doc.set_style(msg, "opacity", ".8");
        self.build_pagination(doc);
    }

    fn label_base(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => page_label_base(self.lang.as_deref().unwrap_or("en")).to_string(),
        }
    }

    fn build_pagination(&mut self, doc: &mut Document) {
        self.starts = page_starts(self.cards.len(), self.settings.max_pages);
        self.measure(doc);
        self.active = 0;
        self.dots.clear();
        if let Some(wrap) = self.dots_wrap {
            doc.clear_children(wrap);
            for _ in &self.starts {
                let dot = doc.append(wrap, "button", &[("type", "button"), ("class", "press-dot")]);
                self.dots.push(dot);
            }
            self.label_dots(doc);
        }
    }

    fn label_dots(&self, doc: &mut Document) {
        let base = self.label_base();
        for (i, &dot) in self.dots.iter().enumerate() {
            doc.set_attribute(dot, "aria-label", &format!("{base} {}", i + 1));
        }
    }

    /// Read each page's start offset from the first card of the page.
    fn measure(&mut self, doc: &Document) {
        self.offsets = self
            .starts
            .iter()
            .map(|&i| self.cards.get(i).map_or(0.0, |&c| doc.element(c).offset_left))
            .collect();
    }

    pub fn update_active(&mut self, doc: &mut Document) {
        if self.offsets.is_empty() {
            return;
        }
        let scroll = doc.element(self.container).scroll_left;
        self.active = nearest_page(&self.offsets, scroll);
        for (i, &dot) in self.dots.iter().enumerate() {
            let on = i == self.active;
            doc.toggle_class(dot, "is-active", on);
            if on {
                doc.set_attribute(dot, "aria-current", "true");
            } else {
                doc.remove_attribute(dot, "aria-current");
            }
        }
        let last = self.offsets.len() - 1;
        if let Some(prev) = self.prev {
            doc.toggle_attribute(prev, "disabled", self.active == 0);
        }
        if let Some(next) = self.next {
            doc.toggle_attribute(next, "disabled", self.active >= last);
        }
    }

    /// Scroll the container to the first card of `page`.
    pub fn scroll_to_page(&mut self, doc: &mut Document, page: usize) {
        let Some(&offset) = self.offsets.get(page) else {
            return;
        };
        doc.set_scroll_left(self.container, offset);
        self.update_active(doc);
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        let doc = &mut win.document;
        match *event {
            DomEvent::Click { target } => {
                if let Some(page) = self.dots.iter().position(|&d| doc.contains(d, target)) {
                    self.scroll_to_page(doc, page);
                } else if self.prev.is_some_and(|p| doc.contains(p, target)) && self.active > 0 {
                    self.scroll_to_page(doc, self.active - 1);
                } else if self.next.is_some_and(|n| doc.contains(n, target)) {
                    self.scroll_to_page(doc, self.active + 1);
                }
            }
            DomEvent::Scroll {
                target: Some(target),
            } if target == self.container => self.frame_pending = true,
            DomEvent::AnimationFrame if self.frame_pending => {
                self.frame_pending = false;
                self.update_active(doc);
            }
            DomEvent::Resize => {
                self.measure(doc);
                self.update_active(doc);
            }
            DomEvent::PointerDown { target, x } if doc.contains(self.container, target) => {
                self.drag = Some(Drag {
                    start_x: x,
                    start_scroll: doc.element(self.container).scroll_left,
                });
            }
            DomEvent::PointerMove { x, .. } => {
                if let Some(drag) = self.drag {
                    doc.set_scroll_left(self.container, drag.start_scroll - (x - drag.start_x));
                    self.frame_pending = true;
                }
            }
            DomEvent::PointerUp { .. } | DomEvent::PointerLeave { .. } => self.drag = None,
            _ => {}
        }
    }
}
