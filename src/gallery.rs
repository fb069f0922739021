//! Image gallery with a lightbox overlay.

use crate::dom::{Document, NodeId, Window};
use crate::events::{DomEvent, Key};

const DEFAULT_ALT: &str = "Expanded image";

pub struct Gallery {
    grid: NodeId,
    lightbox: NodeId,
    image: NodeId,
    close: NodeId,
}

impl Gallery {
    /// Mount over `.gallery-grid`, creating the `#lightbox` overlay when the
    /// page does not carry one.
    pub fn mount(win: &mut Window) -> Option<Self> {
        let doc = &mut win.document;
        let grid = doc.select(doc.document_element(), ".gallery-grid")?;
        let lightbox = match doc.get_element_by_id("lightbox") {
            Some(existing) => existing,
            None => create_lightbox(doc),
        };
        let image = doc.select(lightbox, "img")?;
        let close = doc.select(lightbox, ".lightbox__close")?;
        Some(Self {
            grid,
            lightbox,
            image,
            close,
        })
    }

    /// Append one `.gallery-item` per `(src, alt)` pair.
    pub fn populate(&self, doc: &mut Document, images: &[(String, String)]) {
        for (src, alt) in images {
            let item = doc.append(self.grid, "button", &[("type", "button"), ("class", "gallery-item")]);
            doc.append(item, "img", &[("src", src.as_str()), ("alt", alt.as_str())]);
        }
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        !doc.is_hidden(self.lightbox)
    }

    pub fn open(&self, doc: &mut Document, src: &str, alt: &str) {
        doc.set_attribute(self.image, "src", src);
        doc.set_attribute(self.image, "alt", if alt.is_empty() { DEFAULT_ALT } else { alt });
        doc.set_hidden(self.lightbox, false);
        doc.add_class(self.lightbox, "is-open");
        doc.focus(self.close);
    }

    pub fn close(&self, doc: &mut Document) {
        doc.set_hidden(self.lightbox, true);
        doc.remove_class(self.lightbox, "is-open");
    }

    /// Open the lightbox on the image of the `.gallery-item` around `target`.
    fn open_item(&self, doc: &mut Document, target: NodeId) {
        if !doc.contains(self.grid, target) {
            return;
        }
        let Some(img) = doc
            .closest(target, ".gallery-item")
            .and_then(|item| doc.select(item, "img"))
        else {
            return;
        };
        let src = doc.attribute(img, "src").unwrap_or_default().to_string();
        let alt = doc.attribute(img, "alt").unwrap_or_default().to_string();
        self.open(doc, &src, &alt);
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        let doc = &mut win.document;
        match *event {
            DomEvent::Click { target } => {
                if doc.contains(self.close, target) || target == self.lightbox {
                    self.close(doc);
                } else {
                    self.open_item(doc, target);
                }
            }
            DomEvent::KeyDown {
                key: Key::Enter | Key::Space,
                target: Some(target),
            } => self.open_item(doc, target),
            DomEvent::KeyDown {
                key: Key::Escape, ..
            } if self.is_open(doc) => self.close(doc),
            _ => {}
        }
    }
}

fn create_lightbox(doc: &mut Document) -> NodeId {
    let body = doc.body();
    let lightbox = doc.append(
        body,
        "div",
        &[("class", "lightbox"), ("id", "lightbox"), ("hidden", "")],
    );
    let wrapper = doc.append(
        lightbox,
        "div",
        &[
            ("class", "lightbox__img-wrapper"),
            ("role", "dialog"),
            ("aria-modal", "true"),
            ("aria-label", DEFAULT_ALT),
        ],
    );
    doc.append_text(
        wrapper,
        "button",
        &[("type", "button"), ("class", "lightbox__close"), ("aria-label", "Close")],
        "×",
    );
    doc.append(wrapper, "img", &[("alt", DEFAULT_ALT)]);
    lightbox
}
