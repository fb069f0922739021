use crate::dom::{NodeId, Window};
use crate::events::{DomEvent, Key};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Variant {
    Success,
    Error,
}

impl Variant {
    fn class(self) -> &'static str {
        match self {
            Variant::Success => "popup--success",
            Variant::Error => "popup--error",
        }
    }
}

/// Title, message and look of one popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub variant: Variant,
}

/// Modal feedback dialog (`#popup`).
pub struct Popup {
    popup: NodeId,
    title: NodeId,
    desc: NodeId,
    ok: Option<NodeId>,
    closers: Vec<NodeId>,
    last_focused: Option<NodeId>,
}

impl Popup {
    pub fn mount(win: &Window) -> Option<Self> {
        let doc = &win.document;
        let root = doc.document_element();
        Some(Self {
            popup: doc.get_element_by_id("popup")?,
            title: doc.get_element_by_id("popup-title")?,
            desc: doc.get_element_by_id("popup-desc")?,
            ok: doc.select(root, ".popup__ok"),
            closers: doc.select_all(root, "[data-close]"),
            last_focused: None,
        })
    }

    pub fn is_open(&self, win: &Window) -> bool {
        !win.document.is_hidden(self.popup)
    }

    /// Show `notice`, remembering the focused element and moving focus to OK.
    pub fn open(&mut self, win: &mut Window, notice: &Notice) {
        let doc = &mut win.document;
        self.last_focused = doc.active_element();
        doc.set_text(self.title, &notice.title);
        doc.set_text(self.desc, &notice.message);
        doc.remove_class(self.popup, Variant::Success.class());
        doc.remove_class(self.popup, Variant::Error.class());
        doc.add_class(self.popup, notice.variant.class());
        doc.set_hidden(self.popup, false);
        if let Some(ok) = self.ok {
            doc.focus(ok);
        }
        win.lock_scroll(true);
    }

    pub fn close(&mut self, win: &mut Window) {
        win.document.set_hidden(self.popup, true);
        win.lock_scroll(false);
        if let Some(prev) = self.last_focused.take() {
            win.document.focus(prev);
        }
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        match *event {
            DomEvent::Click { target } => {
                let doc = &win.document;
                let on_closer = self.closers.iter().any(|&c| doc.contains(c, target));
                let on_backdrop =
                    doc.contains(self.popup, target) && doc.has_class(target, "popup__backdrop");
                if (on_closer || on_backdrop) && self.is_open(win) {
                    self.close(win);
                }
            }
            DomEvent::KeyDown {
                key: Key::Escape, ..
            } if self.is_open(win) => self.close(win),
            _ => {}
        }
    }
}
