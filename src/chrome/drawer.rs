use crate::config::DrawerSettings;
use crate::dom::{NodeId, Window};
use crate::events::{DomEvent, Key};

const OPEN_ICON: &str = "☰";
const CLOSE_ICON: &str = "×";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

/// The full-screen mobile navigation drawer behind `#menuToggle`.
pub struct Drawer {
    toggle: NodeId,
    panel: NodeId,
    breakpoint: f64,
    state: DrawerState,
}

impl Drawer {
    /// Mount over `#menuToggle` and `#drawer`.
    pub fn mount(win: &Window, settings: &DrawerSettings) -> Option<Self> {
        let doc = &win.document;
        let toggle = doc.get_element_by_id("menuToggle")?;
        let panel = doc.get_element_by_id("drawer")?;
        let state = if doc.attribute(toggle, "aria-expanded") == Some("true") {
            DrawerState::Open
        } else {
            DrawerState::Closed
        };
        Some(Self {
            toggle,
            panel,
            breakpoint: f64::from(settings.breakpoint),
            state,
        })
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn open(&mut self, win: &mut Window) {
        let doc = &mut win.document;
        doc.set_hidden(self.panel, false);
        doc.set_attribute(self.toggle, "aria-expanded", "true");
        doc.set_attribute(self.toggle, "aria-label", "Close menu");
        doc.set_text(self.toggle, CLOSE_ICON);
        win.lock_scroll(true);
        self.state = DrawerState::Open;
    }

    pub fn close(&mut self, win: &mut Window) {
        let doc = &mut win.document;
        doc.set_hidden(self.panel, true);
        doc.set_attribute(self.toggle, "aria-expanded", "false");
        doc.set_attribute(self.toggle, "aria-label", "Open menu");
        doc.set_text(self.toggle, OPEN_ICON);
        win.lock_scroll(false);
        self.state = DrawerState::Closed;
    }

    pub fn toggle(&mut self, win: &mut Window) {
        match self.state {
            DrawerState::Open => self.close(win),
            DrawerState::Closed => self.open(win),
        }
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        match *event {
            DomEvent::Click { target } => {
                let doc = &win.document;
                if doc.contains(self.toggle, target) {
                    self.toggle(win);
                } else if target == self.panel {
                    self.close(win);
                } else if doc.contains(self.panel, target)
                    && doc.closest(target, ".drawer__link").is_some()
                {
                    self.close(win);
                }
            }
            DomEvent::KeyDown {
                key: Key::Escape, ..
            } if self.state == DrawerState::Open => self.close(win),
            DomEvent::Resize
                if self.state == DrawerState::Open && win.viewport.width > self.breakpoint =>
            {
                self.close(win)
            }
            _ => {}
        }
    }
}
