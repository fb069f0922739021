//! DOM events delivered to widgets, and the site-wide publish/subscribe bus.
//!
//! The bus carries a fixed set of notifications between otherwise
//! independent widgets. Publishers hold a cloned `Publisher`; the site drains
//! the bus after every dispatched DOM event and routes each notification to
//! its subscribers.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::dom::NodeId;
use crate::i18n::Dictionary;
use crate::player::{Album, Track};

/// Keys the widgets react to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Tab,
    Char(char),
}

/// Events reported by a media element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Duration became known for the current source.
    LoadedMetadata,
    /// Playback position advanced.
    TimeUpdate,
    /// The current source played to its end.
    Ended,
}

/// A user or host event aimed at the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    Click { target: NodeId },
    KeyDown { key: Key, target: Option<NodeId> },
    /// A form control's value changed; the host already wrote the new value.
    Input { target: NodeId },
    /// A form control committed its value (range released, checkbox toggled).
    Change { target: NodeId },
    Submit { form: NodeId },
    /// `None` scrolls the window (`viewport.scroll_y` already updated).
    Scroll { target: Option<NodeId> },
    /// The viewport was resized (`viewport` already updated).
    Resize,
    PointerDown { target: NodeId, x: f64 },
    PointerMove { target: NodeId, x: f64 },
    PointerUp { target: NodeId, x: f64 },
    PointerLeave { target: NodeId },
    Media(MediaEvent),
    /// One `requestAnimationFrame` tick.
    AnimationFrame,
}

/// Notifications exchanged between widgets.
#[derive(Debug, Clone)]
pub enum SiteEvent {
    /// A language was applied to the page.
    LanguageChanged { lang: String, dict: Arc<Dictionary> },
    /// The active track collection was replaced (data load or album switch).
    TracksUpdated { tracks: Vec<Track> },
    /// Music data finished loading (possibly from the built-in fallback).
    DataReady { albums: Vec<Album> },
}

/// Sending half of the bus, handed to widgets that publish.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: Sender<SiteEvent>,
}

impl Publisher {
    pub fn publish(&self, event: SiteEvent) {
        // The receiver lives as long as the site; a send error only happens on teardown.
        let _ = self.tx.send(event);
    }
}

#[derive(Debug)]
pub struct Bus {
    tx: Sender<SiteEvent>,
    rx: Receiver<SiteEvent>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<SiteEvent>();
        Self { tx, rx }
    }

    pub fn publisher(&self) -> Publisher {
        Publisher {
            tx: self.tx.clone(),
        }
    }

    /// Take every pending notification in publication order.
    pub fn drain(&self) -> Vec<SiteEvent> {
        self.rx.try_iter().collect()
    }
}
