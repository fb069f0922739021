use tracing::{debug, warn};

use super::catalog::Track;
use super::format::{fmt_time, format_credits};
use super::media::MediaElement;
use crate::config::PlayerSettings;
use crate::dom::{Document, NodeId, Window};
use crate::events::{DomEvent, Key, MediaEvent};

/// Markup variants the player adapts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PlayerOptions {
    /// Render a credits line under the artist and in playlist rows.
    /// Enabled when the page carries a `.player__credits` element.
    pub show_credits: bool,
}

#[derive(Debug, Default)]
struct Controls {
    title: Option<NodeId>,
    artist: Option<NodeId>,
    credits: Option<NodeId>,
    cover: Option<NodeId>,
    play: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    mute: Option<NodeId>,
    time_current: Option<NodeId>,
    time_total: Option<NodeId>,
    seek: Option<NodeId>,
    volume: Option<NodeId>,
}

/// Playlist player bound to `.player`, `.playlist` and one media element.
pub struct Player<M: MediaElement> {
    media: M,
    root: NodeId,
    audio: NodeId,
    playlist: NodeId,
    controls: Controls,
    options: PlayerOptions,
    settings: PlayerSettings,
    tracks: Vec<Track>,
    rows: Vec<NodeId>,
    index: usize,
    seeking: bool,
}

impl<M: MediaElement> Player<M> {
    /// Mount over `#audio`, `.player` and `.playlist`; `None` if any is missing.
    pub fn mount(win: &Window, media: M, settings: PlayerSettings) -> Option<Self> {
        let doc = &win.document;
        let top = doc.document_element();
        let audio = doc.get_element_by_id("audio")?;
        let root = doc.select(top, ".player")?;
        let playlist = doc.select(top, ".playlist")?;

        let find = |sel: &str| doc.select(root, sel);
        let controls = Controls {
            title: find(".player__title"),
            artist: find(".player__artist"),
            credits: find(".player__credits"),
            cover: find(".player__cover"),
            play: find(".btn--play"),
            prev: find(".btn--prev"),
            next: find(".btn--next"),
            mute: find(".btn--mute"),
            time_current: find(".time--current"),
            time_total: find(".time--total"),
            seek: find(".seek"),
            volume: find(".volume"),
        };
        let options = PlayerOptions {
            show_credits: controls.credits.is_some(),
        };

        Some(Self {
            media,
            root,
            audio,
            playlist,
            controls,
            options,
            settings,
            tracks: Vec::new(),
            rows: Vec::new(),
            index: 0,
            seeking: false,
        })
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn options(&self) -> PlayerOptions {
        self.options
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    /// Replace the track collection, rebuild the listing and cue the first
    /// track without starting playback.
    pub fn set_tracks(&mut self, win: &mut Window, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.index = 0;
        self.build_playlist(&mut win.document);
        self.load(win, 0);
        self.pause(win);
    }

    fn build_playlist(&mut self, doc: &mut Document) {
        doc.clear_children(self.playlist);
        self.rows.clear();
        for track in &self.tracks {
            let li = doc.append(self.playlist, "li", &[]);
            let btn = doc.append(li, "button", &[("type", "button")]);
            doc.append_text(btn, "span", &[("class", "main")], &track.title);
            let dur = track.duration.map(fmt_time).unwrap_or_default();
            doc.append_text(btn, "span", &[("class", "dur")], &dur);
            doc.append_text(btn, "small", &[("class", "sub")], &track.details);
            if self.options.show_credits {
                let credits = format_credits(track.credits.as_ref());
                if !credits.is_empty() {
                    doc.append_text(btn, "small", &[("class", "credits")], &credits);
                }
            }
            self.rows.push(btn);
        }
    }

    /// Cue track `i`, wrapping in both directions. No-op on an empty list.
    pub fn load(&mut self, win: &mut Window, i: isize) {
        if self.tracks.is_empty() {
            return;
        }
        self.index = wrap_index(i, self.tracks.len());
        let track = &self.tracks[self.index];
        debug!(index = self.index, title = %track.title, "loading track");

        self.media.set_src(&track.src);
        let doc = &mut win.document;
        doc.set_attribute(self.audio, "src", &track.src);

        let c = &self.controls;
        if let Some(title) = c.title {
            doc.set_text(title, &track.title);
        }
        if let Some(artist) = c.artist {
            let line = if track.details.is_empty() {
                &track.artist
            } else {
                &track.details
            };
            doc.set_text(artist, line);
        }
        if let Some(credits) = c.credits {
            doc.set_text(credits, &format_credits(track.credits.as_ref()));
        }
        if let Some(cover) = c.cover {
            let src = track
                .cover
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(&self.settings.default_cover);
            doc.set_attribute(cover, "src", src);
        }
        for (i, &row) in self.rows.iter().enumerate() {
            doc.toggle_class(row, "is-active", i == self.index);
        }
    }

    pub fn play(&mut self, win: &mut Window) {
        match self.media.play() {
            Ok(()) => self.show_playing(&mut win.document, true),
            Err(e) => {
                warn!("playback failed: {e}");
                self.show_playing(&mut win.document, false);
            }
        }
    }

    pub fn pause(&mut self, win: &mut Window) {
        self.media.pause();
        self.show_playing(&mut win.document, false);
    }

    fn show_playing(&self, doc: &mut Document, playing: bool) {
        if let Some(btn) = self.controls.play {
            doc.toggle_class(btn, "is-playing", playing);
            doc.set_attribute(btn, "aria-label", if playing { "Pause" } else { "Play" });
        }
    }

    pub fn toggle_play(&mut self, win: &mut Window) {
        if self.media.paused() {
            self.play(win);
        } else {
            self.pause(win);
        }
    }

    pub fn next(&mut self, win: &mut Window) {
        self.load(win, self.index as isize + 1);
        self.play(win);
    }

    pub fn prev(&mut self, win: &mut Window) {
        self.load(win, self.index as isize - 1);
        self.play(win);
    }

    pub fn toggle_mute(&mut self, win: &mut Window) {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        if let Some(btn) = self.controls.mute {
            win.document.toggle_class(btn, "is-muted", muted);
            win.document
                .set_attribute(btn, "aria-label", if muted { "Unmute" } else { "Mute" });
        }
    }

    /// Seek by `delta` seconds, clamped to the track bounds.
    pub fn seek_by(&mut self, delta: f64) {
        let current = self.media.current_time();
        let duration = self.media.duration();
        let mut target = (current + delta).max(0.0);
        if duration.is_finite() {
            target = target.min(duration);
        }
        self.media.set_current_time(target);
    }

    /// Change the volume by `delta`, clamped to `[0, 1]`, mirroring it on the volume control.
    pub fn adjust_volume(&mut self, win: &mut Window, delta: f64) {
        let volume = (self.media.volume() + delta).clamp(0.0, 1.0);
        self.media.set_volume(volume);
        if let Some(control) = self.controls.volume {
            win.document.set_value(control, &volume.to_string());
        }
    }

    /// Pull pending events from the media element.
    pub fn poll_media(&mut self) -> Vec<MediaEvent> {
        self.media.poll_events()
    }

    pub fn on_media(&mut self, win: &mut Window, event: MediaEvent) {
        let duration = self.media.duration();
        match event {
            MediaEvent::LoadedMetadata => {
                let doc = &mut win.document;
                if let Some(total) = self.controls.time_total {
                    doc.set_text(total, &fmt_time(duration));
                }
                if let Some(seek) = self.controls.seek {
                    let max = if duration.is_finite() && duration > 0.0 {
                        duration
                    } else {
                        100.0
                    };
                    doc.set_attribute(seek, "max", &max.to_string());
                }
            }
            MediaEvent::TimeUpdate => {
                let now = self.media.current_time();
                let doc = &mut win.document;
                if let Some(seek) = self.controls.seek.filter(|_| !self.seeking) {
                    doc.set_value(seek, &now.to_string());
                }
                if let Some(current) = self.controls.time_current {
                    doc.set_text(current, &fmt_time(now));
                }
                let Some(track) = self.tracks.get_mut(self.index) else {
                    return;
                };
                if track.duration.is_none() && duration.is_finite() {
                    track.duration = Some(duration);
                    let dur = self
                        .rows
                        .get(self.index)
                        .and_then(|&row| doc.select(row, ".dur"));
                    if let Some(dur) = dur {
                        doc.set_text(dur, &fmt_time(duration));
                    }
                }
            }
            MediaEvent::Ended => self.next(win),
        }
    }

    fn on_key(&mut self, win: &mut Window, key: Key, target: Option<NodeId>) {
        let Some(target) = target else {
            return;
        };
        let doc = &win.document;
        if !doc.contains(self.root, target) || doc.matches(target, "input, textarea, select") {
            return;
        }
        let step = self.settings.seek_step_seconds;
        let vol = self.settings.volume_step;
        match key {
            Key::Space => self.toggle_play(win),
            Key::ArrowRight => self.seek_by(step),
            Key::ArrowLeft => self.seek_by(-step),
            Key::ArrowUp => self.adjust_volume(win, vol),
            Key::ArrowDown => self.adjust_volume(win, -vol),
            _ => {}
        }
    }

    fn on_click(&mut self, win: &mut Window, target: NodeId) {
        let doc = &win.document;
        let hit = |node: Option<NodeId>| node.is_some_and(|n| doc.contains(n, target));
        let c = &self.controls;
        let action = if hit(c.play) {
            Click::TogglePlay
        } else if hit(c.prev) {
            Click::Prev
        } else if hit(c.next) {
            Click::Next
        } else if hit(c.mute) {
            Click::Mute
        } else if let Some(i) = self.rows.iter().position(|&row| doc.contains(row, target)) {
            Click::Row(i)
        } else {
            return;
        };

        match action {
            Click::TogglePlay => self.toggle_play(win),
            Click::Prev => self.prev(win),
            Click::Next => self.next(win),
            Click::Mute => self.toggle_mute(win),
            Click::Row(i) => {
                self.load(win, i as isize);
                self.play(win);
            }
        }
    }

    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) {
        match *event {
            DomEvent::Click { target } => self.on_click(win, target),
            DomEvent::Input { target } if Some(target) == self.controls.seek => {
                self.seeking = true;
            }
            DomEvent::Change { target } if Some(target) == self.controls.seek => {
                if let Ok(t) = win.document.value(target).trim().parse::<f64>() {
                    self.media.set_current_time(t);
                }
                self.seeking = false;
            }
            DomEvent::Input { target } if Some(target) == self.controls.volume => {
                if let Ok(v) = win.document.value(target).trim().parse::<f64>() {
                    self.media.set_volume(v.clamp(0.0, 1.0));
                }
            }
            DomEvent::KeyDown { key, target } => self.on_key(win, key, target),
            DomEvent::Media(media) => self.on_media(win, media),
            _ => {}
        }
    }
}

enum Click {
    TogglePlay,
    Prev,
    Next,
    Mute,
    Row(usize),
}

/// `((i mod len) + len) mod len`; `len` must be non-zero.
pub fn wrap_index(i: isize, len: usize) -> usize {
    i.rem_euclid(len as isize) as usize
}
