//! `rodio`-backed media element for the terminal preview.
//!
//! Sources are site URLs. Same-origin URLs are mapped onto the local site
//! checkout; anything else cannot be played and reports `NoSource`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};
use url::Url;

use crate::events::MediaEvent;
use crate::fetch::local_path;
use crate::player::{MediaElement, MediaError};

pub struct RodioMedia {
    /// Local site checkout; `None` when the site is served over HTTP.
    root: Option<PathBuf>,
    page: Url,
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    src: String,
    path: Option<PathBuf>,
    duration: f64,
    /// Position to start from when the next sink is created.
    start_at: f64,
    volume: f64,
    muted: bool,
    paused: bool,
    pending: Vec<MediaEvent>,
}

impl RodioMedia {
    pub fn new(root: Option<PathBuf>, page: Url) -> Self {
        Self {
            root,
            page,
            stream: None,
            sink: None,
            src: String::new(),
            path: None,
            duration: f64::NAN,
            start_at: 0.0,
            volume: 1.0,
            muted: false,
            paused: true,
            pending: Vec::new(),
        }
    }

    /// Map a site URL onto a file in the local checkout.
    fn resolve(&self, src: &str) -> Option<PathBuf> {
        let root = self.root.as_deref()?;
        let url = self.page.join(src).ok()?;
        if url.origin() != self.page.origin() {
            return None;
        }
        local_path(root, url.path().trim_start_matches('/'))
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume as f32 }
    }

    fn output(&mut self) -> Result<&OutputStream, MediaError> {
        if self.stream.is_none() {
            let mut stream =
                OutputStreamBuilder::open_default_stream().map_err(|e| MediaError::NoDevice(e.to_string()))?;
            // rodio logs to stderr when the stream is dropped, which corrupts the TUI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| MediaError::NoDevice("output stream unavailable".to_string()))
    }

    /// Open and decode the current source. Fails before touching the device.
    fn decoder(&self) -> Result<Decoder<std::io::BufReader<File>>, MediaError> {
        let path = self.path.as_ref().ok_or(MediaError::NoSource)?;
        let file = File::open(path).map_err(|source| MediaError::Open {
            src: self.src.clone(),
            source,
        })?;
        Decoder::try_from(file).map_err(|e| MediaError::Decode {
            src: self.src.clone(),
            message: e.to_string(),
        })
    }

    /// Create a paused sink for the current source at `start_at`.
    fn create_sink(&mut self) -> Result<(), MediaError> {
        let source = self.decoder()?;
        let volume = self.effective_volume();
        let start_at = Duration::from_secs_f64(self.start_at.max(0.0));

        let sink = Sink::connect_new(self.output()?.mixer());
        sink.append(source);
        sink.pause();
        sink.set_volume(volume);
        if !start_at.is_zero() {
            if let Err(e) = sink.try_seek(start_at) {
                warn!(src = %self.src, "seek failed: {e}");
            }
        }
        self.sink = Some(sink);
        Ok(())
    }
}

/// Length of the file at `path`, if its container reports one.
fn probe_duration(path: &Path) -> Option<f64> {
    let tagged = lofty::read_from_path(path).ok()?;
    let secs = tagged.properties().duration().as_secs_f64();
    (secs > 0.0).then_some(secs)
}

impl MediaElement for RodioMedia {
    fn set_src(&mut self, src: &str) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.src = src.to_string();
        self.path = self.resolve(src);
        self.paused = true;
        self.start_at = 0.0;
        self.duration = self
            .path
            .as_deref()
            .and_then(probe_duration)
            .unwrap_or(f64::NAN);
        debug!(src, path = ?self.path, duration = self.duration, "media source set");
        self.pending.push(MediaEvent::LoadedMetadata);
    }

    fn src(&self) -> &str {
        &self.src
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.sink.is_none() {
            self.create_sink()?;
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.paused = true;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        match &self.sink {
            Some(sink) => sink.get_pos().as_secs_f64(),
            None => self.start_at,
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        match &self.sink {
            Some(sink) => {
                if let Err(e) = sink.try_seek(Duration::from_secs_f64(seconds)) {
                    warn!(src = %self.src, "seek failed: {e}");
                }
            }
            None => self.start_at = seconds,
        }
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        let effective = self.effective_volume();
        if let Some(sink) = &self.sink {
            sink.set_volume(effective);
        }
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let effective = self.effective_volume();
        if let Some(sink) = &self.sink {
            sink.set_volume(effective);
        }
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut events = std::mem::take(&mut self.pending);
        if self.paused {
            return events;
        }
        let Some(ended) = self.sink.as_ref().map(Sink::empty) else {
            return events;
        };
        if ended {
            self.sink = None;
            self.paused = true;
            self.start_at = 0.0;
            events.push(MediaEvent::Ended);
        } else {
            events.push(MediaEvent::TimeUpdate);
        }
        events
    }
}
