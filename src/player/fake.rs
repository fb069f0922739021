//! Scriptable `MediaElement` for tests.

use super::media::{MediaElement, MediaError};
use crate::events::MediaEvent;

#[derive(Debug)]
pub struct FakeMedia {
    pub src: String,
    pub paused: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub fail_play: bool,
    pub play_calls: usize,
    pub pending: Vec<MediaEvent>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            src: String::new(),
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            fail_play: false,
            play_calls: 0,
            pending: Vec::new(),
        }
    }
}

impl MediaElement for FakeMedia {
    fn set_src(&mut self, src: &str) {
        self.src = src.to_string();
        self.paused = true;
        self.current_time = 0.0;
        self.duration = f64::NAN;
    }

    fn src(&self) -> &str {
        &self.src
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.play_calls += 1;
        if self.fail_play {
            return Err(MediaError::NoSource);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }
}
