use thiserror::Error;

use crate::events::MediaEvent;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("no source loaded")]
    NoSource,
    #[error("failed to open {src:?}")]
    Open {
        src: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {src:?}: {message}")]
    Decode { src: String, message: String },
}

/// The single audio element a player drives.
///
/// Times are in seconds. `duration()` is NaN until the source's length is known.
pub trait MediaElement {
    fn set_src(&mut self, src: &str);
    fn src(&self) -> &str;

    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn paused(&self) -> bool;

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Events raised since the last poll, in order.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
