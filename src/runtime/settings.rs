use std::path::PathBuf;

use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when the config is unreadable or invalid.
///
/// Logging is not up yet when this runs, so problems are returned as notes
/// and logged once the subscriber is installed.
pub fn load_settings(path: Option<PathBuf>) -> (config::Settings, Option<String>) {
    let loaded = match path {
        Some(path) => config::Settings::load_from(Some(path)),
        None => config::Settings::load(),
    };
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the preview from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

pub fn report(note: Option<String>) {
    if let Some(note) = note {
        warn!("{note}");
    }
}
