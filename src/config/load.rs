use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `FONELL__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path())
    }

    /// Like `load`, reading the config file at `config_path` instead.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("FONELL")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("site.languages")
                .with_list_parse_key("privacy.languages")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.site.languages.is_empty() {
            return Err("site.languages must name at least one language".to_string());
        }
        if self.albums.narrow_breakpoint >= self.albums.wide_breakpoint {
            return Err("albums.narrow_breakpoint must be below albums.wide_breakpoint".to_string());
        }
        let per_page = &self.albums.cards_per_page;
        if per_page.narrow == 0 || per_page.medium == 0 || per_page.wide == 0 {
            return Err("albums.cards_per_page entries must be >= 1".to_string());
        }
        if !(0.0..1.0).contains(&self.albums.drag_viewport_ratio) {
            return Err("albums.drag_viewport_ratio must be within 0..1".to_string());
        }
        if self.press.max_pages == 0 {
            return Err("press.max_pages must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.player.volume_step) {
            return Err("player.volume_step must be within 0..=1".to_string());
        }
        if !self.privacy.languages.contains(&self.privacy.default_language) {
            return Err("privacy.default_language must be one of privacy.languages".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `FONELL_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("FONELL_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/fonell/config.toml`
/// or `~/.config/fonell/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("fonell").join("config.toml"))
}

/// Compute the default log file path under `$XDG_STATE_HOME/fonell/fonell.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("fonell").join("fonell.log"))
}

/// Compute the default storage file that stands in for the browser's local storage.
pub fn default_storage_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("fonell").join("storage.toml"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
