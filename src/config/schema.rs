use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/fonell/config.toml` or `~/.config/fonell/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `FONELL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub site: SiteSettings,
    pub i18n: I18nSettings,
    pub nav: NavSettings,
    pub drawer: DrawerSettings,
    pub albums: AlbumSettings,
    pub player: PlayerSettings,
    pub press: PressSettings,
    pub privacy: PrivacySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Where the site's static files live: a local directory or an `http(s)://` origin.
    pub root: String,
    /// URL the preview pretends to be served from. Relative data paths and the
    /// `lang` query parameter are resolved against it.
    pub page_url: String,
    /// Used in document titles ("Privacy Policy • Ana Fonell").
    pub name: String,
    /// Languages offered by the language menus, in menu order.
    pub languages: Vec<String>,
    /// Value of `<html lang>` before any language has been applied.
    pub document_language: String,
    /// Gallery images, relative to a local `root`.
    pub gallery_dir: String,
    /// `action` of the contact form; empty posts back to the page URL.
    pub contact_action: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            root: "site".to_string(),
            page_url: "https://anafonell.de/".to_string(),
            name: "Ana Fonell".to_string(),
            languages: vec!["de".into(), "en".into(), "es".into()],
            document_language: "de".to_string(),
            gallery_dir: "assets/img/gallery".to_string(),
            contact_action: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// Directory of the script that loads translations, relative to `site.page_url`.
    /// The first candidate URL for a dictionary is `<script_dir>/lang/<code>.json`.
    pub script_dir: String,
    /// Local storage key holding the saved language preference.
    pub storage_key: String,
    /// Query parameter carrying the language.
    pub query_param: String,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            script_dir: "js/".to_string(),
            storage_key: "lang".to_string(),
            query_param: "lang".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavSettings {
    /// Accent color (a CSS value) applied to `--nav-hover-color` per section id.
    pub accents: BTreeMap<String, String>,
    /// Section whose accent is used for ids missing from `accents`.
    pub default_section: String,
}

impl Default for NavSettings {
    fn default() -> Self {
        let accents = [
            ("home", "var(--color-primary)"),
            ("music", "var(--color-primary)"),
            ("bio", "var(--color-primary-alt)"),
            ("contact", "var(--color-primary)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            accents,
            default_section: "home".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawerSettings {
    /// Viewport width (px) above which the mobile drawer is force-closed.
    pub breakpoint: u32,
}

impl Default for DrawerSettings {
    fn default() -> Self {
        Self { breakpoint: 700 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlbumSettings {
    /// Viewports narrower than this (px) use `cards_per_page.narrow`.
    pub narrow_breakpoint: u32,
    /// Viewports narrower than this (px) use `cards_per_page.medium`, wider ones `wide`.
    pub wide_breakpoint: u32,
    pub cards_per_page: CardsPerPage,
    /// Minimum drag distance (px) that turns a swipe into a page change.
    pub drag_min_px: f64,
    /// Drag distance as a fraction of viewport width; the larger of the two wins.
    pub drag_viewport_ratio: f64,
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 700,
            wide_breakpoint: 1024,
            cards_per_page: CardsPerPage::default(),
            drag_min_px: 50.0,
            drag_viewport_ratio: 0.08,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(default)]
pub struct CardsPerPage {
    pub narrow: usize,
    pub medium: usize,
    pub wide: usize,
}

impl Default for CardsPerPage {
    fn default() -> Self {
        Self {
            narrow: 1,
            medium: 2,
            wide: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Seconds to seek with the left/right arrow keys.
    pub seek_step_seconds: f64,
    /// Volume change applied by the up/down arrow keys.
    pub volume_step: f64,
    /// Cover shown for tracks that do not name one.
    pub default_cover: String,
    /// Music/album data document, relative to the page URL.
    pub data_path: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5.0,
            volume_step: 0.05,
            default_cover: "assets/img/ana_shoes.jpg".to_string(),
            data_path: "data/music.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PressSettings {
    /// Review data path; `{lang}` is replaced by the language code.
    pub data_path: String,
    /// Language whose file is tried when the requested one is unavailable.
    pub fallback_language: String,
    /// Upper bound on navigation pages.
    pub max_pages: usize,
}

impl Default for PressSettings {
    fn default() -> Self {
        Self {
            data_path: "/data/press-{lang}.json".to_string(),
            fallback_language: "de".to_string(),
            max_pages: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    /// Privacy data path; `{lang}` is replaced by the language code.
    pub data_path: String,
    /// Languages that have a privacy document.
    pub languages: Vec<String>,
    pub default_language: String,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            data_path: "data/privacy.{lang}.json".to_string(),
            languages: vec!["en".into(), "de".into(), "es".into()],
            default_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/fonell/fonell.log`.
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
