use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::I18nSettings;
use crate::dom::{Document, Location, Window};
use crate::events::{Publisher, SiteEvent};
use crate::fetch::{Fetch, FetchError};

/// Flat mapping from dotted key to translated text.
pub type Dictionary = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to load translations for {lang:?}")]
    Unavailable {
        lang: String,
        #[source]
        last: Option<FetchError>,
    },
}

/// Options for `Translator::set_language`.
#[derive(Debug, Copy, Clone)]
pub struct SetLanguageOptions {
    /// Rewrite the `lang` query parameter of the page URL.
    pub update_url: bool,
}

impl Default for SetLanguageOptions {
    fn default() -> Self {
        Self { update_url: true }
    }
}

/// An in-flight language change. Only the most recent request may apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRequest {
    pub lang: String,
    generation: u64,
    update_url: bool,
}

/// Loads, caches and applies dictionaries; owns the "current language".
pub struct Translator {
    settings: I18nSettings,
    script_base: Option<Url>,
    cache: HashMap<String, Arc<Dictionary>>,
    current: Option<String>,
    generation: u64,
    publisher: Publisher,
}

impl Translator {
    pub fn new(settings: I18nSettings, location: &Location, publisher: Publisher) -> Self {
        let script_base = location.resolve(&settings.script_dir);
        Self {
            settings,
            script_base,
            cache: HashMap::new(),
            current: None,
            generation: 0,
            publisher,
        }
    }

    /// The language applied most recently, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Dictionary of the current language, if one was applied.
    pub fn dictionary(&self) -> Option<Arc<Dictionary>> {
        self.current
            .as_ref()
            .and_then(|lang| self.cache.get(lang))
            .cloned()
    }

    /// Pick the starting language: query parameter, then saved preference,
    /// then the document's declared language (first two letters), lower-cased.
    pub fn initial_language(&self, win: &Window) -> String {
        if let Some(lang) = win
            .location
            .query_param(&self.settings.query_param)
            .filter(|l| !l.is_empty())
        {
            return lang.to_lowercase();
        }
        if let Some(saved) = win
            .storage
            .get(&self.settings.storage_key)
            .filter(|l| !l.is_empty())
        {
            return saved.to_lowercase();
        }
        let doc = &win.document;
        let declared = doc
            .attribute(doc.document_element(), "lang")
            .filter(|l| !l.is_empty())
            .unwrap_or("en");
        declared.chars().take(2).collect::<String>().to_lowercase()
    }

    /// Whether the page URL carried an explicit language at load time.
    pub fn language_in_url(&self, win: &Window) -> bool {
        win.location.has_query_param(&self.settings.query_param)
    }

    /// Dictionary URLs for `lang`, tried in order.
    pub fn candidate_urls(&self, lang: &str) -> Vec<String> {
        let file = format!("lang/{lang}.json");
        let mut urls = Vec::with_capacity(3);
        if let Some(url) = self.script_base.as_ref().and_then(|b| b.join(&file).ok()) {
            urls.push(url.to_string());
        }
        urls.push(format!("/{file}"));
        urls.push(file);
        urls
    }

    /// Start a language change; supersedes every earlier request.
    pub fn begin(&mut self, lang: &str, options: SetLanguageOptions) -> LanguageRequest {
        self.generation += 1;
        LanguageRequest {
            lang: lang.trim().to_lowercase(),
            generation: self.generation,
            update_url: options.update_url,
        }
    }

    /// Fetch the dictionary for `lang`, trying each candidate URL in turn.
    pub async fn fetch<F: Fetch>(&self, fetcher: &F, lang: &str) -> Result<Arc<Dictionary>, I18nError> {
        if let Some(dict) = self.cache.get(lang) {
            return Ok(dict.clone());
        }

        let mut last: Option<FetchError> = None;
        for url in self.candidate_urls(lang) {
            match fetcher.get(&url).await {
                Ok(resp) if resp.ok() => match resp.json::<serde_json::Map<String, Value>>() {
                    Ok(map) => {
                        debug!(%url, lang, "loaded dictionary");
                        return Ok(Arc::new(string_entries(map)));
                    }
                    Err(e) => {
                        warn!(%url, "ignoring malformed dictionary: {e}");
                        last = Some(e);
                    }
                },
                Ok(resp) => debug!(%url, status = resp.status, "dictionary candidate unavailable"),
                Err(e) => {
                    debug!(%url, "dictionary candidate failed: {e}");
                    last = Some(e);
                }
            }
        }

        Err(I18nError::Unavailable {
            lang: lang.to_string(),
            last,
        })
    }

    /// Finish `request` with a loaded dictionary. Returns `false` when a newer
    /// request superseded this one and nothing was applied.
    pub fn complete(&mut self, win: &mut Window, request: &LanguageRequest, dict: Arc<Dictionary>) -> bool {
        self.cache.insert(request.lang.clone(), dict.clone());

        if request.generation != self.generation {
            debug!(lang = %request.lang, "discarding superseded language change");
            return false;
        }

        let lang = request.lang.as_str();
        apply_dictionary(&mut win.document, &dict);

        let doc = &mut win.document;
        let root = doc.document_element();
        doc.set_attribute(root, "lang", lang);
        for button in doc.select_all(root, ".lang-toggle") {
            doc.set_text(button, &lang.to_uppercase());
        }

        win.storage.set(&self.settings.storage_key, lang);
        self.current = Some(lang.to_string());

        self.publisher.publish(SiteEvent::LanguageChanged {
            lang: lang.to_string(),
            dict,
        });

        if request.update_url {
            win.location.replace_query_param(&self.settings.query_param, lang);
        }
        true
    }

    /// Load (or reuse) the dictionary for `lang` and apply it to the page.
    ///
    /// On failure nothing is applied and the previous language stays active.
    pub async fn set_language<F: Fetch>(
        &mut self,
        win: &mut Window,
        fetcher: &F,
        lang: &str,
        options: SetLanguageOptions,
    ) -> Result<bool, I18nError> {
        let request = self.begin(lang, options);
        match self.fetch(fetcher, &request.lang).await {
            Ok(dict) => Ok(self.complete(win, &request, dict)),
            Err(e) => {
                error!("{e}");
                Err(e)
            }
        }
    }

    /// Translated text for `key` in the current language, else `fallback`, else `key`.
    pub fn t(&self, key: &str, fallback: &str) -> String {
        let hit = self
            .current
            .as_ref()
            .and_then(|lang| self.cache.get(lang))
            .and_then(|dict| dict.get(key))
            .filter(|v| !v.is_empty());
        match hit {
            Some(v) => v.clone(),
            None if !fallback.is_empty() => fallback.to_string(),
            None => key.to_string(),
        }
    }
}

fn string_entries(map: serde_json::Map<String, Value>) -> Dictionary {
    map.into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}

/// Replace the text of `[data-i18n]` elements and the placeholder of
/// `[data-i18n-placeholder]` elements whose key is in `dict`.
pub fn apply_dictionary(doc: &mut Document, dict: &Dictionary) {
    let root = doc.document_element();
    for el in doc.select_all(root, "[data-i18n]") {
        let value = doc
            .attribute(el, "data-i18n")
            .filter(|k| !k.is_empty())
            .and_then(|k| dict.get(k))
            .cloned();
        if let Some(value) = value {
            doc.set_text(el, &value);
        }
    }
    for el in doc.select_all(root, "[data-i18n-placeholder]") {
        let value = doc
            .attribute(el, "data-i18n-placeholder")
            .filter(|k| !k.is_empty())
            .and_then(|k| dict.get(k))
            .cloned();
        if let Some(value) = value {
            doc.set_attribute(el, "placeholder", &value);
        }
    }
}
