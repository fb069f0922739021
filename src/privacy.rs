//! Privacy policy page: per-language document with a default-language and
//! a built-in fallback.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PrivacySettings;
use crate::dom::{Document, NodeId, Window};
use crate::fetch::{Fetch, fetch_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrivacyPolicy {
    pub title: String,
    pub intro: String,
    pub contact: PolicySection,
    pub rights: PolicySection,
    pub updated: String,
}

impl PrivacyPolicy {
    /// English text used when no policy document can be loaded.
    pub fn builtin() -> Self {
        Self {
            title: "Privacy Policy".into(),
            intro: "We value your privacy. This page explains what personal data we collect when \
                    you contact us and how we use and protect it."
                .into(),
            contact: PolicySection {
                title: "Contact".into(),
                text: "If you contact us via the form or by email, we process your details to \
                       respond to your inquiry. Your data will not be shared with third parties \
                       without your consent."
                    .into(),
            },
            rights: PolicySection {
                title: "Your rights".into(),
                text: "You have the right to access, rectify, erase, and restrict the processing \
                       of your personal data, as well as the right to data portability, where \
                       applicable. You can withdraw consent at any time for the future."
                    .into(),
            },
            updated: "Last updated: 2025-11-18".into(),
        }
    }
}

const SLOTS: [&str; 7] = [
    "privacy.title",
    "privacy.intro",
    "privacy.contact.title",
    "privacy.contact.text",
    "privacy.rights.title",
    "privacy.rights.text",
    "privacy.updated",
];

pub struct PrivacyPage {
    slots: [Option<NodeId>; 7],
    title_tag: Option<NodeId>,
    settings: PrivacySettings,
    site_name: String,
    lang: Option<String>,
}

impl PrivacyPage {
    /// Mount when the page carries a `[data-i18n="privacy.title"]` element.
    pub fn mount(win: &Window, settings: PrivacySettings, site_name: &str) -> Option<Self> {
        let doc = &win.document;
        let root = doc.document_element();
        let slots = SLOTS.map(|key| doc.select(root, &format!("[data-i18n=\"{key}\"]")));
        slots[0]?;
        Some(Self {
            slots,
            title_tag: doc.select(doc.head(), "title"),
            settings,
            site_name: site_name.to_string(),
            lang: None,
        })
    }

    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Restrict `lang` to the languages that have a policy document.
    pub fn supported_language(&self, lang: &str) -> String {
        let lang = lang.trim().to_lowercase();
        if self.settings.languages.iter().any(|l| *l == lang) {
            lang
        } else {
            self.settings.default_language.clone()
        }
    }

    /// Language from the `lang` query parameter, else the document language.
    pub fn page_language(&self, win: &Window) -> String {
        let doc = &win.document;
        let requested = win
            .location
            .query_param("lang")
            .filter(|l| !l.is_empty())
            .or_else(|| {
                doc.attribute(doc.document_element(), "lang")
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "en".to_string());
        self.supported_language(&requested)
    }

    fn url(&self, lang: &str) -> String {
        self.settings.data_path.replace("{lang}", lang)
    }

    pub async fn load<F: Fetch>(&mut self, win: &mut Window, fetcher: &F, lang: &str) {
        let chosen = self.supported_language(lang);
        self.lang = Some(chosen.clone());

        let mut candidates = vec![self.url(&chosen)];
        if chosen != self.settings.default_language {
            candidates.push(self.url(&self.settings.default_language));
        }
        for url in candidates {
            match fetch_json::<F, PrivacyPolicy>(fetcher, &url).await {
                Ok(policy) => {
                    debug!(%url, "loaded privacy policy");
                    self.apply(&mut win.document, &policy);
                    return;
                }
                Err(e) => warn!(%url, "privacy policy unavailable: {e}"),
            }
        }
        self.apply(&mut win.document, &PrivacyPolicy::builtin());
    }

    pub fn apply(&self, doc: &mut Document, policy: &PrivacyPolicy) {
        let texts = [
            &policy.title,
            &policy.intro,
            &policy.contact.title,
            &policy.contact.text,
            &policy.rights.title,
            &policy.rights.text,
            &policy.updated,
        ];
        for (slot, text) in self.slots.iter().zip(texts) {
            if let Some(node) = *slot {
                doc.set_text(node, text);
            }
        }
        if let Some(title) = self.title_tag {
            doc.set_text(title, &format!("{} • {}", policy.title, self.site_name));
        }
    }
}
