use tracing::{debug, warn};

use super::popup::{Notice, Variant};
use super::validate::{Field, field_is_valid};
use crate::dom::{Document, NodeId, Window};
use crate::fetch::{Fetch, FormData};
use crate::i18n::Translator;

const INVALID: &str = "is-invalid";

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed on this many fields; nothing was sent.
    Invalid { errors: usize },
    /// The request could not be dispatched.
    NetworkError,
    /// The endpoint answered with a non-success status.
    Rejected { status: u16 },
    Sent,
}

impl SubmitOutcome {
    /// Popup content for the outcome; `None` for validation failures.
    pub fn notice(&self, tr: &Translator) -> Option<Notice> {
        let (prefix, title, message, variant) = match self {
            SubmitOutcome::Invalid { .. } => return None,
            SubmitOutcome::NetworkError => (
                "popup.networkError",
                "Network error",
                "Could not submit. Check connection and try again.",
                Variant::Error,
            ),
            SubmitOutcome::Rejected { .. } => (
                "popup.error",
                "Sorry",
                "Something went wrong. Please try again.",
                Variant::Error,
            ),
            SubmitOutcome::Sent => (
                "popup.success",
                "Thank you",
                "Message sent successfully!",
                Variant::Success,
            ),
        };
        Some(Notice {
            title: tr.t(&format!("{prefix}.title"), title),
            message: tr.t(&format!("{prefix}.message"), message),
            variant,
        })
    }
}

/// `#contactForm` with its `#name`, `#email`, `#message` and optional `#consent` controls.
pub struct ContactForm {
    form: NodeId,
    fields: Vec<(Field, NodeId)>,
}

impl ContactForm {
    pub fn mount(win: &Window) -> Option<Self> {
        let doc = &win.document;
        let form = doc.get_element_by_id("contactForm")?;
        let mut fields = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            match doc.select(form, &format!("#{}", field.element_id())) {
                Some(node) => fields.push((field, node)),
                None if field == Field::Consent => {}
                None => {
                    warn!(field = field.element_id(), "contact form is missing a field");
                    return None;
                }
            }
        }
        Some(Self { form, fields })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn field(&self, field: Field) -> Option<NodeId> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, node)| node)
    }

    /// Check every field, marking the failing ones. Returns the number of failures.
    pub fn validate(&self, doc: &mut Document, tr: &Translator) -> usize {
        self.clear_errors(doc);
        let mut errors = 0;
        for &(field, node) in &self.fields {
            if field_is_valid(field, doc.value(node), doc.is_checked(node)) {
                continue;
            }
            let (key, fallback) = field.error_text();
            show_error(doc, node, &tr.t(key, fallback));
            errors += 1;
        }
        errors
    }

    pub fn clear_errors(&self, doc: &mut Document) {
        for node in doc.select_all(self.form, ".is-invalid") {
            doc.remove_class(node, INVALID);
            doc.remove_attribute(node, "aria-invalid");
        }
        for msg in doc.select_all(self.form, ".error-msg") {
            doc.set_text(msg, "");
        }
    }

    /// Re-check a single edited control and clear its error once it passes.
    pub fn on_input(&self, doc: &mut Document, target: NodeId) {
        if !doc.contains(self.form, target) || !doc.has_class(target, INVALID) {
            return;
        }
        let valid = if doc.attribute(target, "type") == Some("checkbox") {
            doc.is_checked(target)
        } else if doc.id_of(target) == Some("email") {
            field_is_valid(Field::Email, doc.value(target), false)
        } else {
            !doc.value(target).trim().is_empty()
        };
        if valid {
            doc.remove_class(target, INVALID);
            doc.remove_attribute(target, "aria-invalid");
            if let Some(msg) = doc
                .parent(target)
                .and_then(|parent| doc.select(parent, ".error-msg"))
            {
                doc.set_text(msg, "");
            }
        }
    }

    /// Named, enabled controls in document order. Unchecked checkboxes and
    /// radios are left out; a checked one without a value sends `on`.
    pub fn serialize(&self, doc: &Document) -> FormData {
        let mut data = FormData::default();
        for node in doc.select_all(self.form, "input, textarea, select") {
            let Some(name) = doc.attribute(node, "name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if doc.has_attribute(node, "disabled") {
                continue;
            }
            match doc.attribute(node, "type") {
                Some("checkbox" | "radio") => {
                    if doc.is_checked(node) {
                        data.append(name, doc.attribute(node, "value").unwrap_or("on"));
                    }
                }
                Some("submit" | "button" | "reset" | "file") => {}
                _ => data.append(name, doc.value(node)),
            }
        }
        data
    }

    /// Restore every control to its markup default.
    pub fn reset(&self, doc: &mut Document) {
        for node in doc.select_all(self.form, "input, textarea, select") {
            let tag = doc.element(node).tag.clone();
            match (tag.as_str(), doc.attribute(node, "type")) {
                ("input", Some("checkbox" | "radio")) => {
                    let checked = doc.has_attribute(node, "checked");
                    doc.set_checked(node, checked);
                }
                ("input", Some("submit" | "button" | "reset")) => {}
                ("textarea", _) => {
                    let default = doc.text_content(node);
                    doc.set_value(node, &default);
                }
                _ => {
                    let default = doc.attribute(node, "value").unwrap_or_default().to_string();
                    doc.set_value(node, &default);
                }
            }
        }
    }

    /// The form's `action`, resolved against the page URL.
    pub fn action_url(&self, win: &Window) -> String {
        win.document
            .attribute(self.form, "action")
            .filter(|a| !a.is_empty())
            .and_then(|a| win.location.resolve(a))
            .map(|u| u.to_string())
            .unwrap_or_else(|| win.location.href().to_string())
    }

    /// Validate, then POST the serialized form. Fields are reset after a success.
    pub async fn submit<F: Fetch>(&self, win: &mut Window, tr: &Translator, fetcher: &F) -> SubmitOutcome {
        let errors = self.validate(&mut win.document, tr);
        if errors > 0 {
            debug!(errors, "contact form rejected");
            return SubmitOutcome::Invalid { errors };
        }

        let url = self.action_url(win);
        let data = self.serialize(&win.document);
        match fetcher.post_form(&url, &data).await {
            Err(e) => {
                warn!("contact form not submitted: {e}");
                SubmitOutcome::NetworkError
            }
            Ok(resp) if resp.ok() => {
                self.reset(&mut win.document);
                SubmitOutcome::Sent
            }
            Ok(resp) => {
                warn!(status = resp.status, "contact form endpoint rejected the message");
                SubmitOutcome::Rejected {
                    status: resp.status,
                }
            }
        }
    }
}

/// Flag `input` as invalid and put `message` into the `.error-msg` next to it.
fn show_error(doc: &mut Document, input: NodeId, message: &str) {
    doc.add_class(input, INVALID);
    doc.set_attribute(input, "aria-invalid", "true");
    let Some(parent) = doc.parent(input) else {
        return;
    };
    let msg = match doc.select(parent, ".error-msg") {
        Some(msg) => msg,
        None => doc.append(parent, "p", &[("class", "error-msg")]),
    };
    doc.set_text(msg, message);
}
