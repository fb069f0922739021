use std::sync::Arc;

use super::*;
use crate::config::I18nSettings;
use crate::dom::{Document, Location, NodeId, Storage, Window};
use crate::events::{Bus, DomEvent, Key};
use crate::fetch::memory::MemoryFetcher;
use crate::i18n::{Dictionary, SetLanguageOptions, Translator};

#[test]
fn email_rule_matches_simple_addresses() {
    for ok in ["user@example.com", "a.b@sub.domain.co", "  user@example.com  "] {
        assert!(validate_email(ok), "{ok} should pass");
    }
    for bad in ["user@domain", "user domain.com", "", "   ", "no-at-sign.com", "a@b.c", "a b@c.de"] {
        assert!(!validate_email(bad), "{bad:?} should fail");
    }
}

struct Page {
    win: Window,
    form: NodeId,
    name: NodeId,
    email: NodeId,
    message: NodeId,
    consent: NodeId,
    submit: NodeId,
}

fn page() -> Page {
    let mut doc = Document::new();
    let body = doc.body();
    let form = doc.append(
        body,
        "form",
        &[("id", "contactForm"), ("action", "https://formspree.io/f/abc")],
    );
    let name = field(&mut doc, form, "input", &[("id", "name"), ("name", "name")]);
    let email = field(&mut doc, form, "input", &[("id", "email"), ("name", "email"), ("type", "email")]);
    let message = field(&mut doc, form, "textarea", &[("id", "message"), ("name", "message")]);
    let consent = field(
        &mut doc,
        form,
        "input",
        &[("id", "consent"), ("name", "consent"), ("type", "checkbox")],
    );
    let submit = doc.append_text(form, "button", &[("type", "submit")], "Send");
    Page {
        win: Window::new(
            doc,
            Location::parse("https://anafonell.de/?lang=de").unwrap(),
            Storage::in_memory(),
        ),
        form,
        name,
        email,
        message,
        consent,
        submit,
    }
}

fn field(doc: &mut Document, form: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let wrap = doc.append(form, "div", &[("class", "field")]);
    doc.append(wrap, tag, attrs)
}

fn fill(p: &mut Page) {
    let doc = &mut p.win.document;
    doc.set_value(p.name, "Ana");
    doc.set_value(p.email, "ana@example.com");
    doc.set_value(p.message, "Hola");
    doc.set_checked(p.consent, true);
}

fn translator(win: &Window, bus: &Bus) -> Translator {
    Translator::new(I18nSettings::default(), &win.location, bus.publisher())
}

fn error_messages(doc: &Document, form: NodeId) -> Vec<String> {
    doc.select_all(form, ".error-msg")
        .into_iter()
        .map(|m| doc.text_content(m))
        .filter(|t| !t.is_empty())
        .collect()
}

#[test]
fn empty_form_marks_all_four_fields_and_sends_nothing() {
    let bus = Bus::new();
    let mut p = page();
    let tr = translator(&p.win, &bus);
    let form = ContactForm::mount(&p.win).unwrap();
    let fetcher = MemoryFetcher::new().with_post_status(200);

    let outcome = async_io::block_on(form.submit(&mut p.win, &tr, &fetcher));
    assert_eq!(outcome, SubmitOutcome::Invalid { errors: 4 });
    assert!(outcome.notice(&tr).is_none());
    assert!(fetcher.posts().is_empty());

    let doc = &p.win.document;
    assert_eq!(doc.select_all(p.form, ".is-invalid").len(), 4);
    for node in [p.name, p.email, p.message, p.consent] {
        assert_eq!(doc.attribute(node, "aria-invalid"), Some("true"));
    }
    assert_eq!(
        error_messages(doc, p.form),
        vec![
            "Name is required.",
            "Please enter a valid email address.",
            "Message cannot be empty.",
            "Please check this box to allow us to use your information to respond.",
        ]
    );
}

#[test]
fn error_messages_are_translated_and_reused() {
    let bus = Bus::new();
    let mut p = page();
    let mut tr = translator(&p.win, &bus);
    let dict: Dictionary = [("form.error.nameRequired".to_string(), "Name fehlt.".to_string())].into();
    let req = tr.begin("de", SetLanguageOptions { update_url: false });
    tr.complete(&mut p.win, &req, Arc::new(dict));

    let form = ContactForm::mount(&p.win).unwrap();
    form.validate(&mut p.win.document, &tr);
    form.validate(&mut p.win.document, &tr);

    let doc = &p.win.document;
    let wrap = doc.parent(p.name).unwrap();
    let msgs = doc.select_all(wrap, ".error-msg");
    assert_eq!(msgs.len(), 1);
    assert_eq!(doc.text_content(msgs[0]), "Name fehlt.");
}

#[test]
fn editing_an_invalid_field_rechecks_only_that_field() {
    let bus = Bus::new();
    let mut p = page();
    let tr = translator(&p.win, &bus);
    let form = ContactForm::mount(&p.win).unwrap();
    form.validate(&mut p.win.document, &tr);

    p.win.document.set_value(p.email, "not-an-email");
    form.on_input(&mut p.win.document, p.email);
    assert!(p.win.document.has_class(p.email, "is-invalid"));

    p.win.document.set_value(p.email, "ana@example.com");
    form.on_input(&mut p.win.document, p.email);
    let doc = &p.win.document;
    assert!(!doc.has_class(p.email, "is-invalid"));
    assert!(!doc.has_attribute(p.email, "aria-invalid"));
    assert!(doc.has_class(p.name, "is-invalid"));
    assert_eq!(error_messages(doc, p.form).len(), 3);

    p.win.document.set_checked(p.consent, true);
    form.on_input(&mut p.win.document, p.consent);
    assert!(!p.win.document.has_class(p.consent, "is-invalid"));
}

#[test]
fn valid_form_posts_fields_and_resets() {
    let bus = Bus::new();
    let mut p = page();
    let tr = translator(&p.win, &bus);
    let form = ContactForm::mount(&p.win).unwrap();
    let fetcher = MemoryFetcher::new().with_post_status(200);
    fill(&mut p);

    let outcome = async_io::block_on(form.submit(&mut p.win, &tr, &fetcher));
    assert_eq!(outcome, SubmitOutcome::Sent);

    let posts = fetcher.posts();
    assert_eq!(posts.len(), 1);
    let (url, data) = &posts[0];
    assert_eq!(url, "https://formspree.io/f/abc");
    assert_eq!(data.get("name"), Some("Ana"));
    assert_eq!(data.get("email"), Some("ana@example.com"));
    assert_eq!(data.get("message"), Some("Hola"));
    assert_eq!(data.get("consent"), Some("on"));
    assert_eq!(data.fields.len(), 4);

    let doc = &p.win.document;
    assert_eq!(doc.value(p.name), "");
    assert!(!doc.is_checked(p.consent));

    let notice = outcome.notice(&tr).unwrap();
    assert_eq!(notice.title, "Thank you");
    assert_eq!(notice.variant, Variant::Success);
}

#[test]
fn failed_posts_keep_the_fields() {
    let bus = Bus::new();
    let mut p = page();
    let tr = translator(&p.win, &bus);
    let form = ContactForm::mount(&p.win).unwrap();
    fill(&mut p);

    let unreachable = MemoryFetcher::new();
    let outcome = async_io::block_on(form.submit(&mut p.win, &tr, &unreachable));
    assert_eq!(outcome, SubmitOutcome::NetworkError);
    assert_eq!(outcome.notice(&tr).unwrap().title, "Network error");
    assert_eq!(p.win.document.value(p.name), "Ana");

    let failing = MemoryFetcher::new().with_post_status(500);
    let outcome = async_io::block_on(form.submit(&mut p.win, &tr, &failing));
    assert_eq!(outcome, SubmitOutcome::Rejected { status: 500 });
    let notice = outcome.notice(&tr).unwrap();
    assert_eq!(notice.message, "Something went wrong. Please try again.");
    assert_eq!(notice.variant, Variant::Error);
}

#[test]
fn consent_is_optional_when_absent() {
    let mut doc = Document::new();
    let form = doc.append(doc.body(), "form", &[("id", "contactForm")]);
    let name = doc.append(form, "input", &[("id", "name")]);
    let email = doc.append(form, "input", &[("id", "email")]);
    let message = doc.append(form, "textarea", &[("id", "message")]);
    doc.set_value(name, "Ana");
    doc.set_value(email, "ana@example.com");
    doc.set_value(message, "Hi");
    let win = Window::new(
        doc,
        Location::parse("https://anafonell.de/contact.html").unwrap(),
        Storage::in_memory(),
    );
    let bus = Bus::new();
    let tr = translator(&win, &bus);

    let contact = ContactForm::mount(&win).unwrap();
    assert!(contact.field(Field::Consent).is_none());
    let mut doc = win.document.clone();
    assert_eq!(contact.validate(&mut doc, &tr), 0);
    assert_eq!(contact.action_url(&win), "https://anafonell.de/contact.html");
}

struct PopupPage {
    win: Window,
    popup: NodeId,
    ok: NodeId,
    backdrop: NodeId,
    dialog: NodeId,
    trigger: NodeId,
}

fn popup_page() -> PopupPage {
    let mut doc = Document::new();
    let body = doc.body();
    let trigger = doc.append_text(body, "button", &[("type", "submit")], "Send");
    let popup = doc.append(body, "div", &[("id", "popup"), ("hidden", "")]);
    let backdrop = doc.append(popup, "div", &[("class", "popup__backdrop")]);
    let dialog = doc.append(popup, "div", &[("class", "popup__dialog")]);
    doc.append(dialog, "h2", &[("id", "popup-title")]);
    doc.append(dialog, "p", &[("id", "popup-desc")]);
    let ok = doc.append_text(dialog, "button", &[("class", "popup__ok"), ("data-close", "")], "OK");
    doc.focus(trigger);
    PopupPage {
        win: Window::new(doc, Location::parse("https://anafonell.de/").unwrap(), Storage::in_memory()),
        popup,
        ok,
        backdrop,
        dialog,
        trigger,
    }
}

fn error_notice() -> Notice {
    Notice {
        title: "Sorry".into(),
        message: "Something went wrong. Please try again.".into(),
        variant: Variant::Error,
    }
}

#[test]
fn popup_shows_notice_and_moves_focus() {
    let mut p = popup_page();
    let mut popup = Popup::mount(&p.win).unwrap();
    popup.open(&mut p.win, &error_notice());

    assert!(popup.is_open(&p.win));
    assert!(p.win.scroll_locked());
    let doc = &p.win.document;
    assert!(doc.has_class(p.popup, "popup--error"));
    assert!(!doc.has_class(p.popup, "popup--success"));
    assert_eq!(doc.text_content(doc.get_element_by_id("popup-title").unwrap()), "Sorry");
    assert_eq!(doc.active_element(), Some(p.ok));

    popup.handle(&mut p.win, &DomEvent::Click { target: p.dialog });
    assert!(popup.is_open(&p.win));

    popup.handle(
        &mut p.win,
        &DomEvent::KeyDown {
            key: Key::Escape,
            target: None,
        },
    );
    assert!(!popup.is_open(&p.win));
    assert!(!p.win.scroll_locked());
    assert_eq!(p.win.document.active_element(), Some(p.trigger));
}

#[test]
fn popup_closes_from_backdrop_and_close_controls() {
    let mut p = popup_page();
    let mut popup = Popup::mount(&p.win).unwrap();

    popup.open(&mut p.win, &error_notice());
    popup.handle(&mut p.win, &DomEvent::Click { target: p.backdrop });
    assert!(!popup.is_open(&p.win));

    let success = Notice {
        variant: Variant::Success,
        ..error_notice()
    };
    popup.open(&mut p.win, &success);
    assert!(p.win.document.has_class(p.popup, "popup--success"));
    assert!(!p.win.document.has_class(p.popup, "popup--error"));
    popup.handle(&mut p.win, &DomEvent::Click { target: p.ok });
    assert!(!popup.is_open(&p.win));
}

#[test]
fn submit_button_is_not_serialized() {
    let mut p = page();
    fill(&mut p);
    let form = ContactForm::mount(&p.win).unwrap();
    let data = form.serialize(&p.win.document);
    assert!(data.fields.iter().all(|(k, _)| k != "submit"));
    assert!(p.win.document.contains(p.form, p.submit));
}
