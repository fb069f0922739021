//! Markup of the site's pages as the preview renders them, plus the bits of
//! layout a browser would compute.

use std::path::Path;

use clap::ValueEnum;
use walkdir::WalkDir;

use crate::config::SiteSettings;
use crate::dom::{Document, NodeId, Viewport};

const SECTIONS: [(&str, &str, &str); 4] = [
    ("home", "nav.home", "Home"),
    ("music", "nav.music", "Music"),
    ("bio", "nav.bio", "Bio"),
    ("contact", "nav.contact", "Contact"),
];

/// Height of one page section; sections are stacked in document order.
pub const SECTION_HEIGHT: f64 = 800.0;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum PageKind {
    #[default]
    Home,
    Gallery,
    Privacy,
}

pub fn build(kind: PageKind, site: &SiteSettings) -> Document {
    let mut doc = Document::new();
    let root = doc.document_element();
    doc.set_attribute(root, "lang", &site.document_language);
    let head = doc.head();
    doc.append_text(head, "title", &[], &site.name);

    let body = doc.body();
    header(&mut doc, body, site);
    match kind {
        PageKind::Home => home(&mut doc, body, site),
        PageKind::Gallery => {
            let main = doc.append(body, "main", &[]);
            doc.append_text(main, "h1", &[("data-i18n", "gallery.title")], "Gallery");
            doc.append(main, "div", &[("class", "gallery-grid")]);
        }
        PageKind::Privacy => privacy(&mut doc, body),
    }
    let footer = doc.append(body, "footer", &[]);
    doc.append(footer, "span", &[("id", "year")]);
    doc
}

fn header(doc: &mut Document, body: NodeId, site: &SiteSettings) {
    let header = doc.append(body, "header", &[("class", "site-header")]);
    let nav = doc.append(header, "nav", &[("class", "nav")]);
    for (id, key, label) in SECTIONS {
        let href = format!("#{id}");
        doc.append_text(
            nav,
            "a",
            &[("class", "nav_link"), ("href", href.as_str()), ("data-i18n", key)],
            label,
        );
    }

    let switch = doc.append(header, "div", &[("class", "lang-switch")]);
    doc.append_text(
        switch,
        "button",
        &[("type", "button"), ("class", "lang-toggle"), ("aria-expanded", "false")],
        &site.document_language.to_uppercase(),
    );
    let menu = doc.append(switch, "ul", &[("class", "lang-menu"), ("role", "menu"), ("hidden", "")]);
    for lang in &site.languages {
        let item = doc.append(menu, "li", &[]);
        let href = format!("?lang={lang}");
        doc.append_text(
            item,
            "a",
            &[("role", "menuitem"), ("href", href.as_str()), ("lang", lang.as_str())],
            &lang.to_uppercase(),
        );
    }

    doc.append_text(
        header,
        "button",
        &[
            ("type", "button"),
            ("id", "menuToggle"),
            ("aria-expanded", "false"),
            ("aria-label", "Open menu"),
        ],
        "☰",
    );
    let drawer = doc.append(header, "nav", &[("id", "drawer"), ("class", "drawer"), ("hidden", "")]);
    for (id, key, label) in SECTIONS {
        let href = format!("#{id}");
        doc.append_text(
            drawer,
            "a",
            &[("class", "drawer__link"), ("href", href.as_str()), ("data-i18n", key)],
            label,
        );
    }
    let langs = doc.append(drawer, "div", &[("class", "drawer__langs")]);
    for lang in &site.languages {
        let href = format!("?lang={lang}");
        doc.append_text(
            langs,
            "a",
            &[("data-lang", lang.as_str()), ("href", href.as_str())],
            &lang.to_uppercase(),
        );
    }
}

fn home(doc: &mut Document, body: NodeId, site: &SiteSettings) {
    let main = doc.append(body, "main", &[]);
    let mut sections = Vec::with_capacity(SECTIONS.len());
    for (i, (id, _, _)) in SECTIONS.iter().enumerate() {
        let section = doc.append(main, "section", &[("id", *id)]);
        doc.set_offset_top(section, i as f64 * SECTION_HEIGHT);
        sections.push(section);
    }
    let [hero, music, bio, contact] = sections[..] else {
        return;
    };

    doc.append_text(hero, "h1", &[("data-i18n", "hero.title")], &site.name);

    let albums = doc.append(music, "div", &[("class", "albums")]);
    doc.append_text(albums, "button", &[("type", "button"), ("class", "albums__prev")], "‹");
    doc.append(albums, "div", &[("class", "albums__track")]);
    doc.append_text(albums, "button", &[("type", "button"), ("class", "albums__next")], "›");

    let player = doc.append(music, "div", &[("class", "player")]);
    doc.append(player, "img", &[("class", "player__cover"), ("alt", "")]);
    doc.append(player, "h3", &[("class", "player__title")]);
    doc.append(player, "p", &[("class", "player__artist")]);
    doc.append(player, "p", &[("class", "player__credits")]);
    for (class, label, icon) in [
        ("btn--prev", "Previous", "⏮"),
        ("btn--play", "Play", "▶"),
        ("btn--next", "Next", "⏭"),
        ("btn--mute", "Mute", "🔊"),
    ] {
        let class = format!("btn {class}");
        doc.append_text(
            player,
            "button",
            &[("type", "button"), ("class", class.as_str()), ("aria-label", label)],
            icon,
        );
    }
    doc.append_text(player, "span", &[("class", "time--current")], "0:00");
    doc.append(
        player,
        "input",
        &[("type", "range"), ("class", "seek"), ("min", "0"), ("max", "100"), ("value", "0")],
    );
    doc.append_text(player, "span", &[("class", "time--total")], "0:00");
    let volume = doc.append(
        player,
        "input",
        &[("type", "range"), ("class", "volume"), ("min", "0"), ("max", "1"), ("step", "0.01")],
    );
    doc.set_value(volume, "1");
    doc.append(music, "audio", &[("id", "audio"), ("preload", "metadata")]);
    doc.append(music, "ul", &[("class", "playlist")]);

    doc.append_text(bio, "h2", &[("data-i18n", "press.title")], "Press");
    doc.append(bio, "div", &[("class", "press-articles")]);
    doc.append(bio, "div", &[("class", "press-pagination")]);

    contact_form(doc, contact, site);
    popup(doc, body);
}

fn contact_form(doc: &mut Document, section: NodeId, site: &SiteSettings) {
    let mut attrs = vec![("id", "contactForm"), ("method", "POST")];
    if !site.contact_action.is_empty() {
        attrs.push(("action", site.contact_action.as_str()));
    }
    let form = doc.append(section, "form", &attrs);
    for (id, key, tag) in [
        ("name", "form.name", "input"),
        ("email", "form.email", "input"),
        ("message", "form.message", "textarea"),
    ] {
        let row = doc.append(form, "div", &[("class", "form-row")]);
        doc.append_text(row, "label", &[("for", id), ("data-i18n", key)], id);
        let placeholder = format!("{key}.ph");
        let control = doc.append(
            row,
            tag,
            &[("id", id), ("name", id), ("data-i18n-placeholder", placeholder.as_str())],
        );
        if id == "email" {
            doc.set_attribute(control, "type", "email");
        }
    }
    let row = doc.append(form, "div", &[("class", "form-row")]);
    doc.append(
        row,
        "input",
        &[("type", "checkbox"), ("id", "consent"), ("name", "consent")],
    );
    doc.append_text(row, "label", &[("for", "consent"), ("data-i18n", "form.consent")], "I agree to the privacy policy");
    doc.append_text(
        form,
        "button",
        &[("type", "submit"), ("data-i18n", "form.send")],
        "Send",
    );
}

fn popup(doc: &mut Document, body: NodeId) {
    let popup = doc.append(body, "div", &[("id", "popup"), ("class", "popup"), ("hidden", "")]);
    doc.append(popup, "div", &[("class", "popup__backdrop")]);
    let dialog = doc.append(
        popup,
        "div",
        &[("class", "popup__dialog"), ("role", "dialog"), ("aria-labelledby", "popup-title")],
    );
    doc.append(dialog, "h3", &[("id", "popup-title")]);
    doc.append(dialog, "p", &[("id", "popup-desc")]);
    doc.append_text(dialog, "button", &[("type", "button"), ("class", "popup__ok"), ("data-close", "")], "OK");
}

fn privacy(doc: &mut Document, body: NodeId) {
    let main = doc.append(body, "main", &[("class", "privacy")]);
    doc.append(main, "h1", &[("data-i18n", "privacy.title")]);
    doc.append(main, "p", &[("data-i18n", "privacy.intro")]);
    doc.append(main, "h2", &[("data-i18n", "privacy.data.title")]);
    doc.append(main, "p", &[("data-i18n", "privacy.data.text")]);
    doc.append(main, "h2", &[("data-i18n", "privacy.rights.title")]);
    doc.append(main, "p", &[("data-i18n", "privacy.rights.text")]);
    doc.append(main, "p", &[("data-i18n", "privacy.updated")]);
}

/// Gallery images under `root/dir` as `(src, alt)`, sorted by path.
pub fn scan_gallery(root: &Path, dir: &str) -> Vec<(String, String)> {
    let base = root.join(dir);
    let mut paths: Vec<_> = WalkDir::new(&base)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(root).ok()?;
            let src = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            let alt = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .replace(['-', '_'], " ");
            Some((src, alt))
        })
        .collect()
}

/// Lay press cards out side by side, each `0.85 * viewport.width` wide.
/// Returns whether any card moved.
pub fn layout(doc: &mut Document, viewport: &Viewport) -> bool {
    let card_width = (viewport.width * 0.85).round();
    let mut moved = false;
    for (i, card) in doc
        .select_all(doc.document_element(), ".press-card")
        .into_iter()
        .enumerate()
    {
        let left = i as f64 * card_width;
        if doc.element(card).offset_left != left {
            doc.set_offset_left(card, left);
            moved = true;
        }
    }
    moved
}
