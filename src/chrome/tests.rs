use super::*;
use crate::config::{DrawerSettings, NavSettings};
use crate::dom::{Document, Location, NodeId, Storage, Window};
use crate::events::{DomEvent, Key};

fn window(doc: Document) -> Window {
    Window::new(
        doc,
        Location::parse("https://anafonell.de/").unwrap(),
        Storage::in_memory(),
    )
}

fn click(target: NodeId) -> DomEvent {
    DomEvent::Click { target }
}

fn escape() -> DomEvent {
    DomEvent::KeyDown {
        key: Key::Escape,
        target: None,
    }
}

struct NavPage {
    win: Window,
    nav_music: NodeId,
    drawer_music: NodeId,
    nav_home: NodeId,
}

fn nav_page() -> NavPage {
    let mut doc = Document::new();
    let body = doc.body();
    let nav = doc.append(body, "nav", &[]);
    let nav_home = doc.append_text(nav, "a", &[("class", "nav_link"), ("href", "#home")], "Home");
    let nav_music = doc.append_text(nav, "a", &[("class", "nav_link"), ("href", "#music")], "Music");
    doc.append_text(nav, "a", &[("class", "nav_link"), ("href", "#bio")], "Bio");
    let drawer = doc.append(body, "div", &[("id", "drawer")]);
    let drawer_music = doc.append_text(
        drawer,
        "a",
        &[("class", "drawer__link"), ("href", "#music")],
        "Music",
    );
    for (id, top) in [("home", 0.0), ("music", 800.0), ("bio", 1600.0)] {
        let section = doc.append(body, "section", &[("id", id)]);
        doc.set_offset_top(section, top);
    }
    NavPage {
        win: window(doc),
        nav_music,
        drawer_music,
        nav_home,
    }
}

#[test]
fn active_section_is_last_one_above_threshold() {
    let tops = [0.0, 800.0, 1600.0];
    assert_eq!(active_section_index(&tops, 100.0), 0);
    assert_eq!(active_section_index(&tops, 800.0), 1);
    assert_eq!(active_section_index(&tops, 5000.0), 2);
    assert_eq!(active_section_index(&[300.0, 900.0], 100.0), 0);
}

#[test]
fn nav_marks_first_section_on_mount() {
    let mut p = nav_page();
    let nav = NavHighlighter::mount(&mut p.win, NavSettings::default()).unwrap();
    let doc = &p.win.document;
    assert_eq!(doc.attribute(p.nav_home, "aria-current"), Some("page"));
    assert_eq!(nav.active_section(doc).as_deref(), Some("home"));
    assert_eq!(
        doc.style(doc.document_element(), "--nav-hover-color"),
        Some("var(--color-primary)")
    );
}

#[test]
fn scrolling_moves_highlight_and_accent() {
    let mut p = nav_page();
    let mut nav = NavHighlighter::mount(&mut p.win, NavSettings::default()).unwrap();

    // 700 + 800 / 4 = 900 is past the music section.
    p.win.viewport.height = 800.0;
    p.win.viewport.scroll_y = 700.0;
    nav.on_scroll(&mut p.win);
    let doc = &p.win.document;
    assert_eq!(doc.attribute(p.nav_music, "aria-current"), Some("page"));
    assert_eq!(doc.attribute(p.drawer_music, "aria-current"), Some("page"));
    assert!(!doc.has_attribute(p.nav_home, "aria-current"));

    p.win.viewport.scroll_y = 1500.0;
    nav.on_scroll(&mut p.win);
    let doc = &p.win.document;
    assert_eq!(nav.active_section(doc).as_deref(), Some("bio"));
    assert_eq!(
        doc.style(doc.document_element(), "--nav-hover-color"),
        Some("var(--color-primary-alt)")
    );
}

#[test]
fn unmapped_section_uses_default_accent() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.append(body, "section", &[("id", "gallery")]);
    doc.append(body, "a", &[("class", "nav_link"), ("href", "#gallery")]);
    let mut win = window(doc);
    NavHighlighter::mount(&mut win, NavSettings::default()).unwrap();
    let doc = &win.document;
    assert_eq!(
        doc.style(doc.document_element(), "--nav-hover-color"),
        Some("var(--color-primary)")
    );
}

#[test]
fn nav_without_sections_does_not_mount() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.append(body, "a", &[("class", "nav_link"), ("href", "#home")]);
    let mut win = window(doc);
    assert!(NavHighlighter::mount(&mut win, NavSettings::default()).is_none());
}

struct DrawerPage {
    win: Window,
    toggle: NodeId,
    panel: NodeId,
    link: NodeId,
    inner: NodeId,
}

fn drawer_page() -> DrawerPage {
    let mut doc = Document::new();
    let body = doc.body();
    let toggle = doc.append_text(
        body,
        "button",
        &[("id", "menuToggle"), ("aria-expanded", "false")],
        "☰",
    );
    let panel = doc.append(body, "div", &[("id", "drawer"), ("hidden", "")]);
    let list = doc.append(panel, "ul", &[]);
    let item = doc.append(list, "li", &[]);
    let link = doc.append(item, "a", &[("class", "drawer__link"), ("href", "#bio")]);
    let inner = doc.append_text(link, "span", &[], "Bio");
    DrawerPage {
        win: window(doc),
        toggle,
        panel,
        link,
        inner,
    }
}

#[test]
fn drawer_toggle_opens_and_closes() {
    let mut p = drawer_page();
    let mut drawer = Drawer::mount(&p.win, &DrawerSettings::default()).unwrap();

    drawer.handle(&mut p.win, &click(p.toggle));
    assert_eq!(drawer.state(), DrawerState::Open);
    let doc = &p.win.document;
    assert!(!doc.is_hidden(p.panel));
    assert_eq!(doc.attribute(p.toggle, "aria-expanded"), Some("true"));
    assert_eq!(doc.attribute(p.toggle, "aria-label"), Some("Close menu"));
    assert_eq!(doc.text_content(p.toggle), "×");
    assert!(p.win.scroll_locked());

    drawer.handle(&mut p.win, &click(p.toggle));
    assert_eq!(drawer.state(), DrawerState::Closed);
    let doc = &p.win.document;
    assert!(doc.is_hidden(p.panel));
    assert_eq!(doc.attribute(p.toggle, "aria-label"), Some("Open menu"));
    assert_eq!(doc.text_content(p.toggle), "☰");
    assert!(!p.win.scroll_locked());
}

#[test]
fn drawer_closes_on_scrim_link_and_escape_only() {
    let mut p = drawer_page();
    let mut drawer = Drawer::mount(&p.win, &DrawerSettings::default()).unwrap();

    drawer.open(&mut p.win);
    drawer.handle(&mut p.win, &click(p.panel));
    assert_eq!(drawer.state(), DrawerState::Closed);

    drawer.open(&mut p.win);
    drawer.handle(&mut p.win, &click(p.inner));
    assert_eq!(drawer.state(), DrawerState::Closed);

    drawer.open(&mut p.win);
    let list = p.win.document.parent(p.win.document.parent(p.link).unwrap()).unwrap();
    drawer.handle(&mut p.win, &click(list));
    assert_eq!(drawer.state(), DrawerState::Open);

    drawer.handle(&mut p.win, &escape());
    assert_eq!(drawer.state(), DrawerState::Closed);
}

#[test]
fn escape_on_closed_drawer_keeps_scroll_lock_of_others() {
    let mut p = drawer_page();
    let mut drawer = Drawer::mount(&p.win, &DrawerSettings::default()).unwrap();
    p.win.lock_scroll(true);
    drawer.handle(&mut p.win, &escape());
    p.win.viewport.width = 1200.0;
    drawer.handle(&mut p.win, &DomEvent::Resize);
    assert!(p.win.scroll_locked());
}

#[test]
fn widening_past_breakpoint_force_closes() {
    let mut p = drawer_page();
    let mut drawer = Drawer::mount(&p.win, &DrawerSettings::default()).unwrap();
    drawer.open(&mut p.win);

    p.win.viewport.width = 700.0;
    drawer.handle(&mut p.win, &DomEvent::Resize);
    assert_eq!(drawer.state(), DrawerState::Open);

    p.win.viewport.width = 701.0;
    drawer.handle(&mut p.win, &DomEvent::Resize);
    assert_eq!(drawer.state(), DrawerState::Closed);
    assert!(!p.win.scroll_locked());
}

struct MenuPage {
    win: Window,
    buttons: [NodeId; 2],
    menus: [NodeId; 2],
    containers: [NodeId; 2],
    es: NodeId,
    en_by_href: NodeId,
    de_by_text: NodeId,
    outside: NodeId,
}

fn menu_page() -> MenuPage {
    let mut doc = Document::new();
    let body = doc.body();
    let mut buttons = Vec::new();
    let mut menus = Vec::new();
    let mut containers = Vec::new();
    let mut items = Vec::new();
    for _ in 0..2 {
        let container = doc.append(body, "div", &[("class", "lang-switch")]);
        let button = doc.append_text(
            container,
            "button",
            &[("class", "lang-toggle"), ("aria-expanded", "false")],
            "DE",
        );
        let menu = doc.append(container, "ul", &[("class", "lang-menu"), ("hidden", "")]);
        let es = doc.append_text(menu, "a", &[("role", "menuitem"), ("lang", "ES")], "Español");
        let en = doc.append_text(
            menu,
            "a",
            &[("role", "menuitem"), ("href", "?lang=en")],
            "English",
        );
        let de = doc.append_text(menu, "a", &[("role", "menuitem")], " DE ");
        buttons.push(button);
        menus.push(menu);
        containers.push(container);
        items.push((es, en, de));
    }
    let outside = doc.append_text(body, "p", &[], "elsewhere");
    let (es, en_by_href, de_by_text) = items[0];
    MenuPage {
        win: window(doc),
        buttons: [buttons[0], buttons[1]],
        menus: [menus[0], menus[1]],
        containers: [containers[0], containers[1]],
        es,
        en_by_href,
        de_by_text,
        outside,
    }
}

#[test]
fn menus_label_buttons_with_initial_language() {
    let mut p = menu_page();
    LanguageMenus::mount(&mut p.win, "es").unwrap();
    for b in p.buttons {
        assert_eq!(p.win.document.text_content(b), "ES");
    }
}

#[test]
fn each_menu_keeps_its_own_open_state() {
    let mut p = menu_page();
    let mut menus = LanguageMenus::mount(&mut p.win, "de").unwrap();

    assert_eq!(menus.handle(&mut p.win, &click(p.buttons[0])), None);
    assert!(menus.is_open(0));
    assert!(!menus.is_open(1));
    let doc = &p.win.document;
    assert!(!doc.is_hidden(p.menus[0]));
    assert!(doc.has_class(p.containers[0], "is-open"));
    assert_eq!(doc.attribute(p.buttons[0], "aria-expanded"), Some("true"));

    // Opening the second one counts as an outside click for the first.
    menus.handle(&mut p.win, &click(p.buttons[1]));
    assert!(!menus.is_open(0));
    assert!(menus.is_open(1));

    menus.handle(&mut p.win, &click(p.outside));
    assert!(!menus.is_open(1));
    assert!(p.win.document.is_hidden(p.menus[1]));

    menus.handle(&mut p.win, &click(p.buttons[0]));
    menus.handle(&mut p.win, &escape());
    assert!(!menus.is_open(0));
}

#[test]
fn menu_item_language_comes_from_attr_then_href_then_text() {
    let mut p = menu_page();
    let mut menus = LanguageMenus::mount(&mut p.win, "de").unwrap();

    menus.handle(&mut p.win, &click(p.buttons[0]));
    assert_eq!(menus.handle(&mut p.win, &click(p.es)).as_deref(), Some("es"));
    assert!(!menus.is_open(0));

    assert_eq!(
        menus.handle(&mut p.win, &click(p.en_by_href)).as_deref(),
        Some("en")
    );
    assert_eq!(
        menus.handle(&mut p.win, &click(p.de_by_text)).as_deref(),
        Some("de")
    );
}

#[test]
fn drawer_language_links_track_current_language() {
    let mut doc = Document::new();
    let body = doc.body();
    let langs = doc.append(body, "div", &[("class", "drawer__langs")]);
    let de = doc.append_text(langs, "a", &[("data-lang", "de")], "DE");
    let en = doc.append_text(langs, "a", &[("data-lang", "en")], "EN");
    let mut win = window(doc);

    let mut links = DrawerLanguages::mount(&mut win, "de").unwrap();
    assert_eq!(win.document.attribute(de, "aria-current"), Some("page"));

    assert_eq!(links.handle(&mut win, &click(en)).as_deref(), Some("en"));
    assert_eq!(win.document.attribute(en, "aria-current"), Some("page"));
    assert!(!win.document.has_attribute(de, "aria-current"));

    links.set_active(&mut win.document, "de");
    assert_eq!(win.document.attribute(de, "aria-current"), Some("page"));
    let body = win.document.body();
    assert!(links.handle(&mut win, &click(body)).is_none());
}
