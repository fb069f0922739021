use super::*;

fn sample() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let nav = doc.append(body, "nav", &[("class", "nav")]);
    let home = doc.append_text(
        nav,
        "a",
        &[("class", "nav_link"), ("href", "#home")],
        "Home",
    );
    let music = doc.append_text(
        nav,
        "a",
        &[("class", "nav_link is-big"), ("href", "#music"), ("role", "menuitem")],
        "Music",
    );
    (doc, nav, home, music)
}

#[test]
fn select_all_matches_tag_class_and_attributes() {
    let (doc, nav, home, music) = sample();
    let body = doc.body();

    assert_eq!(doc.select_all(body, ".nav_link"), vec![home, music]);
    assert_eq!(doc.select_all(body, "a[role=\"menuitem\"]"), vec![music]);
    assert_eq!(doc.select_all(body, "a[href]"), vec![home, music]);
    assert_eq!(doc.select_all(body, "nav, .is-big"), vec![nav, music]);
    assert_eq!(doc.select(body, "a[href='#home']"), Some(home));
    assert!(doc.select_all(body, "section[id]").is_empty());
}

#[test]
fn unparsable_selector_matches_nothing() {
    let (doc, ..) = sample();
    assert!(doc.select_all(doc.body(), "nav > a").is_empty());
    assert!(doc.select(doc.body(), "").is_none());
}

#[test]
fn closest_and_contains_walk_ancestors() {
    let (doc, nav, home, _) = sample();
    assert_eq!(doc.closest(home, ".nav"), Some(nav));
    assert_eq!(doc.closest(home, "a"), Some(home));
    assert!(doc.contains(nav, home));
    assert!(!doc.contains(home, nav));
}

#[test]
fn class_list_helpers_keep_other_classes() {
    let (mut doc, _, _, music) = sample();
    doc.add_class(music, "is-active");
    assert!(doc.has_class(music, "is-active"));
    assert!(doc.has_class(music, "nav_link"));

    doc.toggle_class(music, "is-active", false);
    assert!(!doc.has_class(music, "is-active"));
    assert_eq!(doc.attribute(music, "class"), Some("nav_link is-big"));
}

#[test]
fn set_text_replaces_children_and_clears_stale_focus() {
    let (mut doc, nav, home, _) = sample();
    doc.focus(home);
    assert_eq!(doc.text_content(nav), "HomeMusic");

    doc.set_text(nav, "gone");
    assert_eq!(doc.text_content(nav), "gone");
    assert!(!doc.is_connected(home));
    assert_eq!(doc.active_element(), None);
    assert!(doc.select_all(doc.body(), ".nav_link").is_empty());
}

#[test]
fn location_replaces_query_param_in_place() {
    let mut loc = Location::parse("https://example.org/index.html?x=1&lang=de").unwrap();
    assert_eq!(loc.query_param("lang").as_deref(), Some("de"));

    loc.replace_query_param("lang", "es");
    assert_eq!(loc.query_param("lang").as_deref(), Some("es"));
    assert_eq!(loc.query_param("x").as_deref(), Some("1"));
    assert!(loc.has_query_param("lang"));
}

#[test]
fn storage_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.toml");

    let mut store = Storage::open(&path);
    assert_eq!(store.get("lang"), None);
    store.set("lang", "es");

    let reopened = Storage::open(&path);
    assert_eq!(reopened.get("lang"), Some("es"));
}

#[test]
fn window_scroll_lock_uses_root_overflow() {
    let loc = Location::parse("https://example.org/").unwrap();
    let mut win = Window::new(Document::new(), loc, Storage::in_memory());
    assert!(!win.scroll_locked());
    win.lock_scroll(true);
    assert!(win.scroll_locked());
    win.lock_scroll(false);
    assert!(!win.scroll_locked());
}
