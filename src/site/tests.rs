use chrono::Datelike;

use super::*;
use crate::config::Settings;
use crate::dom::{Location, NodeId, Storage};
use crate::events::MediaEvent;
use crate::fetch::memory::MemoryFetcher;
use crate::player::fake::FakeMedia;
use crate::runtime::page::{self, PageKind};

const DE: &str = r#"{"nav.home":"Start","popup.success.title":"Danke","press.pageLabel":"Kritik"}"#;
const ES: &str = r#"{"nav.home":"Inicio"}"#;
const MUSIC: &str = r#"{"albums":[
    {"id":"ana","title":"Ana","year":2024,"tracks":[
        {"title":"Uno","artist":"Ana Fonell","src":"assets/audio/uno.mp3"},
        {"title":"Dos","artist":"Ana Fonell","src":"assets/audio/dos.mp3"}
    ]},
    {"id":"live","title":"Live","tracks":[
        {"title":"Tres","artist":"Ana Fonell","src":"assets/audio/tres.mp3"}
    ]}
]}"#;
const PRESS: &str = r#"{"reviews":[
    {"title":"Stark","publication":"Taz","year":2024,"text_1":"a","text_2":"b"},
    {"title":"Schön","publication":"FAZ","year":"2023","text_1":"c","text_2":"d"}
]}"#;

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_body("https://anafonell.de/js/lang/de.json", DE)
        .with_body("https://anafonell.de/js/lang/es.json", ES)
        .with_body("https://anafonell.de/data/music.json", MUSIC)
        .with_body("/data/press-de.json", PRESS)
        .with_body("/data/press-es.json", PRESS)
        .with_post_status(200)
}

fn site(kind: PageKind, href: &str) -> Site<MemoryFetcher, FakeMedia> {
    let settings = Settings::default();
    let doc = page::build(kind, &settings.site);
    let win = Window::new(doc, Location::parse(href).unwrap(), Storage::in_memory());
    Site::new(win, settings, fetcher(), FakeMedia::default())
}

fn started(kind: PageKind) -> Site<MemoryFetcher, FakeMedia> {
    let mut s = site(kind, "https://anafonell.de/");
    async_io::block_on(s.start());
    s
}

fn find(s: &Site<MemoryFetcher, FakeMedia>, sel: &str) -> NodeId {
    let doc = &s.window().document;
    doc.select(doc.document_element(), sel)
        .unwrap_or_else(|| panic!("no {sel}"))
}

fn click(s: &mut Site<MemoryFetcher, FakeMedia>, target: NodeId) {
    async_io::block_on(s.dispatch(DomEvent::Click { target }));
}

#[test]
fn start_applies_language_and_loads_data() {
    let s = started(PageKind::Home);
    let doc = &s.window().document;
    let root = doc.document_element();

    assert_eq!(s.translator().current(), Some("de"));
    assert_eq!(doc.text_content(find(&s, ".nav_link")), "Start");
    assert_eq!(s.window().location.query_param("lang").as_deref(), Some("de"));
    assert_eq!(doc.attribute(find(&s, "[data-lang=\"de\"]"), "aria-current"), Some("page"));

    let player = s.player().unwrap();
    assert_eq!(player.tracks().len(), 2);
    assert_eq!(player.media().src, "assets/audio/uno.mp3");
    assert_eq!(doc.select_all(find(&s, ".playlist"), "button").len(), 2);

    assert_eq!(s.albums().unwrap().active_album(), Some(0));
    assert_eq!(doc.select_all(root, ".album-card").len(), 2);

    assert_eq!(s.press().unwrap().language(), Some("de"));
    assert_eq!(doc.select_all(root, ".press-card").len(), 2);
    let dot = find(&s, ".press-dot");
    assert_eq!(doc.attribute(dot, "aria-label"), Some("Kritik 1"));

    let year = chrono::Local::now().year().to_string();
    assert_eq!(doc.text_content(find(&s, "#year")), year);
}

#[test]
fn language_in_url_is_not_rewritten() {
    let mut s = site(PageKind::Home, "https://anafonell.de/?lang=es&x=1");
    async_io::block_on(s.start());
    assert_eq!(s.translator().current(), Some("es"));
    assert_eq!(s.window().location.href(), "https://anafonell.de/?lang=es&x=1");
    assert_eq!(s.press().unwrap().language(), Some("es"));
}

#[test]
fn picking_an_album_replaces_the_playlist() {
    let mut s = started(PageKind::Home);
    let doc = &s.window().document;
    let second = doc.select(doc.document_element(), "[data-album-index=\"1\"]").unwrap();

    click(&mut s, second);
    let player = s.player().unwrap();
    assert_eq!(player.tracks().len(), 1);
    assert_eq!(player.current().map(|t| t.title.as_str()), Some("Tres"));
    assert_eq!(s.albums().unwrap().active_album(), Some(1));
}

#[test]
fn menu_pick_switches_language_everywhere() {
    let mut s = started(PageKind::Home);
    let target = find(&s, ".lang-toggle");
    click(&mut s, target);
    let target = find(&s, "a[lang=\"es\"]");
    click(&mut s, target);

    assert_eq!(s.translator().current(), Some("es"));
    let doc = &s.window().document;
    assert_eq!(doc.text_content(find(&s, ".nav_link")), "Inicio");
    assert_eq!(doc.text_content(find(&s, ".lang-toggle")), "ES");
    assert_eq!(doc.attribute(find(&s, "[data-lang=\"es\"]"), "aria-current"), Some("page"));
    assert_eq!(doc.attribute(find(&s, "[data-lang=\"de\"]"), "aria-current"), None);
    assert_eq!(s.press().unwrap().language(), Some("es"));
    assert_eq!(s.fetcher.request_count("/data/press-es.json"), 1);
    // The Spanish dictionary has no label override.
    assert_eq!(doc.attribute(find(&s, ".press-dot"), "aria-label"), Some("Reseña 1"));
}

#[test]
fn drawer_language_link_switches_language() {
    let mut s = started(PageKind::Home);
    let target = find(&s, "[data-lang=\"es\"]");
    click(&mut s, target);
    assert_eq!(s.translator().current(), Some("es"));
    assert_eq!(s.window().storage.get("lang"), Some("es"));
}

fn fill_form(s: &mut Site<MemoryFetcher, FakeMedia>, email: &str) {
    for (sel, value) in [("#name", "Lea"), ("#email", email), ("#message", "Hola!")] {
        let node = find(s, sel);
        s.window_mut().document.set_value(node, value);
    }
    let consent = find(s, "#consent");
    s.window_mut().document.set_checked(consent, true);
}

#[test]
fn valid_submission_posts_and_opens_translated_popup() {
    let mut s = started(PageKind::Home);
    fill_form(&mut s, "lea@example.org");
    let form = s.contact().unwrap().form();
    async_io::block_on(s.dispatch(DomEvent::Submit { form }));

    assert_eq!(s.fetcher.posts().len(), 1);
    let doc = &s.window().document;
    let popup = find(&s, "#popup");
    assert!(!doc.is_hidden(popup));
    assert_eq!(doc.text_content(find(&s, "#popup-title")), "Danke");
    assert_eq!(doc.value(find(&s, "#name")), "");

    let target = find(&s, ".popup__ok");
    click(&mut s, target);
    assert!(s.window().document.is_hidden(popup));
}

#[test]
fn invalid_submission_marks_fields_and_stays_quiet() {
    let mut s = started(PageKind::Home);
    fill_form(&mut s, "lea@example");
    let form = s.contact().unwrap().form();
    async_io::block_on(s.dispatch(DomEvent::Submit { form }));

    assert!(s.fetcher.posts().is_empty());
    let doc = &s.window().document;
    assert!(doc.is_hidden(find(&s, "#popup")));
    let email = find(&s, "#email");
    assert_eq!(doc.attribute(email, "aria-invalid"), Some("true"));

    s.window_mut().document.set_value(email, "lea@example.org");
    async_io::block_on(s.dispatch(DomEvent::Input { target: email }));
    assert_eq!(s.window().document.attribute(email, "aria-invalid"), None);
}

#[test]
fn media_events_are_forwarded_on_tick() {
    let mut s = started(PageKind::Home);
    if let Some(player) = s.player.as_mut() {
        player.media_mut().pending.push(MediaEvent::Ended);
    }
    async_io::block_on(s.tick());
    let player = s.player().unwrap();
    assert_eq!(player.index(), 1);
    assert_eq!(player.media().src, "assets/audio/dos.mp3");
    assert!(!player.media().paused);
}

#[test]
fn window_scroll_moves_the_nav_highlight() {
    let mut s = started(PageKind::Home);
    s.window_mut().viewport.scroll_y = page::SECTION_HEIGHT * 2.0;
    async_io::block_on(s.dispatch(DomEvent::Scroll { target: None }));
    let doc = &s.window().document;
    let bio = doc
        .select_all(doc.document_element(), ".nav_link")
        .into_iter()
        .find(|&l| doc.attribute(l, "href") == Some("#bio"))
        .unwrap();
    assert_eq!(doc.attribute(bio, "aria-current"), Some("page"));
    assert_eq!(s.active_section().as_deref(), Some("bio"));
}

#[test]
fn privacy_page_follows_language_changes() {
    let mut s = site(PageKind::Privacy, "https://anafonell.de/privacy.html");
    async_io::block_on(s.start());
    let doc = &s.window().document;
    // No privacy files are served: the built-in English text is used.
    assert_eq!(s.privacy.as_ref().unwrap().language(), Some("de"));
    assert!(!doc.text_content(find(&s, "[data-i18n=\"privacy.title\"]")).is_empty());
    assert_eq!(s.fetcher.request_count("data/privacy.de.json"), 1);

    let target = find(&s, "[data-lang=\"es\"]");
    click(&mut s, target);
    assert_eq!(s.privacy.as_ref().unwrap().language(), Some("es"));
    assert_eq!(s.fetcher.request_count("data/privacy.es.json"), 1);
}

#[test]
fn widgets_without_markup_are_skipped() {
    let s = started(PageKind::Gallery);
    assert!(s.player().is_none());
    assert!(s.albums().is_none());
    assert!(s.press().is_none());
    assert!(s.contact().is_none());
    assert!(s.gallery().is_some());
    // No player or carousel: the music data is never requested.
    assert_eq!(s.fetcher.request_count("https://anafonell.de/data/music.json"), 0);
}
