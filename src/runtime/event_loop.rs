use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::dom::NodeId;
use crate::events::{DomEvent, Key};
use crate::fetch::Fetch;
use crate::player::MediaElement;
use crate::runtime::page::{self, SECTION_HEIGHT};
use crate::site::Site;
use crate::ui;

/// Terminal cells are mapped onto CSS pixels with these factors.
pub const PX_PER_COLUMN: f64 = 8.0;
pub const PX_PER_ROW: f64 = 16.0;

const FORM_FIELDS: [&str; 4] = ["#name", "#email", "#message", "#consent"];

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Contact form control receiving typed characters, while editing the form.
    pub editing: Option<NodeId>,
}

/// Main terminal event loop: feeds input and media progress to the site and
/// redraws. Returns `Ok(())` when the user quits.
pub fn run<F: Fetch, M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    site: &mut Site<F, M>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        async_io::block_on(site.tick());

        // Freshly rendered press cards need geometry before they can be measured.
        let viewport = site.window().viewport;
        if page::layout(&mut site.window_mut().document, &viewport) {
            async_io::block_on(site.dispatch(DomEvent::Resize));
        }

        terminal.draw(|f| ui::draw(f, site, state))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, site, state) {
                    return Ok(());
                }
            }
            Event::Resize(columns, rows) => {
                let viewport = &mut site.window_mut().viewport;
                viewport.width = f64::from(columns) * PX_PER_COLUMN;
                viewport.height = f64::from(rows) * PX_PER_ROW;
                async_io::block_on(site.dispatch(DomEvent::Resize));
            }
            _ => {}
        }
    }
}

fn select<F: Fetch, M: MediaElement>(site: &Site<F, M>, selector: &str) -> Option<NodeId> {
    let doc = &site.window().document;
    doc.select(doc.document_element(), selector)
}

fn dispatch<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, event: DomEvent) {
    async_io::block_on(site.dispatch(event));
}

fn click<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, selector: &str) {
    match select(site, selector) {
        Some(target) => dispatch(site, DomEvent::Click { target }),
        None => debug!(selector, "nothing to click"),
    }
}

fn key_to_player<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, key: Key) {
    let target = select(site, ".player");
    dispatch(site, DomEvent::KeyDown { key, target });
}

fn scroll_by<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, dy: f64) {
    // Open overlays lock page scrolling.
    if site.window().scroll_locked() {
        return;
    }
    let viewport = &mut site.window_mut().viewport;
    viewport.scroll_y = (viewport.scroll_y + dy).max(0.0);
    dispatch(site, DomEvent::Scroll { target: None });
}

/// Click the language link after the current one.
fn cycle_language<F: Fetch, M: MediaElement>(site: &mut Site<F, M>) {
    let doc = &site.window().document;
    let links = doc.select_all(doc.document_element(), "[data-lang]");
    if links.is_empty() {
        return;
    }
    let current = site.translator().current().unwrap_or_default();
    let next = links
        .iter()
        .position(|&l| doc.attribute(l, "data-lang") == Some(current))
        .map_or(0, |i| (i + 1) % links.len());
    dispatch(site, DomEvent::Click { target: links[next] });
}

/// Step the press carousel by clicking its arrows or the neighbouring dot.
fn press_step<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, forward: bool) {
    let Some(press) = site.press() else {
        return;
    };
    let active = press.active_page();
    let arrow = if forward { ".press-next" } else { ".press-prev" };
    if select(site, arrow).is_some() {
        click(site, arrow);
        return;
    }
    let doc = &site.window().document;
    let dots = doc.select_all(doc.document_element(), ".press-dot");
    let target = if forward {
        active + 1
    } else {
        active.saturating_sub(1)
    };
    if let Some(&dot) = dots.get(target) {
        dispatch(site, DomEvent::Click { target: dot });
    }
}

fn popup_open<F: Fetch, M: MediaElement>(site: &Site<F, M>) -> bool {
    select(site, "#popup").is_some_and(|p| !site.window().document.is_hidden(p))
}

fn focus_field<F: Fetch, M: MediaElement>(site: &mut Site<F, M>, state: &mut EventLoopState, index: usize) {
    state.editing = select(site, FORM_FIELDS[index % FORM_FIELDS.len()]);
    if let Some(field) = state.editing {
        site.window_mut().document.focus(field);
    }
}

fn handle_form_key<F: Fetch, M: MediaElement>(
    key: KeyEvent,
    field: NodeId,
    site: &mut Site<F, M>,
    state: &mut EventLoopState,
) {
    let is_checkbox = site.window().document.attribute(field, "type") == Some("checkbox");
    match key.code {
        KeyCode::Esc => state.editing = None,
        KeyCode::Tab => {
            let current = FORM_FIELDS
                .iter()
                .position(|sel| select(site, sel) == Some(field))
                .unwrap_or(0);
            focus_field(site, state, current + 1);
        }
        KeyCode::Enter => {
            state.editing = None;
            if let Some(form) = site.contact().map(|c| c.form()) {
                dispatch(site, DomEvent::Submit { form });
            }
        }
        KeyCode::Char(' ') if is_checkbox => {
            let doc = &mut site.window_mut().document;
            let checked = !doc.is_checked(field);
            doc.set_checked(field, checked);
            dispatch(site, DomEvent::Change { target: field });
        }
        KeyCode::Backspace if !is_checkbox => {
            let doc = &mut site.window_mut().document;
            let mut value = doc.value(field).to_string();
            value.pop();
            doc.set_value(field, &value);
            dispatch(site, DomEvent::Input { target: field });
        }
        KeyCode::Char(c) if !is_checkbox && !c.is_control() => {
            let doc = &mut site.window_mut().document;
            let value = format!("{}{c}", doc.value(field));
            doc.set_value(field, &value);
            dispatch(site, DomEvent::Input { target: field });
        }
        _ => {}
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<F: Fetch, M: MediaElement>(
    key: KeyEvent,
    site: &mut Site<F, M>,
    state: &mut EventLoopState,
) -> bool {
    if let Some(field) = state.editing {
        handle_form_key(key, field, site, state);
        return false;
    }

    let focused = site.window().document.active_element();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => dispatch(
            site,
            DomEvent::KeyDown {
                key: Key::Escape,
                target: focused,
            },
        ),
        KeyCode::Enter if popup_open(site) => click(site, ".popup__ok"),
        KeyCode::Enter => dispatch(
            site,
            DomEvent::KeyDown {
                key: Key::Enter,
                target: focused,
            },
        ),
        KeyCode::Char(' ') | KeyCode::Char('p') => click(site, ".btn--play"),
        KeyCode::Char('n') => click(site, ".btn--next"),
        KeyCode::Char('b') => click(site, ".btn--prev"),
        KeyCode::Char('m') => click(site, ".btn--mute"),
        KeyCode::Left => key_to_player(site, Key::ArrowLeft),
        KeyCode::Right => key_to_player(site, Key::ArrowRight),
        KeyCode::Up | KeyCode::Char('+') => key_to_player(site, Key::ArrowUp),
        KeyCode::Down | KeyCode::Char('-') => key_to_player(site, Key::ArrowDown),
        KeyCode::Char('j') => scroll_by(site, SECTION_HEIGHT / 4.0),
        KeyCode::Char('k') => scroll_by(site, -SECTION_HEIGHT / 4.0),
        KeyCode::Char('[') => click(site, ".albums__prev"),
        KeyCode::Char(']') => click(site, ".albums__next"),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            click(site, &format!("[data-album-index=\"{index}\"]"));
        }
        KeyCode::Char('h') => press_step(site, false),
        KeyCode::Char('l') => press_step(site, true),
        KeyCode::Char('L') => cycle_language(site),
        KeyCode::Char('t') => click(site, "#menuToggle"),
        KeyCode::Char('c') if site.contact().is_some() => focus_field(site, state, 0),
        KeyCode::Char('g') => {
            if let Some(item) = select(site, ".gallery-item") {
                site.window_mut().document.focus(item);
                dispatch(site, DomEvent::Click { target: item });
            }
        }
        _ => {}
    }
    false
}
