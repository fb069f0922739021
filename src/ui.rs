//! UI rendering helpers for the terminal preview.
//!
//! Everything shown is read back from the page model, so the preview shows
//! exactly what the widgets wrote into the document.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::dom::{Document, NodeId};
use crate::fetch::Fetch;
use crate::player::MediaElement;
use crate::runtime::EventLoopState;
use crate::site::Site;

const CONTROLS: [(&str, &str); 14] = [
    ("space/p", "play/pause"),
    ("n/b", "next/prev"),
    ("←/→", "seek"),
    ("↑/↓", "volume"),
    ("m", "mute"),
    ("[/]", "album page"),
    ("1-9", "album"),
    ("h/l", "press"),
    ("j/k", "scroll"),
    ("L", "language"),
    ("t", "menu"),
    ("c", "contact form"),
    ("g", "gallery"),
    ("q", "quit"),
];

fn controls_text(editing: bool) -> String {
    if editing {
        return "[tab] next field | [space] toggle consent | [enter] send | [esc] stop editing".to_string();
    }
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn find(doc: &Document, selector: &str) -> Option<NodeId> {
    doc.select(doc.document_element(), selector)
}

fn text_of(doc: &Document, selector: &str) -> String {
    find(doc, selector)
        .map(|n| doc.text_content(n).trim().to_string())
        .unwrap_or_default()
}

fn visible(doc: &Document, selector: &str) -> Option<NodeId> {
    find(doc, selector).filter(|&n| !doc.is_hidden(n))
}

/// Render the entire UI into `frame`.
pub fn draw<F: Fetch, M: MediaElement>(frame: &mut Frame, site: &Site<F, M>, state: &EventLoopState) {
    let doc = &site.window().document;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, doc, site.active_section(), chunks[0]);

    if site.player().is_some() {
        draw_home(frame, site, state, chunks[1]);
    } else if let Some(grid) = site.gallery().and(find(doc, ".gallery-grid")) {
        draw_gallery(frame, doc, grid, chunks[1]);
    } else {
        draw_privacy(frame, doc, chunks[1]);
    }

    let footer = Paragraph::new(controls_text(state.editing.is_some()))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    draw_overlays(frame, doc, chunks[1]);
}

fn draw_header(frame: &mut Frame, doc: &Document, section: Option<String>, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for link in doc.select_all(doc.document_element(), ".nav_link") {
        let label = format!(" {} ", doc.text_content(link).trim());
        if doc.attribute(link, "aria-current") == Some("page") {
            spans.push(Span::styled(label, Style::default().add_modifier(Modifier::REVERSED)));
        } else {
            spans.push(Span::raw(label));
        }
    }
    spans.push(Span::raw(format!("  [{}]", text_of(doc, ".lang-toggle"))));

    let title = match section {
        Some(section) => format!(" {} · #{section} ", text_of(doc, "title")),
        None => format!(" {} ", text_of(doc, "title")),
    };
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_home<F: Fetch, M: MediaElement>(frame: &mut Frame, site: &Site<F, M>, state: &EventLoopState, area: Rect) {
    let doc = &site.window().document;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    draw_player(frame, site, left[0]);
    draw_albums(frame, site, left[1]);
    draw_playlist(frame, doc, left[2]);
    draw_press(frame, site, right[0]);
    draw_contact(frame, doc, state, right[1]);
}

fn draw_player<F: Fetch, M: MediaElement>(frame: &mut Frame, site: &Site<F, M>, area: Rect) {
    let doc = &site.window().document;
    let Some(player) = site.player() else {
        return;
    };
    let playing = find(doc, ".btn--play").is_some_and(|b| doc.has_class(b, "is-playing"));
    let muted = find(doc, ".btn--mute").is_some_and(|b| doc.has_class(b, "is-muted"));
    let volume = (player.media().volume() * 100.0).round();

    let block = padded(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let mut lines = vec![
        Line::from(vec![
            Span::raw(if playing { "▶ " } else { "⏸ " }),
            Span::raw(text_of(doc, ".player__title")).bold(),
        ]),
        Line::from(text_of(doc, ".player__artist")),
    ];
    let credits = text_of(doc, ".player__credits");
    if !credits.is_empty() {
        lines.push(Line::from(credits).italic());
    }
    frame.render_widget(Paragraph::new(lines), rows[0]);

    let seek = find(doc, ".seek");
    let max = seek
        .and_then(|s| doc.attribute(s, "max"))
        .and_then(|m| m.parse::<f64>().ok())
        .filter(|m| *m > 0.0)
        .unwrap_or(100.0);
    let value = seek
        .and_then(|s| doc.value(s).parse::<f64>().ok())
        .unwrap_or(0.0);
    let label = format!(
        "{} / {}  vol {}{}{}",
        text_of(doc, ".time--current"),
        text_of(doc, ".time--total"),
        volume,
        if muted { " (muted)" } else { "" },
        if player.is_seeking() { " seeking" } else { "" }
    );
    let gauge = Gauge::default()
        .ratio((value / max).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, rows[1]);
}

fn draw_albums<F: Fetch, M: MediaElement>(frame: &mut Frame, site: &Site<F, M>, area: Rect) {
    let doc = &site.window().document;
    let Some(carousel) = site.albums() else {
        frame.render_widget(Paragraph::new("").block(padded(" albums ")), area);
        return;
    };
    let mut spans = Vec::new();
    let active = carousel.active_album();
    for card in doc.select_all(doc.document_element(), ".album-card") {
        let title = doc
            .select(card, ".album-card__title")
            .map(|t| doc.text_content(t))
            .unwrap_or_default();
        let label = format!(" {} ", title.trim());
        let index = doc
            .attribute(card, "data-album-index")
            .and_then(|i| i.parse::<usize>().ok());
        if index.is_some() && index == active {
            spans.push(Span::styled(label, Style::default().add_modifier(Modifier::REVERSED)));
        } else {
            spans.push(Span::raw(label));
        }
    }
    let title = format!(" albums {}/{} ", carousel.page() + 1, carousel.pages().max(1));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(padded(&title)), area);
}

fn draw_playlist(frame: &mut Frame, doc: &Document, area: Rect) {
    let Some(playlist) = find(doc, ".playlist") else {
        return;
    };
    let rows = doc.select_all(playlist, "button");
    let mut selected = None;
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            if doc.has_class(row, "is-active") {
                selected = Some(i);
            }
            let part = |sel: &str| {
                doc.select(row, sel)
                    .map(|n| doc.text_content(n).trim().to_string())
                    .unwrap_or_default()
            };
            ListItem::new(format!("{}  {}  {}", part(".main"), part(".dur"), part(".sub")))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_press<F: Fetch, M: MediaElement>(frame: &mut Frame, site: &Site<F, M>, area: Rect) {
    let doc = &site.window().document;
    let Some(press) = site.press() else {
        return;
    };
    let root = doc.document_element();
    let cards = doc.select_all(root, ".press-card");

    let body = if let Some(notice) = find(doc, ".press-unavailable") {
        doc.text_content(notice)
    } else {
        // The card nearest the scroll position is the one on screen.
        let scroll = find(doc, ".press-articles").map_or(0.0, |c| doc.element(c).scroll_left);
        cards
            .iter()
            .min_by(|&&a, &&b| {
                let da = (doc.element(a).offset_left - scroll).abs();
                let db = (doc.element(b).offset_left - scroll).abs();
                da.total_cmp(&db)
            })
            .map(|&card| {
                let part = |sel: &str| {
                    doc.select(card, sel)
                        .map(|n| doc.text_content(n))
                        .unwrap_or_default()
                };
                format!("{}\n{}\n\n{}", part("h3"), part(".press-meta"), part(".press-text"))
            })
            .unwrap_or_default()
    };
    let title = format!(" press {}/{} ", press.active_page() + 1, press.pages().max(1));
    let paragraph = Paragraph::new(body)
        .block(padded(&title))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_contact(frame: &mut Frame, doc: &Document, state: &EventLoopState, area: Rect) {
    let Some(form) = find(doc, "#contactForm") else {
        return;
    };
    let mut lines = Vec::new();
    for id in ["name", "email", "message", "consent"] {
        let Some(field) = doc.select(form, &format!("#{id}")) else {
            continue;
        };
        let label = doc
            .select(form, &format!("label[for=\"{id}\"]"))
            .map(|l| doc.text_content(l).trim().to_string())
            .unwrap_or_else(|| id.to_string());
        let value = if id == "consent" {
            (if doc.is_checked(field) { "[x]" } else { "[ ]" }).to_string()
        } else {
            let v = doc.value(field);
            if v.is_empty() {
                doc.attribute(field, "placeholder").unwrap_or_default().to_string()
            } else {
                v.to_string()
            }
        };
        let mut line = vec![Span::raw(format!("{label}: ")), Span::raw(value)];
        if state.editing == Some(field) {
            line.push(Span::raw("▏").slow_blink());
        }
        if let Some(msg) = doc
            .parent(field)
            .and_then(|p| doc.select(p, ".error-msg"))
            .map(|m| doc.text_content(m))
            .filter(|m| !m.is_empty())
        {
            line.push(Span::raw(format!("  ! {msg}")).italic());
        }
        lines.push(Line::from(line));
    }
    let paragraph = Paragraph::new(lines)
        .block(padded(" contact "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_gallery(frame: &mut Frame, doc: &Document, grid: NodeId, area: Rect) {
    let items: Vec<ListItem> = doc
        .select_all(grid, "img")
        .into_iter()
        .map(|img| {
            let alt = doc.attribute(img, "alt").unwrap_or_default();
            let src = doc.attribute(img, "src").unwrap_or_default();
            ListItem::new(format!("{alt}  ({src})"))
        })
        .collect();
    let focused = doc.active_element();
    let selected = doc
        .select_all(grid, ".gallery-item")
        .iter()
        .position(|&item| Some(item) == focused);
    let list = List::new(items)
        .block(padded(" gallery "))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_privacy(frame: &mut Frame, doc: &Document, area: Rect) {
    let lines: Vec<Line> = doc
        .select_all(doc.document_element(), "[data-i18n]")
        .into_iter()
        .filter(|&n| {
            doc.attribute(n, "data-i18n")
                .is_some_and(|k| k.starts_with("privacy."))
        })
        .flat_map(|n| {
            let text = doc.text_content(n);
            let line = if doc.element(n).tag == "h1" || doc.element(n).tag == "h2" {
                Line::from(text).bold()
            } else {
                Line::from(text)
            };
            [line, Line::from("")]
        })
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(padded(" privacy "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_overlays(frame: &mut Frame, doc: &Document, area: Rect) {
    if let Some(drawer) = visible(doc, "#drawer") {
        let items: Vec<ListItem> = doc
            .select_all(drawer, ".drawer__link")
            .into_iter()
            .map(|l| ListItem::new(doc.text_content(l)))
            .collect();
        let rect = Rect {
            width: area.width.min(24),
            ..area
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(List::new(items).block(padded(" menu (t closes) ")), rect);
    }

    if let Some(lightbox) = visible(doc, "#lightbox") {
        let (src, alt) = doc
            .select(lightbox, "img")
            .map(|img| {
                (
                    doc.attribute(img, "src").unwrap_or_default(),
                    doc.attribute(img, "alt").unwrap_or_default(),
                )
            })
            .unwrap_or_default();
        let rect = centered_rect_sized(60, 7, area);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(format!("{alt}\n\n{src}"))
                .alignment(Alignment::Center)
                .block(padded(" image (esc closes) ")),
            rect,
        );
    }

    if let Some(popup) = visible(doc, "#popup") {
        let title = text_of(doc, "#popup-title");
        let desc = text_of(doc, "#popup-desc");
        let error = doc.has_class(popup, "popup--error");
        let rect = centered_rect_sized(56, 7, area);
        frame.render_widget(Clear, rect);
        let body = Paragraph::new(vec![Line::from(title).bold(), Line::from(""), Line::from(desc)])
            .alignment(Alignment::Center)
            .block(padded(if error { " error (enter) " } else { " ok (enter) " }))
            .wrap(Wrap { trim: true });
        frame.render_widget(body, rect);
    }
}
