use std::collections::HashMap;

use crate::config::NavSettings;
use crate::dom::{Document, NodeId, Window};

const ACCENT_PROPERTY: &str = "--nav-hover-color";

/// Marks the navigation link of the section under the reading line.
pub struct NavHighlighter {
    sections: Vec<NodeId>,
    links: Vec<NodeId>,
    links_by_section: HashMap<String, Vec<NodeId>>,
    settings: NavSettings,
}

impl NavHighlighter {
    /// Mount over `section[id]` elements and `.nav_link`/`.drawer__link` anchors.
    /// Returns `None` when the page has either none of the sections or none of the links.
    pub fn mount(win: &mut Window, settings: NavSettings) -> Option<Self> {
        let doc = &win.document;
        let root = doc.document_element();
        let sections = doc.select_all(root, "section[id]");
        let links = doc.select_all(root, ".nav_link, .drawer__link");
        if sections.is_empty() || links.is_empty() {
            return None;
        }

        let mut links_by_section: HashMap<String, Vec<NodeId>> = HashMap::new();
        for &link in &links {
            if let Some(id) = doc.attribute(link, "href").and_then(|h| h.strip_prefix('#')) {
                links_by_section.entry(id.to_string()).or_default().push(link);
            }
        }

        let mut nav = Self {
            sections,
            links,
            links_by_section,
            settings,
        };
        let first = nav.section_id(&win.document, 0);
        nav.set_active(&mut win.document, &first);
        Some(nav)
    }

    fn section_id(&self, doc: &Document, index: usize) -> String {
        doc.id_of(self.sections[index]).unwrap_or_default().to_string()
    }

    /// Recompute the active section from the window scroll position.
    pub fn on_scroll(&mut self, win: &mut Window) {
        let threshold = win.viewport.scroll_y + win.viewport.height * 0.25;
        let doc = &win.document;
        let tops: Vec<f64> = self
            .sections
            .iter()
            .map(|&s| doc.element(s).offset_top)
            .collect();
        let id = self.section_id(doc, active_section_index(&tops, threshold));
        self.set_active(&mut win.document, &id);
    }

    /// The id of the section whose links are currently marked.
    pub fn active_section(&self, doc: &Document) -> Option<String> {
        self.links_by_section
            .iter()
            .find(|(_, links)| {
                links
                    .iter()
                    .any(|&l| doc.attribute(l, "aria-current") == Some("page"))
            })
            .map(|(id, _)| id.clone())
    }

    fn set_active(&self, doc: &mut Document, id: &str) {
        if let Some(targets) = self.links_by_section.get(id) {
            let already = targets.iter().all(|&l| doc.has_attribute(l, "aria-current"));
            if !already {
                for &link in &self.links {
                    doc.remove_attribute(link, "aria-current");
                }
                for &link in targets {
                    doc.set_attribute(link, "aria-current", "page");
                }
            }
        }
        self.update_accent(doc, id);
    }

    fn update_accent(&self, doc: &mut Document, id: &str) {
        let accents = &self.settings.accents;
        let color = accents
            .get(id)
            .or_else(|| accents.get(&self.settings.default_section))
            .map(String::as_str)
            .unwrap_or_default();
        let root = doc.document_element();
        doc.set_style(root, ACCENT_PROPERTY, color);
    }
}

/// Index of the last section whose top is at or above `threshold`; 0 if none.
pub fn active_section_index(tops: &[f64], threshold: f64) -> usize {
    tops.iter().rposition(|&top| top <= threshold).unwrap_or(0)
}
