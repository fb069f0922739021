use crate::dom::{Document, Location, NodeId, Window};
use crate::events::{DomEvent, Key};

#[derive(Debug)]
struct LanguageMenu {
    container: NodeId,
    button: NodeId,
    menu: NodeId,
    open: bool,
}

impl LanguageMenu {
    fn set_open(&mut self, doc: &mut Document, open: bool) {
        doc.set_attribute(self.button, "aria-expanded", if open { "true" } else { "false" });
        doc.set_hidden(self.menu, !open);
        doc.toggle_class(self.container, "is-open", open);
        self.open = open;
    }
}

/// Every `.lang-switch` dropdown on the page, each with its own open state.
pub struct LanguageMenus {
    menus: Vec<LanguageMenu>,
}

impl LanguageMenus {
    /// Mount each `.lang-switch` that has a `.lang-toggle` and a `.lang-menu`,
    /// labelling its button with `initial_lang`.
    pub fn mount(win: &mut Window, initial_lang: &str) -> Option<Self> {
        let doc = &mut win.document;
        let root = doc.document_element();
        let mut menus = Vec::new();
        for container in doc.select_all(root, ".lang-switch") {
            let (Some(button), Some(menu)) = (
                doc.select(container, ".lang-toggle"),
                doc.select(container, ".lang-menu"),
            ) else {
                continue;
            };
            if !initial_lang.is_empty() {
                doc.set_text(button, &initial_lang.to_uppercase());
            }
            let open = doc.attribute(button, "aria-expanded") == Some("true");
            menus.push(LanguageMenu {
                container,
                button,
                menu,
                open,
            });
        }
        (!menus.is_empty()).then_some(Self { menus })
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.menus.get(index).is_some_and(|m| m.open)
    }

    /// React to clicks and Escape. Returns the language picked from a menu, if any.
    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) -> Option<String> {
        match *event {
            DomEvent::Click { target } => {
                let mut picked = None;
                for menu in &mut self.menus {
                    let doc = &mut win.document;
                    if doc.contains(menu.button, target) {
                        let open = !menu.open;
                        menu.set_open(doc, open);
                    } else if doc.contains(menu.menu, target) {
                        if let Some(item) = doc.closest(target, "a[role=\"menuitem\"]") {
                            picked = item_language(doc, &win.location, item);
                            menu.set_open(doc, false);
                        }
                    } else if !doc.contains(menu.container, target) {
                        menu.set_open(doc, false);
                    }
                }
                picked
            }
            DomEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                for menu in &mut self.menus {
                    menu.set_open(&mut win.document, false);
                }
                None
            }
            _ => None,
        }
    }
}

/// Language of a menu item: its `lang` attribute, the `lang` query parameter
/// of its `href`, or its text, lower-cased.
fn item_language(doc: &Document, location: &Location, item: NodeId) -> Option<String> {
    let from_attr = doc
        .attribute(item, "lang")
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    let from_href = || {
        doc.attribute(item, "href")
            .and_then(|href| location.resolve(href))
            .and_then(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "lang")
                    .map(|(_, v)| v.into_owned())
            })
            .filter(|l| !l.is_empty())
    };
    let from_text = || Some(doc.text_content(item).trim().to_string()).filter(|l| !l.is_empty());

    from_attr
        .or_else(from_href)
        .or_else(from_text)
        .map(|l| l.to_lowercase())
}

/// Inline language links in the drawer (`.drawer__langs [data-lang]`).
pub struct DrawerLanguages {
    container: NodeId,
}

impl DrawerLanguages {
    pub fn mount(win: &mut Window, initial_lang: &str) -> Option<Self> {
        let doc = &win.document;
        let container = doc.select(doc.document_element(), ".drawer__langs")?;
        let langs = Self { container };
        if !initial_lang.is_empty() {
            langs.set_active(&mut win.document, initial_lang);
        }
        Some(langs)
    }

    /// Mark the link for `lang` as current.
    pub fn set_active(&self, doc: &mut Document, lang: &str) {
        for link in doc.select_all(self.container, "[data-lang]") {
            if doc.attribute(link, "data-lang") == Some(lang) {
                doc.set_attribute(link, "aria-current", "page");
            } else {
                doc.remove_attribute(link, "aria-current");
            }
        }
    }

    /// Returns the language picked by a click on one of the links.
    pub fn handle(&mut self, win: &mut Window, event: &DomEvent) -> Option<String> {
        let DomEvent::Click { target } = *event else {
            return None;
        };
        let doc = &mut win.document;
        if !doc.contains(self.container, target) {
            return None;
        }
        let link = doc.closest(target, "[data-lang]")?;
        let lang = doc
            .attribute(link, "data-lang")
            .or_else(|| doc.attribute(link, "lang"))
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(link))
            .trim()
            .to_lowercase();
        if lang.is_empty() {
            return None;
        }
        self.set_active(doc, &lang);
        Some(lang)
    }
}
