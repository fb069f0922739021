//! Arena-backed element tree: `Document`, `NodeId` and `Element`.
//!
//! Elements are never freed. Clearing a node's children detaches them, and
//! queries only walk nodes reachable from the root.

use std::collections::BTreeMap;

use super::selector::Selector;

/// Handle to an element inside a `Document`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    /// Live value of form controls (`input`, `textarea`, `select`).
    pub value: String,
    /// Live checked state of checkboxes and radios.
    pub checked: bool,
    /// Layout geometry supplied by the host renderer.
    pub offset_top: f64,
    pub offset_left: f64,
    pub scroll_left: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }
}

/// The page's element tree plus focus tracking.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    body: NodeId,
    head: NodeId,
    active: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty `<html><head/><body/></html>` document.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Element::new("html")],
            root: NodeId(0),
            body: NodeId(0),
            head: NodeId(0),
            active: None,
        };
        doc.head = doc.append(doc.root, "head", &[]);
        doc.body = doc.append(doc.root, "body", &[]);
        doc
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
    }

    /// Create an element with the given attributes and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    /// Like `append`, also setting the element's text.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let node = self.append(parent, tag, attrs);
        self.element_mut(node).text = text.to_string();
        node
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.element_mut(node).parent.take() {
            self.element_mut(parent).children.retain(|&c| c != node);
        }
    }

    /// Remove every child of `node` (the `innerHTML = ""` idiom).
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.element_mut(node).children);
        for child in children {
            self.element_mut(child).parent = None;
        }
        if self.active.is_some_and(|a| !self.is_connected(a)) {
            self.active = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.element(node).children
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Inclusive containment check, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    // ---- attributes -------------------------------------------------------

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).attrs.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.element(node).attrs.contains_key(name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.element_mut(node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.element_mut(node).attrs.remove(name);
    }

    /// Set or remove a boolean attribute such as `hidden` or `disabled`.
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attribute(node, name, "");
        } else {
            self.remove_attribute(node, name);
        }
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.has_attribute(node, "hidden")
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        self.toggle_attribute(node, "hidden", hidden);
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id")
    }

    // ---- classes ----------------------------------------------------------

    pub fn classes(&self, node: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let mut list: Vec<String> = self.classes(node).map(str::to_string).collect();
        list.push(class.to_string());
        self.set_attribute(node, "class", &list.join(" "));
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let list: Vec<String> = self
            .classes(node)
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        self.set_attribute(node, "class", &list.join(" "));
    }

    /// `classList.toggle(class, force)`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    // ---- text -------------------------------------------------------------

    /// Replace the element's content with plain text (the `textContent` setter).
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        self.element_mut(node).text = text.to_string();
    }

    /// Own text followed by the text of all descendants, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.element(node).text.clone();
        for &child in self.children(node) {
            out.push_str(&self.text_content(child));
        }
        out
    }

    // ---- inline style -----------------------------------------------------

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).style.get(property).map(String::as_str)
    }

    /// Set an inline style property; an empty value removes it.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let style = &mut self.element_mut(node).style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    // ---- form controls and geometry --------------------------------------

    pub fn value(&self, node: NodeId) -> &str {
        &self.element(node).value
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.element_mut(node).value = value.to_string();
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).checked
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.element_mut(node).checked = checked;
    }

    pub fn set_offset_top(&mut self, node: NodeId, top: f64) {
        self.element_mut(node).offset_top = top;
    }

    pub fn set_offset_left(&mut self, node: NodeId, left: f64) {
        self.element_mut(node).offset_left = left;
    }

    pub fn set_scroll_left(&mut self, node: NodeId, left: f64) {
        self.element_mut(node).scroll_left = left.max(0.0);
    }

    // ---- focus ------------------------------------------------------------

    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    pub fn focus(&mut self, node: NodeId) {
        if self.is_connected(node) {
            self.active = Some(node);
        }
    }

    // ---- queries ----------------------------------------------------------

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// Descendants of `scope` (excluding `scope`) in document order.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(self.children(node).iter().rev().copied());
            Some(node)
        })
    }

    /// `scope.querySelectorAll(selector)`; an unparsable selector matches nothing.
    pub fn select_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(sel) = Selector::parse(selector) else {
            tracing::debug!(selector, "ignoring unparsable selector");
            return Vec::new();
        };
        self.descendants(scope)
            .filter(|&n| sel.matches(self, n))
            .collect()
    }

    /// `scope.querySelector(selector)`.
    pub fn select(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let sel = Selector::parse(selector)?;
        self.descendants(scope).find(|&n| sel.matches(self, n))
    }

    /// `node.closest(selector)`: the node itself or its nearest matching ancestor.
    pub fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let sel = Selector::parse(selector)?;
        let mut cur = Some(node);
        while let Some(n) = cur {
            if sel.matches(self, n) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        Selector::parse(selector).is_some_and(|sel| sel.matches(self, node))
    }
}
