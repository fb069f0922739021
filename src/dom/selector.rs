//! A deliberately small CSS selector subset.
//!
//! Supported: compound selectors made of an optional tag followed by any mix
//! of `#id`, `.class`, `[attr]` and `[attr="value"]`, joined into groups with
//! commas. Combinators (descendant, child, sibling) are not supported; callers
//! scope their queries to a container instead.

use super::model::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    Attr(String),
    AttrEq(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.element(node).tag != *tag {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            Part::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Part::Class(class) => doc.has_class(node, class),
            Part::Attr(name) => doc.has_attribute(node, name),
            Part::AttrEq(name, value) => doc.attribute(node, name) == Some(value.as_str()),
        })
    }
}

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse `input`, returning `None` for empty or unsupported syntax.
    pub fn parse(input: &str) -> Option<Self> {
        let alternatives = input
            .split(',')
            .map(|group| parse_compound(group.trim()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    (start != *pos).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(group: &str) -> Option<Compound> {
    if group.is_empty() {
        return None;
    }
    let chars: Vec<char> = group.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars[0] == '*' {
        pos = 1;
    } else if is_ident_char(chars[0]) {
        compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.parts.push(Part::Id(take_ident(&chars, &mut pos)?));
            }
            '.' => {
                pos += 1;
                compound.parts.push(Part::Class(take_ident(&chars, &mut pos)?));
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos)?;
                match chars.get(pos) {
                    Some(']') => {
                        pos += 1;
                        compound.parts.push(Part::Attr(name));
                    }
                    Some('=') => {
                        pos += 1;
                        let close = chars[pos..].iter().position(|&c| c == ']')? + pos;
                        let raw: String = chars[pos..close].iter().collect();
                        let value = raw.trim().trim_matches(|c| c == '"' || c == '\'');
                        compound.parts.push(Part::AttrEq(name, value.to_string()));
                        pos = close + 1;
                    }
                    _ => return None,
                }
            }
            _ => return None,
        }
    }

    Some(compound)
}
