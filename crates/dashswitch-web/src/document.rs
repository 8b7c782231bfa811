#![forbid(unsafe_code)]

//! In-memory document used by [`SimHost`](crate::SimHost).
//!
//! Elements live in an arena indexed by [`ElementId`]. Removed elements stay
//! in the arena but are detached and no longer matched by lookups.
//!
//! # Selectors
//!
//! [`HostDocument::query_all`] understands a small subset of CSS:
//! `tag`, `#id`, `.class`, `[attr]`, `[attr=value]`, compounds of those
//! (`li.active[data-x]`), and the descendant combinator (`.grid li`).
//! Anything else matches nothing.

use std::collections::BTreeMap;

use dashswitch_backend::{ElementId, HostDocument};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    visible: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            visible: true,
            parent,
            children: Vec::new(),
            attached: true,
        }
    }
}

/// Arena-backed document with a `body` root.
#[derive(Debug, Clone)]
pub struct SimDocument {
    nodes: Vec<Node>,
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body", None)],
        }
    }

    /// The `body` element.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        ElementId::from_raw(0)
    }

    /// Append a new `tag` element under `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag, Some(parent)));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Append a new element with an `id` attribute.
    pub fn append_with_id(&mut self, parent: ElementId, tag: &str, id: &str) -> ElementId {
        let element = self.append(parent, tag);
        self.set_attribute(element, "id", id);
        element
    }

    /// Set an attribute. `class` replaces the class list.
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_owned).collect();
        } else {
            node.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Whether the element is still part of the document.
    #[must_use]
    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|node| node.attached)
    }

    /// Children of `parent` that are currently shown.
    #[must_use]
    pub fn visible_children(&self, parent: ElementId) -> Vec<ElementId> {
        self.children(parent)
            .into_iter()
            .filter(|child| self.is_visible(*child))
            .collect()
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.as_raw() as usize)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.as_raw() as usize)
    }

    /// Attached elements in document (depth-first, pre-order) order.
    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(element) = stack.pop() {
            let Some(node) = self.node(element) else {
                continue;
            };
            if !node.attached {
                continue;
            }
            order.push(element);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    fn matches_compound(&self, element: ElementId, compound: &Compound) -> bool {
        let Some(node) = self.node(element) else {
            return false;
        };
        compound.parts.iter().all(|part| match part {
            Simple::Tag(tag) => node.tag == *tag,
            Simple::Id(id) => node.attributes.get("id") == Some(id),
            Simple::Class(class) => node.classes.iter().any(|c| c == class),
            Simple::Attr(name, None) => {
                if name == "class" {
                    !node.classes.is_empty()
                } else {
                    node.attributes.contains_key(name)
                }
            }
            Simple::Attr(name, Some(value)) => node.attributes.get(name) == Some(value),
        })
    }

    fn matches_selector(&self, element: ElementId, selector: &[Compound]) -> bool {
        let Some((last, ancestors)) = selector.split_last() else {
            return false;
        };
        if !self.matches_compound(element, last) {
            return false;
        }
        let mut cursor = self.node(element).and_then(|node| node.parent);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(ancestor) = cursor else {
                    return false;
                };
                cursor = self.node(ancestor).and_then(|node| node.parent);
                if self.matches_compound(ancestor, compound) {
                    break;
                }
            }
        }
        true
    }
}

impl HostDocument for SimDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.document_order().into_iter().find(|element| {
            self.node(*element)
                .and_then(|node| node.attributes.get("id"))
                .is_some_and(|value| value == id)
        })
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(parsed) = parse_selector(selector) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(selector, "unsupported selector");
            return Vec::new();
        };
        self.document_order()
            .into_iter()
            .filter(|element| self.matches_selector(*element, &parsed))
            .collect()
    }

    fn children(&self, parent: ElementId) -> Vec<ElementId> {
        self.node(parent)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|child| self.is_attached(*child))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tag(&self, element: ElementId) -> Option<String> {
        self.node(element).map(|node| node.tag.clone())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.node(element)?;
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn text(&self, element: ElementId) -> String {
        self.node(element)
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_owned();
        }
    }

    fn set_visible(&mut self, element: ElementId, visible: bool) {
        if let Some(node) = self.node_mut(element) {
            node.visible = visible;
        }
    }

    fn is_visible(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|node| node.visible)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_owned());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn create_element(&mut self, parent: ElementId, tag: &str, id: Option<&str>) -> ElementId {
        match id {
            Some(id) => self.append_with_id(parent, tag, id),
            None => self.append(parent, tag),
        }
    }

    fn remove(&mut self, element: ElementId) {
        if element == self.root() {
            return;
        }
        let parent = self.node(element).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|child| *child != element);
        }
        let mut stack = vec![element];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node_mut(current) {
                node.attached = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Selector subset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    parts: Vec<Simple>,
}

fn parse_selector(selector: &str) -> Option<Vec<Compound>> {
    let compounds: Option<Vec<Compound>> = selector.split_whitespace().map(parse_compound).collect();
    compounds.filter(|list| !list.is_empty())
}

fn parse_compound(text: &str) -> Option<Compound> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        match first {
            '#' | '.' => {
                let (name, tail) = split_ident(&rest[1..]);
                if name.is_empty() {
                    return None;
                }
                parts.push(if first == '#' {
                    Simple::Id(name.to_owned())
                } else {
                    Simple::Class(name.to_owned())
                });
                rest = tail;
            }
            '[' => {
                let close = rest.find(']')?;
                let inner = &rest[1..close];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => Simple::Attr(
                        name.trim().to_owned(),
                        Some(value.trim().trim_matches(['"', '\'']).to_owned()),
                    ),
                    None => Simple::Attr(inner.trim().to_owned(), None),
                };
                if matches!(&attr, Simple::Attr(name, _) if name.is_empty()) {
                    return None;
                }
                parts.push(attr);
                rest = &rest[close + 1..];
            }
            c if is_ident_char(c) => {
                let (name, tail) = split_ident(rest);
                parts.push(Simple::Tag(name.to_ascii_lowercase()));
                rest = tail;
            }
            _ => return None,
        }
    }
    (!parts.is_empty()).then_some(Compound { parts })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn split_ident(text: &str) -> (&str, &str) {
    let end = text
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(text.len(), |(index, _)| index);
    text.split_at(end)
}
