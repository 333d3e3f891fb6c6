#![forbid(unsafe_code)]

//! Element tree used as a component's light-DOM content.

use std::collections::BTreeMap;

use crate::control::Control;

/// A node in an element tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Control(Control),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Control> for Node {
    fn from(control: Control) -> Self {
        Self::Control(control)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A non-control element: a tag, attributes, and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute names are case-insensitive.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Remove and return all children.
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// First descendant control whose tag is one of `tags`, in document
    /// (pre-order, depth-first) order. The element itself is not a candidate.
    #[must_use]
    pub fn query_control(&self, tags: &[&str]) -> Option<Control> {
        self.children.iter().find_map(|child| match child {
            Node::Control(control) => {
                let tag = control.tag();
                tags.iter()
                    .any(|t| t.eq_ignore_ascii_case(&tag))
                    .then(|| control.clone())
            }
            Node::Element(element) => element.query_control(tags),
            Node::Text(_) => None,
        })
    }

    /// All descendant controls in document order.
    #[must_use]
    pub fn controls(&self) -> Vec<Control> {
        let mut out = Vec::new();
        self.collect_controls(&mut out);
        out
    }

    fn collect_controls(&self, out: &mut Vec<Control>) {
        for child in &self.children {
            match child {
                Node::Control(control) => out.push(control.clone()),
                Node::Element(element) => element.collect_controls(out),
                Node::Text(_) => {}
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                Node::Control(_) => {}
            }
        }
    }
}
