use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// In-memory element used by [`MemoryDocument`](super::MemoryDocument)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "a")
    pub tag_name: String,

    /// Element attributes (e.g., href, class, style)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Anchor element pointing at `href`
    pub fn link(href: impl Into<String>) -> Self {
        Self::new("a").with_attribute("href", href)
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    pub fn href(&self) -> Option<&str> {
        self.get_attribute("href").map(String::as_str)
    }

    /// Whether the inline style turns display off
    pub fn is_hidden(&self) -> bool {
        self.attributes.get("style").is_some_and(|style| {
            style
                .split(';')
                .filter_map(|decl| decl.split_once(':'))
                .any(|(prop, value)| prop.trim() == "display" && value.trim() == "none")
        })
    }

    /// Set `display: none`, keeping any other inline declarations
    pub fn hide(&mut self) {
        if self.is_hidden() {
            return;
        }

        let style = match self.attributes.get("style").map(|s| s.trim().trim_end_matches(';')) {
            Some(existing) if !existing.is_empty() => format!("{};display:none", existing),
            _ => "display:none".to_string(),
        };
        self.attributes.insert("style".to_string(), style);
    }

    /// Hide this element and every descendant whose href satisfies `matches`; returns the match count
    pub fn hide_links_where(&mut self, matches: &impl Fn(&str) -> bool) -> usize {
        let mut count = 0;
        if self.href().is_some_and(matches) {
            self.hide();
            count += 1;
        }

        for child in &mut self.children {
            count += child.hide_links_where(matches);
        }

        count
    }

    /// Visit this element and all descendants in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ElementNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
