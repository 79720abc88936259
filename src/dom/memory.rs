use super::element::ElementNode;
use super::matcher::{LinkMatcher, MatchMode};
use super::Document;
use crate::error::Result;
use crate::ids::VideoId;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// Document held entirely in memory, rooted at a `body` element
#[derive(Debug)]
pub struct MemoryDocument {
    root: Mutex<ElementNode>,
}

impl MemoryDocument {
    pub fn new(root: ElementNode) -> Self {
        Self { root: Mutex::new(root) }
    }

    /// Parse an element tree from JSON (the serde form of [`ElementNode`])
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn lock(&self) -> MutexGuard<'_, ElementNode> {
        // A poisoned lock still holds a structurally valid tree
        self.root.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an element under the root, as a page rendering more content would
    pub fn append(&self, element: ElementNode) {
        self.lock().add_child(element);
    }

    pub fn snapshot(&self) -> ElementNode {
        self.lock().clone()
    }

    /// Hrefs of links that are currently displayed
    ///
    /// A link under a hidden ancestor counts as hidden.
    pub fn visible_links(&self) -> Vec<String> {
        fn collect(node: &ElementNode, out: &mut Vec<String>) {
            if node.is_hidden() {
                return;
            }
            if let Some(href) = node.href() {
                out.push(href.to_string());
            }
            for child in &node.children {
                collect(child, out);
            }
        }

        let mut links = Vec::new();
        collect(&self.lock(), &mut links);
        links
    }

    pub fn hidden_count(&self) -> usize {
        let root = self.lock();
        let mut count = 0;
        root.walk(&mut |node| {
            if node.is_hidden() {
                count += 1;
            }
        });
        count
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn hide_matching(&self, ids: &[VideoId], mode: MatchMode) -> Result<usize> {
        let matcher = LinkMatcher::new(ids, mode);
        if matcher.is_empty() {
            return Ok(0);
        }

        Ok(self.lock().hide_links_where(&|href: &str| matcher.matches(href)))
    }
}
