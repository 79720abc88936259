use crate::dom::{Document, MatchMode};
use crate::error::Result;
use crate::ids::SuppressionSet;
use std::sync::Arc;

/// Hides the page's links to suppressed videos
pub struct DomSuppressor {
    document: Arc<dyn Document>,
    mode: MatchMode,
}

impl DomSuppressor {
    pub fn new(document: Arc<dyn Document>, mode: MatchMode) -> Self {
        Self { document, mode }
    }

    /// Hide every element linking to a video in `set`; returns how many matched
    ///
    /// Elements are only hidden, never removed. Elements rendered after this call are
    /// left alone until the next call.
    pub async fn suppress(&self, set: &SuppressionSet) -> Result<usize> {
        if set.is_empty() {
            return Ok(0);
        }

        let matched = self.document.hide_matching(set.as_slice(), self.mode).await?;
        log::debug!("Suppression matched {} elements", matched);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementNode, MemoryDocument};
    use crate::ids::VideoId;

    fn set(ids: &[&str]) -> SuppressionSet {
        ids.iter().map(|id| VideoId::from(*id)).collect()
    }

    fn page() -> Arc<MemoryDocument> {
        Arc::new(MemoryDocument::new(ElementNode::new("body").with_children(vec![
            ElementNode::link("/watch/sm1"),
            ElementNode::link("/watch/sm2"),
            ElementNode::link("/watch/sm12345"),
            ElementNode::link("/watch/sm123456"),
        ])))
    }

    #[tokio::test]
    async fn test_suppress_is_idempotent() {
        let doc = page();
        let suppressor = DomSuppressor::new(doc.clone(), MatchMode::Exact);

        suppressor.suppress(&set(&["sm1"])).await.unwrap();
        let once = doc.snapshot();
        suppressor.suppress(&set(&["sm1"])).await.unwrap();

        assert_eq!(doc.snapshot(), once);
        assert_eq!(doc.visible_links(), vec!["/watch/sm2", "/watch/sm12345", "/watch/sm123456"]);
    }

    #[tokio::test]
    async fn test_substring_mode_overmatches() {
        let doc = page();
        let suppressor = DomSuppressor::new(doc.clone(), MatchMode::Substring);

        let matched = suppressor.suppress(&set(&["sm12345"])).await.unwrap();

        assert_eq!(matched, 2);
        assert_eq!(doc.visible_links(), vec!["/watch/sm1", "/watch/sm2"]);
    }

    #[tokio::test]
    async fn test_exact_mode_matches_only_the_id() {
        let doc = page();
        let suppressor = DomSuppressor::new(doc.clone(), MatchMode::Exact);

        let matched = suppressor.suppress(&set(&["sm12345"])).await.unwrap();

        assert_eq!(matched, 1);
        assert!(doc.visible_links().contains(&"/watch/sm123456".to_string()));
    }

    #[tokio::test]
    async fn test_empty_set_hides_nothing() {
        let doc = page();
        let suppressor = DomSuppressor::new(doc.clone(), MatchMode::Substring);

        assert_eq!(suppressor.suppress(&SuppressionSet::new()).await.unwrap(), 0);
        assert_eq!(doc.hidden_count(), 0);
    }
}
