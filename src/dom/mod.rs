//! Page-side matching and hiding
//!
//! This module provides:
//! - MatchMode and the link matching rules shared by every document
//! - Document: the seam the suppressor hides elements through
//! - TabDocument: a live Chrome tab
//! - MemoryDocument: an in-memory element tree built from ElementNode

pub mod element;
pub mod matcher;
pub mod memory;
pub mod tab;

pub use element::ElementNode;
pub use matcher::{LinkMatcher, MatchMode, build_substring_selector, extract_video_id, link_matches};
pub use memory::MemoryDocument;
pub use tab::TabDocument;

use crate::error::Result;
use crate::ids::VideoId;
use async_trait::async_trait;

/// A rendered page whose video links can be hidden
#[async_trait]
pub trait Document: Send + Sync {
    /// Hide every element whose href matches one of `ids`; returns the number matched
    ///
    /// Hiding is idempotent. Elements already hidden are matched again but stay hidden.
    async fn hide_matching(&self, ids: &[VideoId], mode: MatchMode) -> Result<usize>;
}
