use crate::ids::VideoId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a link is tested against the suppression set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MatchMode {
    /// Parse the video ID out of `/watch/<id>` and compare for equality
    #[default]
    Exact,
    /// Any link containing the ID as a substring matches. `sm12345` also hides `/watch/sm123456`.
    Substring,
}

/// Extract the video ID from a watch link, e.g. `https://sp.nicovideo.jp/watch/sm9?ref=top` -> `sm9`
pub fn extract_video_id(href: &str) -> Option<&str> {
    for (pos, _) in href.match_indices("watch/") {
        if pos > 0 && !href[..pos].ends_with('/') {
            continue;
        }

        let rest = &href[pos + "watch/".len()..];
        let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());
        if end > 0 {
            return Some(&rest[..end]);
        }
    }

    None
}

/// Lookup structure for repeated link tests against one set of IDs
pub struct LinkMatcher<'a> {
    mode: MatchMode,
    ids: Vec<&'a str>,
    exact: HashSet<&'a str>,
}

impl<'a> LinkMatcher<'a> {
    pub fn new(ids: &'a [VideoId], mode: MatchMode) -> Self {
        // An empty ID would match every link in substring mode; CSS `[href*='']` matches nothing
        let ids: Vec<&str> = ids.iter().map(VideoId::as_str).filter(|id| !id.is_empty()).collect();
        let exact = ids.iter().copied().collect();
        Self { mode, ids, exact }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn matches(&self, href: &str) -> bool {
        match self.mode {
            MatchMode::Substring => self.ids.iter().any(|id| href.contains(id)),
            MatchMode::Exact => extract_video_id(href).is_some_and(|id| self.exact.contains(id)),
        }
    }
}

/// Test a single link against a set of IDs
pub fn link_matches(href: &str, ids: &[VideoId], mode: MatchMode) -> bool {
    LinkMatcher::new(ids, mode).matches(href)
}

/// Build the compound `[href*='id'],...` selector covering every ID
///
/// Returns `None` when no usable ID is given, since an empty selector is a syntax error
/// in `querySelectorAll`.
pub fn build_substring_selector(ids: &[VideoId]) -> Option<String> {
    let clauses: Vec<String> = ids
        .iter()
        .map(VideoId::as_str)
        .filter(|id| !id.is_empty())
        .map(|id| format!("[href*='{}']", escape_css_string(id)))
        .collect();

    if clauses.is_empty() { None } else { Some(clauses.join(",")) }
}

fn escape_css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(c),
        }
    }
    escaped
}
