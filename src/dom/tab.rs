use super::Document;
use super::matcher::{MatchMode, build_substring_selector};
use crate::browser::evaluate_in_tab;
use crate::error::{FilterError, Result};
use crate::ids::VideoId;
use async_trait::async_trait;
use headless_chrome::Tab;
use std::sync::Arc;

const SUPPRESS_JS: &str = include_str!("suppress.js");

/// The live page of a Chrome tab
pub struct TabDocument {
    tab: Arc<Tab>,
}

impl TabDocument {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }
}

/// Build the script invocation that hides matches and evaluates to their count
pub(crate) fn suppression_script(ids: &[VideoId], mode: MatchMode) -> Result<Option<String>> {
    // Exact mode narrows the substring candidates, so both modes share one query
    let Some(query) = build_substring_selector(ids) else {
        return Ok(None);
    };

    Ok(Some(format!(
        "{}({}, {}, {})",
        SUPPRESS_JS.trim_end(),
        serde_json::to_string(&query)?,
        serde_json::to_string(ids)?,
        mode == MatchMode::Exact
    )))
}

#[async_trait]
impl Document for TabDocument {
    async fn hide_matching(&self, ids: &[VideoId], mode: MatchMode) -> Result<usize> {
        let Some(script) = suppression_script(ids, mode)? else {
            return Ok(0);
        };

        let value = evaluate_in_tab(self.tab.clone(), script, false)
            .await?
            .ok_or_else(|| FilterError::EvaluationFailed("No value returned from suppression script".to_string()))?;

        value
            .as_u64()
            .map(|count| count as usize)
            .ok_or_else(|| FilterError::EvaluationFailed(format!("Unexpected suppression result: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppression_script_arguments() {
        let ids = vec![VideoId::from("sm1"), VideoId::from("so2")];
        let script = suppression_script(&ids, MatchMode::Exact).unwrap().unwrap();

        assert!(script.starts_with("(function (query, ids, exact)"));
        assert!(script.ends_with(r#"("[href*='sm1'],[href*='so2']", ["sm1","so2"], true)"#));
    }

    #[test]
    fn test_suppression_script_substring_flag() {
        let script = suppression_script(&[VideoId::from("sm1")], MatchMode::Substring).unwrap().unwrap();
        assert!(script.ends_with("false)"));
    }

    #[test]
    fn test_no_script_for_empty_set() {
        assert!(suppression_script(&[], MatchMode::Exact).unwrap().is_none());
    }
}
