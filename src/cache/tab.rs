use super::SessionStore;
use crate::browser::evaluate_in_tab;
use crate::error::{FilterError, Result};
use async_trait::async_trait;
use headless_chrome::Tab;
use std::sync::Arc;

/// `window.sessionStorage` of a Chrome tab
///
/// Entries share the tab's lifetime, so a reload of the page reuses the cached lists.
pub struct TabSessionStorage {
    tab: Arc<Tab>,
}

impl TabSessionStorage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }
}

#[async_trait]
impl SessionStore for TabSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let script = format!("window.sessionStorage.getItem({})", serde_json::to_string(key)?);
        let value = evaluate_in_tab(self.tab.clone(), script, false)
            .await
            .map_err(|e| FilterError::StorageFailed(e.to_string()))?;

        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let script = format!(
            "window.sessionStorage.setItem({}, {})",
            serde_json::to_string(key)?,
            serde_json::to_string(value)?
        );
        evaluate_in_tab(self.tab.clone(), script, false)
            .await
            .map_err(|e| FilterError::StorageFailed(e.to_string()))?;

        Ok(())
    }
}
