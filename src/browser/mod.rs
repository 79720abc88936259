//! Chrome session management and in-tab script evaluation

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;

use crate::error::{FilterError, Result};
use headless_chrome::Tab;
use std::sync::Arc;

/// Evaluate `script` in `tab` without blocking the async runtime
///
/// `headless_chrome` is synchronous, so the call runs on the blocking pool and only the
/// calling task waits for it.
pub async fn evaluate_in_tab(tab: Arc<Tab>, script: String, await_promise: bool) -> Result<Option<serde_json::Value>> {
    let remote_object = tokio::task::spawn_blocking(move || tab.evaluate(&script, await_promise))
        .await
        .map_err(|e| FilterError::EvaluationFailed(format!("Evaluation task failed: {}", e)))?
        .map_err(|e| FilterError::EvaluationFailed(e.to_string()))?;

    Ok(remote_object.value)
}
