use super::ApiTransport;
use crate::browser::evaluate_in_tab;
use crate::error::{FilterError, Result};
use async_trait::async_trait;
use headless_chrome::Tab;
use serde::Deserialize;
use std::sync::Arc;

/// Issues API requests with `fetch` from inside the page
///
/// Running in the page's origin means the browser attaches the logged-in session cookie
/// (`credentials: "include"`) exactly as it would for the site's own scripts.
pub struct TabFetchTransport {
    tab: Arc<Tab>,
    frontend_id: String,
}

/// What the fetch script reports back; the body is left unparsed
#[derive(Debug, Deserialize)]
struct FetchOutcome {
    ok: bool,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TabFetchTransport {
    pub fn new(tab: Arc<Tab>, frontend_id: impl Into<String>) -> Self {
        Self { tab, frontend_id: frontend_id.into() }
    }
}

pub(crate) fn fetch_script(url: &str, frontend_id: &str) -> Result<String> {
    Ok(format!(
        r#"(async (url, frontendId) => {{
    try {{
        const response = await fetch(url, {{
            method: "GET",
            mode: "cors",
            credentials: "include",
            headers: {{
                "Content-Type": "application/json;charset=utf-8",
                "X-Frontend-Id": frontendId
            }}
        }});
        if (!response.ok) {{
            return JSON.stringify({{ ok: false, status: response.status }});
        }}
        return JSON.stringify({{ ok: true, status: response.status, body: await response.text() }});
    }} catch (error) {{
        return JSON.stringify({{ ok: false, status: 0, error: String(error) }});
    }}
}})({}, {})"#,
        serde_json::to_string(url)?,
        serde_json::to_string(frontend_id)?
    ))
}

fn interpret(url: &str, raw: &str) -> Result<serde_json::Value> {
    let outcome: FetchOutcome =
        serde_json::from_str(raw).map_err(|e| FilterError::TransportFault(format!("Unreadable fetch result: {}", e)))?;

    if let Some(error) = outcome.error {
        return Err(FilterError::TransportFault(format!("GET {} failed: {}", url, error)));
    }
    if !outcome.ok {
        return Err(FilterError::RemoteRequestFailed { url: url.to_string(), status: outcome.status });
    }

    let body = outcome.body.unwrap_or_default();
    serde_json::from_str(&body).map_err(|e| FilterError::TransportFault(format!("Malformed JSON from {}: {}", url, e)))
}

#[async_trait]
impl ApiTransport for TabFetchTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let script = fetch_script(url, &self.frontend_id)?;
        let value = evaluate_in_tab(self.tab.clone(), script, true)
            .await
            .map_err(|e| FilterError::TransportFault(e.to_string()))?;

        let raw = value
            .as_ref()
            .and_then(|v| v.as_str())
            .ok_or_else(|| FilterError::TransportFault(format!("No result from fetch of {}", url)))?;

        interpret(url, raw)
    }
}
