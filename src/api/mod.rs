//! Client for the platform's read API
//!
//! [`ApiTransport`] is the wire: a credentialed GET returning JSON. [`RemoteApiClient`]
//! builds the endpoint URLs and maps responses onto the typed schemas in [`types`].

pub mod tab_fetch;
pub mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use tab_fetch::TabFetchTransport;

use crate::error::{FilterError, Result};
use crate::ids::{MylistId, UserId, VideoId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use types::{Envelope, MylistData, MylistItem, MylistSummary, MylistsData, UserVideosData};

/// Credentialed GET returning a JSON document
///
/// Implementations fail with [`FilterError::RemoteRequestFailed`] on a non-success status
/// and [`FilterError::TransportFault`] on network or parse failures.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value>;
}

pub fn user_videos_url(base_url: &str, user: &UserId, limit: u32) -> String {
    format!(
        "{}/v3/users/{}/videos?sortKey=registeredAt&sortOrder=desc&pageSize={}&page=1",
        base_url.trim_end_matches('/'),
        urlencoding::encode(user.as_str()),
        limit
    )
}

pub fn mylists_url(base_url: &str) -> String {
    format!("{}/v1/users/me/mylists", base_url.trim_end_matches('/'))
}

pub fn mylist_url(base_url: &str, mylist: &MylistId, page_size: u32) -> String {
    format!(
        "{}/v1/users/me/mylists/{}?sortKey=addedAt&sortOrder=asc&pageSize={}&page=1",
        base_url.trim_end_matches('/'),
        urlencoding::encode(mylist.as_str()),
        page_size
    )
}

/// Typed access to the three endpoints the filter reads
#[derive(Clone)]
pub struct RemoteApiClient {
    transport: Arc<dyn ApiTransport>,
    base_url: String,
}

impl RemoteApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>, base_url: impl Into<String>) -> Self {
        Self { transport, base_url: base_url.into() }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {}", url);
        let value = self.transport.get_json(url).await?;
        let envelope: Envelope<T> = serde_json::from_value(value)
            .map_err(|e| FilterError::TransportFault(format!("Unexpected response from {}: {}", url, e)))?;
        Ok(envelope.data)
    }

    /// The logged-in user's mylists
    pub async fn list_mylists(&self) -> Result<Vec<MylistSummary>> {
        let data: MylistsData = self.get(&mylists_url(&self.base_url)).await?;
        Ok(data.mylists)
    }

    /// First page of a mylist's items, oldest addition first
    pub async fn mylist_items(&self, mylist: &MylistId, page_size: u32) -> Result<Vec<MylistItem>> {
        let data: MylistData = self.get(&mylist_url(&self.base_url, mylist, page_size)).await?;
        Ok(data.mylist.items)
    }

    /// A user's newest `limit` videos, newest first
    pub async fn user_videos(&self, user: &UserId, limit: u32) -> Result<Vec<VideoId>> {
        let data: UserVideosData = self.get(&user_videos_url(&self.base_url, user, limit)).await?;
        Ok(data.items.into_iter().map(|item| item.essential.id).collect())
    }
}
