//! Filter configuration
//!
//! All fields have defaults, so a JSON config file only needs the keys it overrides:
//!
//! ```json
//! { "block_list_title": "NG", "videos_per_user": 20, "match_mode": "substring" }
//! ```

use crate::dom::MatchMode;
use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BLOCK_LIST_TITLE: &str = "BlockUsers";
pub const DEFAULT_VIDEOS_PER_USER: u32 = 50;
pub const DEFAULT_MYLIST_PAGE_SIZE: u32 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_TIMEOUT_MS: u64 = 60 * 60 * 1000;
pub const DEFAULT_API_BASE_URL: &str = "https://nvapi.nicovideo.jp";
pub const DEFAULT_FRONTEND_ID: &str = "1";

/// Session storage keys for the two cached lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKeys {
    #[serde(default = "default_block_users_key")]
    pub block_users: String,

    #[serde(default = "default_suppressed_videos_key")]
    pub suppressed_videos: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            block_users: default_block_users_key(),
            suppressed_videos: default_suppressed_videos_key(),
        }
    }
}

fn default_block_users_key() -> String {
    "nvcf_block_user_list".to_string()
}

fn default_suppressed_videos_key() -> String {
    "nvcf_remove_video_list".to_string()
}

/// Options controlling resolution and polling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Name of the mylist whose video owners form the block-list
    #[serde(default = "default_block_list_title")]
    pub block_list_title: String,

    /// Newest videos fetched per blocked user
    #[serde(default = "default_videos_per_user")]
    pub videos_per_user: u32,

    /// Items read from the block-list mylist (single page, no pagination)
    #[serde(default = "default_mylist_page_size")]
    pub mylist_page_size: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Total polling duration before the filter stops
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub match_mode: MatchMode,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Value of the `X-Frontend-Id` request header
    #[serde(default = "default_frontend_id")]
    pub frontend_id: String,

    #[serde(default)]
    pub cache_keys: CacheKeys,
}

fn default_block_list_title() -> String {
    DEFAULT_BLOCK_LIST_TITLE.to_string()
}

fn default_videos_per_user() -> u32 {
    DEFAULT_VIDEOS_PER_USER
}

fn default_mylist_page_size() -> u32 {
    DEFAULT_MYLIST_PAGE_SIZE
}

/// Whole milliseconds, saturating at `u64::MAX`
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_frontend_id() -> String {
    DEFAULT_FRONTEND_ID.to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            block_list_title: default_block_list_title(),
            videos_per_user: DEFAULT_VIDEOS_PER_USER,
            mylist_page_size: DEFAULT_MYLIST_PAGE_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            match_mode: MatchMode::default(),
            api_base_url: default_api_base_url(),
            frontend_id: default_frontend_id(),
            cache_keys: CacheKeys::default(),
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; absent keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn block_list_title(mut self, title: impl Into<String>) -> Self {
        self.block_list_title = title.into();
        self
    }

    pub fn videos_per_user(mut self, limit: u32) -> Self {
        self.videos_per_user = limit;
        self
    }

    /// Sub-millisecond precision is dropped, so an interval under 1ms fails validation
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_to_millis(interval);
        self
    }

    /// Sub-millisecond precision is dropped, as for [`poll_interval`](Self::poll_interval)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_millis(timeout);
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject values that would make the pipeline or the poller misbehave
    pub fn validate(&self) -> Result<()> {
        if self.block_list_title.is_empty() {
            return Err(FilterError::InvalidConfig("block_list_title must not be empty".to_string()));
        }
        if self.videos_per_user == 0 {
            return Err(FilterError::InvalidConfig("videos_per_user must be at least 1".to_string()));
        }
        if self.mylist_page_size == 0 {
            return Err(FilterError::InvalidConfig("mylist_page_size must be at least 1".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(FilterError::InvalidConfig("poll_interval_ms must be positive".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(FilterError::InvalidConfig("timeout_ms must be positive".to_string()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(FilterError::InvalidConfig("api_base_url must not be empty".to_string()));
        }

        let keys = &self.cache_keys;
        if keys.block_users.is_empty() || keys.suppressed_videos.is_empty() {
            return Err(FilterError::InvalidConfig("cache keys must not be empty".to_string()));
        }
        if keys.block_users == keys.suppressed_videos {
            return Err(FilterError::InvalidConfig("cache keys must be distinct".to_string()));
        }

        Ok(())
    }
}
