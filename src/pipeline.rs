use crate::api::RemoteApiClient;
use crate::cache::SessionCache;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::expander::VideoIdExpander;
use crate::ids::{BlockList, SuppressionSet};
use crate::resolver::BlockListResolver;

/// Resolves the suppression set: block-list mylist -> users -> their videos
///
/// Both stages are memoized in the session cache under their own keys.
pub struct SuppressionPipeline {
    resolver: BlockListResolver,
    expander: VideoIdExpander,
    cache: SessionCache,
    config: FilterConfig,
}

impl SuppressionPipeline {
    /// Fails if `config` does not pass [`FilterConfig::validate`]
    ///
    /// The driver takes its interval and timeout from here, so a pipeline always carries a
    /// usable configuration.
    pub fn new(client: RemoteApiClient, cache: SessionCache, config: FilterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver: BlockListResolver::new(client.clone(), config.mylist_page_size),
            expander: VideoIdExpander::new(client),
            cache,
            config,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The block-listed users, from the session cache or the block-list mylist
    pub async fn block_list(&self) -> Result<BlockList> {
        let users = self
            .cache
            .get_or_compute(&self.config.cache_keys.block_users, || async {
                Ok(self.resolver.resolve(&self.config.block_list_title).await?.to_strings())
            })
            .await?;

        Ok(users.into_iter().collect())
    }

    /// The videos to hide, from the session cache or by expanding the block-list
    pub async fn suppression_set(&self) -> Result<SuppressionSet> {
        let videos = self
            .cache
            .get_or_compute(&self.config.cache_keys.suppressed_videos, || async {
                let block_list = self.block_list().await?;
                let set = self.expander.expand(block_list.iter(), self.config.videos_per_user).await;
                log::info!("Expanded {} blocked users into {} videos", block_list.len(), set.len());
                Ok(set.to_strings())
            })
            .await?;

        Ok(videos.into_iter().collect())
    }

    /// Like [`suppression_set`](Self::suppression_set), but any failure yields an empty set
    ///
    /// The page then simply shows every video.
    pub async fn resolve(&self) -> SuppressionSet {
        match self.suppression_set().await {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Filtering disabled for this page: {}", e);
                SuppressionSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::api::{mylist_url, mylists_url, user_videos_url};
    use crate::cache::{MemoryStore, SessionStore};
    use crate::error::FilterError;
    use crate::ids::{MylistId, UserId};
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "https://nvapi.example";

    fn config() -> FilterConfig {
        FilterConfig::new().api_base_url(BASE).videos_per_user(2)
    }

    fn pipeline(transport: Arc<StubTransport>, store: Arc<MemoryStore>) -> SuppressionPipeline {
        SuppressionPipeline::new(RemoteApiClient::new(transport, BASE), SessionCache::new(store), config()).unwrap()
    }

    fn populated() -> StubTransport {
        StubTransport::new()
            .respond(mylists_url(BASE), json!({ "data": { "mylists": [ { "id": "9", "name": "BlockUsers" } ] } }))
            .respond(
                mylist_url(BASE, &MylistId::from("9"), 100),
                json!({ "data": { "mylist": { "items": [
                    { "video": { "owner": { "id": "1" } } },
                    { "video": { "owner": { "id": "2" } } }
                ] } } }),
            )
            .respond(
                user_videos_url(BASE, &UserId::from("1"), 2),
                json!({ "data": { "items": [ { "essential": { "id": "sm11" } }, { "essential": { "id": "sm10" } } ] } }),
            )
            .respond(
                user_videos_url(BASE, &UserId::from("2"), 2),
                json!({ "data": { "items": [ { "essential": { "id": "sm21" } } ] } }),
            )
    }

    #[tokio::test]
    async fn test_resolve_stores_both_lists() {
        let store = Arc::new(MemoryStore::new());
        let set = pipeline(Arc::new(populated()), store.clone()).resolve().await;

        assert_eq!(set.to_strings(), vec!["sm11", "sm10", "sm21"]);
        assert_eq!(store.get("nvcf_block_user_list").await.unwrap().as_deref(), Some("1,2"));
        assert_eq!(store.get("nvcf_remove_video_list").await.unwrap().as_deref(), Some("sm11,sm10,sm21"));
    }

    #[tokio::test]
    async fn test_cached_set_skips_network() {
        let store = Arc::new(MemoryStore::with_entries([("nvcf_remove_video_list", "sm1,sm2")]));
        let transport = Arc::new(StubTransport::new());

        let set = pipeline(transport.clone(), store).resolve().await;

        assert_eq!(set.to_strings(), vec!["sm1", "sm2"]);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cached_block_list_skips_mylist_fetch() {
        let store = Arc::new(MemoryStore::with_entries([("nvcf_block_user_list", "2")]));
        let transport = Arc::new(populated());

        let set = pipeline(transport.clone(), store).resolve().await;

        assert_eq!(set.to_strings(), vec!["sm21"]);
        assert_eq!(transport.requests(), vec![user_videos_url(BASE, &UserId::from("2"), 2)]);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let client = || RemoteApiClient::new(Arc::new(StubTransport::new()), BASE);
        let cache = || SessionCache::new(Arc::new(MemoryStore::new()));

        let zero_interval = config().poll_interval(std::time::Duration::ZERO);
        let err = SuppressionPipeline::new(client(), cache(), zero_interval).err().unwrap();
        assert!(matches!(err, FilterError::InvalidConfig(_)));

        // One key for both lists would make the video stage wait on its own lock
        let mut shared_key = config();
        shared_key.cache_keys.suppressed_videos = shared_key.cache_keys.block_users.clone();
        let err = SuppressionPipeline::new(client(), cache(), shared_key).err().unwrap();
        assert!(matches!(err, FilterError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(StubTransport::new().fail(mylists_url(BASE), 503));

        let set = pipeline(transport, store.clone()).resolve().await;

        assert!(set.is_empty());
        assert_eq!(store.get("nvcf_remove_video_list").await.unwrap(), None);
    }
}
