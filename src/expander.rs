use crate::api::RemoteApiClient;
use crate::ids::{SuppressionSet, UserId};

/// Expands users into their most recent video IDs
pub struct VideoIdExpander {
    client: RemoteApiClient,
}

impl VideoIdExpander {
    pub fn new(client: RemoteApiClient) -> Self {
        Self { client }
    }

    /// Concatenate each user's newest `per_user_limit` videos, in input order
    ///
    /// Users are fetched one at a time. A user whose fetch fails contributes nothing and
    /// the remaining users are still expanded.
    pub async fn expand<'a>(&self, users: impl IntoIterator<Item = &'a UserId>, per_user_limit: u32) -> SuppressionSet {
        let mut set = SuppressionSet::new();

        for user in users {
            match self.client.user_videos(user, per_user_limit).await {
                Ok(videos) => {
                    log::debug!("User {}: {} videos", user, videos.len());
                    // The API may ignore pageSize; the bound is enforced here
                    set.extend(videos.into_iter().take(per_user_limit as usize));
                }
                Err(e) => log::warn!("Skipping videos of user {}: {}", user, e),
            }
        }

        set
    }
}
