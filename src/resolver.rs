use crate::api::RemoteApiClient;
use crate::error::{FilterError, Result};
use crate::ids::BlockList;

/// Turns the block-list mylist into the set of users whose videos are hidden
pub struct BlockListResolver {
    client: RemoteApiClient,
    page_size: u32,
}

impl BlockListResolver {
    pub fn new(client: RemoteApiClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Owners of the videos in the first mylist named `title`
    ///
    /// Only the first page of items is read, so a list longer than the page size is
    /// truncated. Fails with [`FilterError::BlockListNotFound`] if no mylist has that name.
    pub async fn resolve(&self, title: &str) -> Result<BlockList> {
        let mylists = self.client.list_mylists().await?;
        let mylist = mylists
            .iter()
            .find(|m| m.name == title)
            .ok_or_else(|| FilterError::BlockListNotFound(title.to_string()))?;

        let items = self.client.mylist_items(&mylist.id, self.page_size).await?;
        let total = items.len();

        let mut block_list = BlockList::new();
        for item in items {
            match item.owner_id() {
                Some(owner) => {
                    block_list.insert(owner.clone());
                }
                None => log::debug!("Skipping mylist item without a user owner"),
            }
        }

        log::info!("Block-list '{}' ({}): {} users from {} items", title, mylist.id, block_list.len(), total);
        Ok(block_list)
    }
}
