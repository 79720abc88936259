//! Response schemas of the platform API
//!
//! Only the fields the filter reads are modelled; everything else is ignored.

use crate::ids::{MylistId, UserId, VideoId};
use serde::Deserialize;

/// Every endpoint wraps its payload in `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `GET /v3/users/{id}/videos`
#[derive(Debug, Deserialize)]
pub struct UserVideosData {
    #[serde(default)]
    pub items: Vec<UserVideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct UserVideoItem {
    pub essential: VideoEssential,
}

#[derive(Debug, Deserialize)]
pub struct VideoEssential {
    pub id: VideoId,
}

/// `GET /v1/users/me/mylists`
#[derive(Debug, Deserialize)]
pub struct MylistsData {
    #[serde(default)]
    pub mylists: Vec<MylistSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MylistSummary {
    pub id: MylistId,
    pub name: String,
}

/// `GET /v1/users/me/mylists/{id}`
#[derive(Debug, Deserialize)]
pub struct MylistData {
    pub mylist: MylistDetail,
}

#[derive(Debug, Deserialize)]
pub struct MylistDetail {
    #[serde(default)]
    pub items: Vec<MylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct MylistItem {
    pub video: MylistVideo,
}

#[derive(Debug, Deserialize)]
pub struct MylistVideo {
    #[serde(default)]
    pub owner: Option<VideoOwner>,
}

/// Channel and hidden owners come back with a null id
#[derive(Debug, Deserialize)]
pub struct VideoOwner {
    #[serde(default)]
    pub id: Option<UserId>,
}

impl MylistItem {
    pub fn owner_id(&self) -> Option<&UserId> {
        self.video.owner.as_ref().and_then(|owner| owner.id.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_videos_schema() {
        let body = json!({
            "meta": { "status": 200 },
            "data": { "totalCount": 2, "items": [
                { "series": null, "essential": { "type": "essential", "id": "sm9", "title": "a" } },
                { "essential": { "id": "so10" } }
            ] }
        });

        let parsed: Envelope<UserVideosData> = serde_json::from_value(body).unwrap();
        let ids: Vec<&str> = parsed.data.items.iter().map(|i| i.essential.id.as_str()).collect();
        assert_eq!(ids, vec!["sm9", "so10"]);
    }

    #[test]
    fn test_mylists_schema_numeric_id() {
        let body = json!({ "data": { "mylists": [ { "id": 71234, "name": "BlockUsers", "itemsCount": 3 } ] } });

        let parsed: Envelope<MylistsData> = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.data.mylists[0].id.as_str(), "71234");
        assert_eq!(parsed.data.mylists[0].name, "BlockUsers");
    }

    #[test]
    fn test_mylist_items_owner_variants() {
        let body = json!({ "data": { "mylist": { "items": [
            { "video": { "owner": { "ownerType": "user", "id": "100" } } },
            { "video": { "owner": { "ownerType": "hidden", "id": null } } },
            { "video": {} }
        ] } } });

        let parsed: Envelope<MylistData> = serde_json::from_value(body).unwrap();
        let owners: Vec<Option<&str>> = parsed.data.mylist.items.iter().map(|i| i.owner_id().map(UserId::as_str)).collect();
        assert_eq!(owners, vec![Some("100"), None, None]);
    }
}
