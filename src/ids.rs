//! Opaque identifiers and the two derived collections
//!
//! IDs are never validated or parsed: whatever the platform returns is kept verbatim.
//! The API is inconsistent about emitting IDs as JSON numbers or strings, so both are
//! accepted on deserialization.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_id(deserializer).map(Self)
            }
        }
    };
}

opaque_id!(
    /// Platform user (video owner) identifier
    UserId
);

opaque_id!(
    /// Platform video identifier, e.g. `sm9`
    VideoId
);

opaque_id!(
    /// Identifier of a mylist (named, user-curated collection)
    MylistId
);

/// Accept either a JSON string or a JSON number and keep it as text
pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Deduplicated set of block-listed users, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    users: IndexSet<UserId>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user; returns false if it was already present
    pub fn insert(&mut self, user: UserId) -> bool {
        self.users.insert(user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.users.iter()
    }

    /// String form used by the session cache
    pub fn to_strings(&self) -> Vec<String> {
        self.users.iter().map(|u| u.as_str().to_string()).collect()
    }
}

impl FromIterator<UserId> for BlockList {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self { users: iter.into_iter().collect() }
    }
}

impl FromIterator<String> for BlockList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().map(UserId::from).collect()
    }
}

/// Flattened video IDs to hide; duplicates across users are kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    videos: Vec<VideoId>,
}

impl SuppressionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, videos: impl IntoIterator<Item = VideoId>) {
        self.videos.extend(videos);
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn as_slice(&self) -> &[VideoId] {
        &self.videos
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.as_str().to_string()).collect()
    }
}

impl FromIterator<VideoId> for SuppressionSet {
    fn from_iter<I: IntoIterator<Item = VideoId>>(iter: I) -> Self {
        Self { videos: iter.into_iter().collect() }
    }
}

impl FromIterator<String> for SuppressionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().map(VideoId::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string_or_number() {
        let from_text: UserId = serde_json::from_value(serde_json::json!("12345")).unwrap();
        let from_number: UserId = serde_json::from_value(serde_json::json!(12345)).unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(from_text.as_str(), "12345");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let video = VideoId::new("sm9");
        assert_eq!(serde_json::to_string(&video).unwrap(), "\"sm9\"");
    }

    #[test]
    fn test_block_list_keeps_first_seen_order() {
        let list: BlockList = ["3", "1", "3", "2", "1"].into_iter().map(UserId::from).collect();
        assert_eq!(list.to_strings(), vec!["3", "1", "2"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_suppression_set_keeps_duplicates() {
        let set: SuppressionSet = ["sm1", "sm2", "sm1"].into_iter().map(VideoId::from).collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_strings(), vec!["sm1", "sm2", "sm1"]);
    }
}
