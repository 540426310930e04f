//! Post entity types.

use serde::{Deserialize, Serialize};

/// A stored post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Unique id assigned by the datastore on creation.
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl Post {
    /// Create a post value with a known id.
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A post that has not been stored yet (no id).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
