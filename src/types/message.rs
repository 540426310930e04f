//! Request and response types, one pair per operation.
//!
//! Every request carries the API version the caller expects; every response
//! carries the version the service implements.

use serde::{Deserialize, Serialize};

use super::{NewPost, Post};
use crate::api::API_VERSION;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRequest {
    pub api: String,
    pub post: NewPost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateResponse {
    pub api: String,
    /// Id generated by the datastore.
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadRequest {
    pub api: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadResponse {
    pub api: String,
    pub post: Post,
}

/// Replace title and description of the post identified by `post.id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRequest {
    pub api: String,
    pub post: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResponse {
    pub api: String,
    /// Affected-row count as reported by the datastore.
    pub updated: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteRequest {
    pub api: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub api: String,
    /// Affected-row count as reported by the datastore.
    pub deleted: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadAllRequest {
    pub api: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadAllResponse {
    pub api: String,
    /// Posts in datastore order.
    pub posts: Vec<Post>,
}

impl CreateRequest {
    /// Request against the current API version.
    pub fn new(post: NewPost) -> Self {
        Self {
            api: API_VERSION.to_string(),
            post,
        }
    }
}

impl ReadRequest {
    pub fn new(id: i64) -> Self {
        Self {
            api: API_VERSION.to_string(),
            id,
        }
    }
}

impl UpdateRequest {
    pub fn new(post: Post) -> Self {
        Self {
            api: API_VERSION.to_string(),
            post,
        }
    }
}

impl DeleteRequest {
    pub fn new(id: i64) -> Self {
        Self {
            api: API_VERSION.to_string(),
            id,
        }
    }
}

impl ReadAllRequest {
    pub fn new() -> Self {
        Self {
            api: API_VERSION.to_string(),
        }
    }
}
