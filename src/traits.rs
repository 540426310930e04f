//! Core PostApi trait

use async_trait::async_trait;

use crate::Result;
use crate::types::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

/// The five post operations.
///
/// Implemented in-process by [`PostHandler`](crate::PostHandler) and
/// remotely by `ServiceClient` (with the `client` feature), so callers can
/// switch between an embedded datastore and a running `reevd` without
/// changing code.
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Store a new post and return its generated id.
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse>;

    /// Fetch one post by id.
    async fn read(&self, request: ReadRequest) -> Result<ReadResponse>;

    /// Replace title and description of an existing post.
    async fn update(&self, request: UpdateRequest) -> Result<UpdateResponse>;

    /// Remove a post by id.
    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResponse>;

    /// List every post.
    async fn read_all(&self, request: ReadAllRequest) -> Result<ReadAllResponse>;
}
