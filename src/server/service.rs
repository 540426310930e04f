//! gRPC service implementation.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::proto;
use super::proto::post_service_server::PostService;
use crate::PostApi;

/// gRPC service that wraps a [`PostApi`] implementation.
///
/// Errors keep their kind across the wire: `Unimplemented`, `NotFound` and
/// `Unknown` become the matching `tonic::Code`.
pub struct ReevService<A: PostApi> {
    api: Arc<A>,
}

impl<A: PostApi> ReevService<A> {
    /// Create a new service wrapping the given handler.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[tonic::async_trait]
impl<A: PostApi + 'static> PostService for ReevService<A> {
    async fn create(
        &self,
        request: Request<proto::CreateRequest>,
    ) -> Result<Response<proto::CreateResponse>, Status> {
        let response = self.api.create(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }

    async fn read(
        &self,
        request: Request<proto::ReadRequest>,
    ) -> Result<Response<proto::ReadResponse>, Status> {
        let response = self.api.read(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }

    async fn update(
        &self,
        request: Request<proto::UpdateRequest>,
    ) -> Result<Response<proto::UpdateResponse>, Status> {
        let response = self.api.update(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }

    async fn delete(
        &self,
        request: Request<proto::DeleteRequest>,
    ) -> Result<Response<proto::DeleteResponse>, Status> {
        let response = self.api.delete(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }

    async fn read_all(
        &self,
        request: Request<proto::ReadAllRequest>,
    ) -> Result<Response<proto::ReadAllResponse>, Status> {
        let response = self.api.read_all(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }
}
