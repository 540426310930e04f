//! [`ServiceClient`] - [`PostApi`] implementation that connects to reevd over gRPC.
//!
//! All proto ↔ native type conversions are centralized in [`crate::server::convert`].

use async_trait::async_trait;
use tonic::transport::Channel;

use crate::server::proto;
use crate::server::proto::post_service_client::PostServiceClient;
use crate::types::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::{ErrorKind, PostApi, ReevError, Result};

/// A [`PostApi`] client that connects to a remote reevd server.
///
/// Cloning is cheap; clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: PostServiceClient<Channel>,
}

impl ServiceClient {
    /// Connect to a reevd server at the given address.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ServiceClient::connect("http://127.0.0.1:9090").await?;
    /// ```
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let inner = PostServiceClient::connect(addr.clone())
            .await
            .map_err(|e| ReevError::Transport(format!("failed to connect to {addr}: {e}")))?;
        Ok(Self { inner })
    }
}

/// Convert [`tonic::Status`] to [`ReevError`], keeping the error kind.
fn from_status(status: tonic::Status) -> ReevError {
    let kind = match status.code() {
        tonic::Code::Unimplemented => ErrorKind::Unimplemented,
        tonic::Code::NotFound => ErrorKind::NotFound,
        _ => ErrorKind::Unknown,
    };
    ReevError::Remote {
        kind,
        message: status.message().to_string(),
    }
}

#[async_trait]
impl PostApi for ServiceClient {
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        let response = self
            .inner
            .clone()
            .create(proto::CreateRequest::from(request))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().into())
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse> {
        let response = self
            .inner
            .clone()
            .read(proto::ReadRequest::from(request))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().into())
    }

    async fn update(&self, request: UpdateRequest) -> Result<UpdateResponse> {
        let response = self
            .inner
            .clone()
            .update(proto::UpdateRequest::from(request))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().into())
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResponse> {
        let response = self
            .inner
            .clone()
            .delete(proto::DeleteRequest::from(request))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().into())
    }

    async fn read_all(&self, request: ReadAllRequest) -> Result<ReadAllResponse> {
        let response = self
            .inner
            .clone()
            .read_all(proto::ReadAllRequest::from(request))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        let cases = [
            (tonic::Code::Unimplemented, ErrorKind::Unimplemented),
            (tonic::Code::NotFound, ErrorKind::NotFound),
            (tonic::Code::Unknown, ErrorKind::Unknown),
            (tonic::Code::Unavailable, ErrorKind::Unknown),
        ];
        for (code, kind) in cases {
            let err = from_status(tonic::Status::new(code, "boom"));
            assert_eq!(err.kind(), kind, "code {code:?}");
            assert_eq!(err.to_string(), "boom");
        }
    }
}
