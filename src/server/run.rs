//! Serving loop with explicit shutdown.
//!
//! The caller owns the shutdown signal: when the `shutdown` future resolves
//! the server stops accepting connections, lets in-flight requests finish
//! (bounded by the request timeout) and then releases the listener.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use super::config::LimitsConfig;
use super::proto::post_service_server::PostServiceServer;
use super::service::ReevService;
use crate::{PostApi, ReevError, Result};

fn router<A: PostApi + 'static>(
    api: Arc<A>,
    limits: &LimitsConfig,
) -> tonic::transport::server::Router {
    Server::builder()
        .timeout(limits.request_timeout())
        .concurrency_limit_per_connection(limits.max_concurrent_requests)
        .add_service(PostServiceServer::new(ReevService::new(api)))
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<A, F>(
    api: Arc<A>,
    addr: SocketAddr,
    limits: &LimitsConfig,
    shutdown: F,
) -> Result<()>
where
    A: PostApi + 'static,
    F: Future<Output = ()>,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ReevError::Transport(format!("failed to bind {addr}: {e}")))?;
    serve_with_listener(api, listener, limits, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<A, F>(
    api: Arc<A>,
    listener: TcpListener,
    limits: &LimitsConfig,
    shutdown: F,
) -> Result<()>
where
    A: PostApi + 'static,
    F: Future<Output = ()>,
{
    let local = listener
        .local_addr()
        .map_err(|e| ReevError::Transport(e.to_string()))?;
    info!(addr = %local, "starting gRPC server");

    let result = router(api, limits)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
            shutdown.await;
            info!("shutting down gRPC server");
        })
        .await
        .map_err(|e| ReevError::Transport(e.to_string()));

    info!(addr = %local, "gRPC server stopped");
    result
}
