//! Integration tests for gRPC service mode.
//!
//! Starts an in-process reevd server over a temporary SQLite database and
//! connects with a [`ServiceClient`], validating the full round-trip
//! through proto conversions and status-code mapping.

#![cfg(all(feature = "server", feature = "client", feature = "sqlite"))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reev::client::ServiceClient;
use reev::server::config::LimitsConfig;
use reev::server::proto;
use reev::server::proto::post_service_client::PostServiceClient;
use reev::store::{Connection, ConnectionProvider, SqliteProvider};
use reev::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ErrorKind, NewPost, Post, PostApi,
    PostHandler, ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse, ReevError,
    UpdateRequest, UpdateResponse,
};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;

struct TestServer {
    addr: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<reev::Result<()>>,
    _dir: TempDir,
}

impl TestServer {
    /// Signal shutdown and wait for the server to stop.
    async fn stop(mut self) -> reev::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

/// Start a test server on a random port.
async fn start_test_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let provider = SqliteProvider::open(dir.path().join("posts.db"))
        .await
        .unwrap();
    let mut conn = provider.connect().await.unwrap();
    conn.execute(
        "CREATE TABLE Post (`ID` INTEGER PRIMARY KEY AUTOINCREMENT, `Title` TEXT NOT NULL, \
         `Description` TEXT NOT NULL, `Reminder` TIMESTAMP NULL)",
        &[],
    )
    .await
    .unwrap();
    drop(conn);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let handler = Arc::new(PostHandler::new(provider));
    let task = tokio::spawn(async move {
        reev::server::serve_with_listener(handler, listener, &LimitsConfig::default(), async {
            let _ = rx.await;
        })
        .await
    });

    TestServer {
        addr: format!("http://{addr}"),
        shutdown: Some(tx),
        task,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_client_connect() {
    let server = start_test_server().await;
    let client = ServiceClient::connect(&server.addr).await;
    assert!(client.is_ok(), "failed to connect: {:?}", client.err());
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_full_lifecycle_over_grpc() {
    let server = start_test_server().await;
    let client = ServiceClient::connect(&server.addr).await.unwrap();

    let created = client
        .create(CreateRequest::new(NewPost::new("T1", "D1")))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.api, "v1");

    let read = client.read(ReadRequest::new(1)).await.unwrap();
    assert_eq!(read.post, Post::new(1, "T1", "D1"));

    let updated = client
        .update(UpdateRequest::new(Post::new(1, "T2", "D2")))
        .await
        .unwrap();
    assert_eq!(updated.updated, 1);

    let read = client.read(ReadRequest::new(1)).await.unwrap();
    assert_eq!(read.post, Post::new(1, "T2", "D2"));

    let deleted = client.delete(DeleteRequest::new(1)).await.unwrap();
    assert_eq!(deleted.deleted, 1);

    let err = client.read(ReadRequest::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Post with ID='1' is not found");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_all_over_grpc() {
    let server = start_test_server().await;
    let client = ServiceClient::connect(&server.addr).await.unwrap();

    let empty = client.read_all(ReadAllRequest::new()).await.unwrap();
    assert!(empty.posts.is_empty());

    for i in 0..3 {
        client
            .create(CreateRequest::new(NewPost::new(format!("t{i}"), "d")))
            .await
            .unwrap();
    }
    let all = client.read_all(ReadAllRequest::new()).await.unwrap();
    assert_eq!(all.posts.len(), 3);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_status_codes_on_the_wire() {
    let server = start_test_server().await;
    let mut grpc = PostServiceClient::connect(server.addr.clone()).await.unwrap();

    let status = grpc
        .read_all(proto::ReadAllRequest {
            api: "v2".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::Unimplemented);
    assert!(status.message().contains("but asked for 'v2'"));

    let status = grpc
        .delete(proto::DeleteRequest {
            api: String::new(),
            id: 77,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_missing_post_message_on_update() {
    let server = start_test_server().await;
    let mut grpc = PostServiceClient::connect(server.addr.clone()).await.unwrap();

    let status = grpc
        .update(proto::UpdateRequest {
            api: "v1".to_string(),
            post: None,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);
    assert_eq!(status.message(), "Post with ID='0' is not found");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = start_test_server().await;
    let addr = server.addr.clone();
    let client = ServiceClient::connect(&addr).await.unwrap();
    client.read_all(ReadAllRequest::new()).await.unwrap();

    server.stop().await.unwrap();

    assert!(ServiceClient::connect(&addr).await.is_err());
}

/// Reads park until released; everything else is not found.
#[derive(Default)]
struct GatedApi {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl PostApi for GatedApi {
    async fn create(&self, _request: CreateRequest) -> reev::Result<CreateResponse> {
        Err(ReevError::NotFound { id: 0 })
    }

    async fn read(&self, request: ReadRequest) -> reev::Result<ReadResponse> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ReadResponse {
            api: "v1".to_string(),
            post: Post::new(request.id, "slow", "request"),
        })
    }

    async fn update(&self, request: UpdateRequest) -> reev::Result<UpdateResponse> {
        Err(ReevError::NotFound {
            id: request.post.id,
        })
    }

    async fn delete(&self, request: DeleteRequest) -> reev::Result<DeleteResponse> {
        Err(ReevError::NotFound { id: request.id })
    }

    async fn read_all(&self, _request: ReadAllRequest) -> reev::Result<ReadAllResponse> {
        Err(ReevError::NotFound { id: 0 })
    }
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_requests() {
    let api = Arc::new(GatedApi::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel::<()>();

    let server_api = Arc::clone(&api);
    let task = tokio::spawn(async move {
        reev::server::serve_with_listener(server_api, listener, &LimitsConfig::default(), async {
            let _ = rx.await;
        })
        .await
    });

    let client = ServiceClient::connect(&addr).await.unwrap();
    let pending = tokio::spawn(async move { client.read(ReadRequest::new(5)).await });
    api.entered.notified().await;

    tx.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!task.is_finished(), "server stopped while a request was in flight");

    api.release.notify_one();
    let response = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("in-flight request did not complete")
        .unwrap()
        .unwrap();
    assert_eq!(response.post, Post::new(5, "slow", "request"));

    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

// =============================================================================
// Live tests - require reevd running against MySQL
// =============================================================================

#[tokio::test]
#[ignore = "requires reevd running on 127.0.0.1:9090"]
async fn test_live_roundtrip() {
    let client = ServiceClient::connect("http://127.0.0.1:9090")
        .await
        .expect("connect to reevd (is it running?)");

    let created = client
        .create(CreateRequest::new(NewPost::new("live", "test")))
        .await
        .expect("create failed");
    let read = client.read(ReadRequest::new(created.id)).await.unwrap();
    assert_eq!(read.post.title, "live");
    client.delete(DeleteRequest::new(created.id)).await.unwrap();
}
