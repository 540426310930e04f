//! Reev - CRUD service for posts over gRPC
//!
//! This crate provides a [`PostHandler`] that serves create, read, update,
//! delete and list operations for a single `Post` table, one SQL statement
//! per request. The handler is reachable in-process through the [`PostApi`]
//! trait or over gRPC via the `reevd` daemon (`server` feature) and the
//! `ServiceClient` (`client` feature).
//!
//! # Example
//!
//! ```rust,no_run
//! use reev::store::SqliteProvider;
//! use reev::{CreateRequest, NewPost, PostApi, PostHandler, ReadRequest};
//!
//! #[tokio::main]
//! async fn main() -> reev::Result<()> {
//!     let provider = SqliteProvider::open("posts.db").await
//!         .map_err(reev::ReevError::store("failed to open database"))?;
//!     let handler = PostHandler::new(provider);
//!
//!     let created = handler
//!         .create(CreateRequest::new(NewPost::new("T1", "D1")))
//!         .await?;
//!     let read = handler.read(ReadRequest::new(created.id)).await?;
//!
//!     println!("{}: {}", read.post.title, read.post.description);
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod handler;
#[cfg(any(feature = "server", feature = "client"))]
pub mod server;
pub mod store;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use api::API_VERSION;
pub use error::{ErrorKind, ReevError, Result};
pub use handler::PostHandler;
pub use traits::PostApi;
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, NewPost, Post, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
