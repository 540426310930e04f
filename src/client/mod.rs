//! Client library for connecting to reevd.
//!
//! Provides [`ServiceClient`], which implements [`PostApi`](crate::PostApi)
//! by forwarding calls to a remote reevd instance over gRPC.

mod service_client;

pub use service_client::ServiceClient;
