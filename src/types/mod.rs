//! Public types for the Reev API.

mod message;
mod post;

pub use message::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
pub use post::{NewPost, Post};
