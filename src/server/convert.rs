//! Conversions between reev native types and protobuf types.
//!
//! Both directions live here: the server converts incoming requests to
//! native types and native responses to proto; the client does the reverse.

use crate::types::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, NewPost, Post, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

use super::proto;

// =============================================================================
// Post
// =============================================================================

impl From<proto::Post> for Post {
    fn from(p: proto::Post) -> Self {
        Post {
            id: p.id,
            title: p.title,
            description: p.description,
        }
    }
}

impl From<Post> for proto::Post {
    fn from(post: Post) -> Self {
        proto::Post {
            id: post.id,
            title: post.title,
            description: post.description,
        }
    }
}

/// Creation ignores any id the caller sent.
impl From<proto::Post> for NewPost {
    fn from(p: proto::Post) -> Self {
        NewPost {
            title: p.title,
            description: p.description,
        }
    }
}

impl From<NewPost> for proto::Post {
    fn from(post: NewPost) -> Self {
        proto::Post {
            id: 0,
            title: post.title,
            description: post.description,
        }
    }
}

// =============================================================================
// Requests (proto → native on the server, native → proto on the client)
// =============================================================================

impl From<proto::CreateRequest> for CreateRequest {
    fn from(p: proto::CreateRequest) -> Self {
        CreateRequest {
            api: p.api,
            post: p.post.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<CreateRequest> for proto::CreateRequest {
    fn from(r: CreateRequest) -> Self {
        proto::CreateRequest {
            api: r.api,
            post: Some(r.post.into()),
        }
    }
}

impl From<proto::ReadRequest> for ReadRequest {
    fn from(p: proto::ReadRequest) -> Self {
        ReadRequest { api: p.api, id: p.id }
    }
}

impl From<ReadRequest> for proto::ReadRequest {
    fn from(r: ReadRequest) -> Self {
        proto::ReadRequest { api: r.api, id: r.id }
    }
}

impl From<proto::UpdateRequest> for UpdateRequest {
    fn from(p: proto::UpdateRequest) -> Self {
        UpdateRequest {
            api: p.api,
            post: p.post.unwrap_or_default().into(),
        }
    }
}

impl From<UpdateRequest> for proto::UpdateRequest {
    fn from(r: UpdateRequest) -> Self {
        proto::UpdateRequest {
            api: r.api,
            post: Some(r.post.into()),
        }
    }
}

impl From<proto::DeleteRequest> for DeleteRequest {
    fn from(p: proto::DeleteRequest) -> Self {
        DeleteRequest { api: p.api, id: p.id }
    }
}

impl From<DeleteRequest> for proto::DeleteRequest {
    fn from(r: DeleteRequest) -> Self {
        proto::DeleteRequest { api: r.api, id: r.id }
    }
}

impl From<proto::ReadAllRequest> for ReadAllRequest {
    fn from(p: proto::ReadAllRequest) -> Self {
        ReadAllRequest { api: p.api }
    }
}

impl From<ReadAllRequest> for proto::ReadAllRequest {
    fn from(r: ReadAllRequest) -> Self {
        proto::ReadAllRequest { api: r.api }
    }
}

// =============================================================================
// Responses (native → proto on the server, proto → native on the client)
// =============================================================================

impl From<CreateResponse> for proto::CreateResponse {
    fn from(r: CreateResponse) -> Self {
        proto::CreateResponse { api: r.api, id: r.id }
    }
}

impl From<proto::CreateResponse> for CreateResponse {
    fn from(p: proto::CreateResponse) -> Self {
        CreateResponse { api: p.api, id: p.id }
    }
}

impl From<ReadResponse> for proto::ReadResponse {
    fn from(r: ReadResponse) -> Self {
        proto::ReadResponse {
            api: r.api,
            post: Some(r.post.into()),
        }
    }
}

impl From<proto::ReadResponse> for ReadResponse {
    fn from(p: proto::ReadResponse) -> Self {
        ReadResponse {
            api: p.api,
            post: p.post.unwrap_or_default().into(),
        }
    }
}

impl From<UpdateResponse> for proto::UpdateResponse {
    fn from(r: UpdateResponse) -> Self {
        proto::UpdateResponse {
            api: r.api,
            updated: r.updated,
        }
    }
}

impl From<proto::UpdateResponse> for UpdateResponse {
    fn from(p: proto::UpdateResponse) -> Self {
        UpdateResponse {
            api: p.api,
            updated: p.updated,
        }
    }
}

impl From<DeleteResponse> for proto::DeleteResponse {
    fn from(r: DeleteResponse) -> Self {
        proto::DeleteResponse {
            api: r.api,
            deleted: r.deleted,
        }
    }
}

impl From<proto::DeleteResponse> for DeleteResponse {
    fn from(p: proto::DeleteResponse) -> Self {
        DeleteResponse {
            api: p.api,
            deleted: p.deleted,
        }
    }
}

impl From<ReadAllResponse> for proto::ReadAllResponse {
    fn from(r: ReadAllResponse) -> Self {
        proto::ReadAllResponse {
            api: r.api,
            posts: r.posts.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::ReadAllResponse> for ReadAllResponse {
    fn from(p: proto::ReadAllResponse) -> Self {
        ReadAllResponse {
            api: p.api,
            posts: p.posts.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_without_post_is_empty_post() {
        let native: CreateRequest = proto::CreateRequest {
            api: "v1".to_string(),
            post: None,
        }
        .into();
        assert_eq!(native.post, NewPost::default());
    }

    #[test]
    fn create_request_drops_client_id() {
        let native: CreateRequest = proto::CreateRequest {
            api: String::new(),
            post: Some(proto::Post {
                id: 42,
                title: "T".to_string(),
                description: "D".to_string(),
            }),
        }
        .into();
        assert_eq!(native.post, NewPost::new("T", "D"));
    }

    #[test]
    fn update_request_without_post_targets_id_zero() {
        let native: UpdateRequest = proto::UpdateRequest {
            api: String::new(),
            post: None,
        }
        .into();
        assert_eq!(native.post.id, 0);
    }

    #[test]
    fn read_all_response_keeps_order() {
        let native = ReadAllResponse {
            api: "v1".to_string(),
            posts: vec![Post::new(2, "b", "b"), Post::new(1, "a", "a")],
        };
        let wire: proto::ReadAllResponse = native.into();
        let ids: Vec<i64> = wire.posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
