//! Request handler: maps each operation onto exactly one SQL statement.
//!
//! Every operation runs the same three phases:
//! 1. API version check ([`check_api`])
//! 2. checkout of a scoped connection from the [`ConnectionProvider`]
//! 3. one statement, with its outcome mapped to a typed response or error
//!
//! The connection is a local value, so it is returned to the pool on every
//! exit path, including when the caller drops the future mid-statement.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{API_VERSION, check_api};
use crate::store::{ColumnType, Connection, ConnectionProvider, Row, StoreError};
use crate::telemetry;
use crate::types::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Post, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::{ErrorKind, PostApi, ReevError, Result};

const INSERT_POST: &str = "INSERT INTO Post(`Title`, `Description`) VALUES(?, ?)";
const SELECT_POST: &str = "SELECT `ID`, `Title`, `Description` FROM Post WHERE `ID`=?";
const UPDATE_POST: &str = "UPDATE Post SET `Title`=?, `Description`=? WHERE `ID`=?";
const DELETE_POST: &str = "DELETE FROM Post WHERE `ID`=?";
const SELECT_ALL_POSTS: &str = "SELECT `ID`, `Title`, `Description` FROM Post";

const POST_COLUMNS: [ColumnType; 3] = [ColumnType::Int, ColumnType::Text, ColumnType::Text];

/// Serves post operations against a datastore.
pub struct PostHandler<P> {
    provider: P,
}

impl<P: ConnectionProvider> PostHandler<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying connection provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn connect(&self) -> Result<P::Connection> {
        self.provider
            .connect()
            .await
            .map_err(ReevError::store("failed to connect to database"))
    }

    async fn create_post(&self, request: CreateRequest) -> Result<CreateResponse> {
        check_api(&request.api)?;
        let mut conn = self.connect().await?;

        let outcome = conn
            .execute(
                INSERT_POST,
                &[request.post.title.into(), request.post.description.into()],
            )
            .await
            .map_err(ReevError::store("failed to insert into Post"))?;
        let id = outcome
            .last_insert_id()
            .map_err(ReevError::store("failed to retrieve id for created Post"))?;

        Ok(CreateResponse {
            api: API_VERSION.to_string(),
            id,
        })
    }

    async fn read_post(&self, request: ReadRequest) -> Result<ReadResponse> {
        check_api(&request.api)?;
        let mut conn = self.connect().await?;

        let rows = conn
            .query(SELECT_POST, &[request.id.into()], &POST_COLUMNS)
            .await
            .map_err(ReevError::store("failed to select from Post"))?;

        let post = match rows.as_slice() {
            [] => return Err(ReevError::NotFound { id: request.id }),
            [row] => post_from_row(row)
                .map_err(ReevError::store("failed to retrieve field values from Post row"))?,
            _ => return Err(ReevError::MultipleRows { id: request.id }),
        };

        Ok(ReadResponse {
            api: API_VERSION.to_string(),
            post,
        })
    }

    async fn update_post(&self, request: UpdateRequest) -> Result<UpdateResponse> {
        check_api(&request.api)?;
        let mut conn = self.connect().await?;

        let Post {
            id,
            title,
            description,
        } = request.post;
        let outcome = conn
            .execute(UPDATE_POST, &[title.into(), description.into(), id.into()])
            .await
            .map_err(ReevError::store("failed to update Post"))?;
        let updated = outcome
            .rows_affected()
            .map_err(ReevError::store("failed to retrieve rows affected value"))?;

        if updated == 0 {
            return Err(ReevError::NotFound { id });
        }
        Ok(UpdateResponse {
            api: API_VERSION.to_string(),
            updated,
        })
    }

    async fn delete_post(&self, request: DeleteRequest) -> Result<DeleteResponse> {
        check_api(&request.api)?;
        let mut conn = self.connect().await?;

        let outcome = conn
            .execute(DELETE_POST, &[request.id.into()])
            .await
            .map_err(ReevError::store("failed to delete Post"))?;
        let deleted = outcome
            .rows_affected()
            .map_err(ReevError::store("failed to retrieve rows affected value"))?;

        if deleted == 0 {
            return Err(ReevError::NotFound { id: request.id });
        }
        Ok(DeleteResponse {
            api: API_VERSION.to_string(),
            deleted,
        })
    }

    async fn read_all_posts(&self, request: ReadAllRequest) -> Result<ReadAllResponse> {
        check_api(&request.api)?;
        let mut conn = self.connect().await?;

        let rows = conn
            .query(SELECT_ALL_POSTS, &[], &POST_COLUMNS)
            .await
            .map_err(ReevError::store("failed to select from Post"))?;
        // Any bad row fails the whole listing.
        let posts = rows
            .iter()
            .map(post_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ReevError::store("failed to retrieve field values from Post row"))?;

        Ok(ReadAllResponse {
            api: API_VERSION.to_string(),
            posts,
        })
    }
}

fn post_from_row(row: &Row) -> std::result::Result<Post, StoreError> {
    Ok(Post {
        id: row.get_i64(0)?,
        title: row.get_str(1)?.to_string(),
        description: row.get_str(2)?.to_string(),
    })
}

/// Run one operation, recording its outcome.
async fn observe<T>(operation: &'static str, op: impl Future<Output = Result<T>>) -> Result<T> {
    let start = Instant::now();
    let result = op.await;
    let status = match &result {
        Ok(_) => {
            debug!(operation, "request ok");
            "ok"
        }
        Err(e) => {
            let kind = e.kind();
            if kind == ErrorKind::Unknown {
                warn!(operation, error = %e, "request failed");
            } else {
                debug!(operation, kind = kind.as_str(), error = %e, "request rejected");
            }
            kind.as_str()
        }
    };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "operation" => operation,
    )
    .record(start.elapsed().as_secs_f64());
    result
}

#[async_trait]
impl<P: ConnectionProvider> PostApi for PostHandler<P> {
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        observe("create", self.create_post(request)).await
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse> {
        observe("read", self.read_post(request)).await
    }

    async fn update(&self, request: UpdateRequest) -> Result<UpdateResponse> {
        observe("update", self.update_post(request)).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResponse> {
        observe("delete", self.delete_post(request)).await
    }

    async fn read_all(&self, request: ReadAllRequest) -> Result<ReadAllResponse> {
        observe("read_all", self.read_all_posts(request)).await
    }
}
