//! Datastore seam: pooled connections and single-statement execution.
//!
//! A [`ConnectionProvider`] hands out one [`Connection`] per request. The
//! connection is owned by that request alone and goes back to the pool when
//! it is dropped, so every exit path (success, error, or a cancelled future)
//! releases it.
//!
//! Backends wrap a `sqlx` pool:
//! - [`MySqlProvider`] for production deployments
//! - [`SqliteProvider`] for local development and tests

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "sqlite")]
mod sqlite;
mod value;

use std::fmt;

use async_trait::async_trait;

#[cfg(feature = "mysql")]
pub use mysql::MySqlProvider;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteProvider;
pub use value::{ColumnType, ExecOutcome, Row, Value};

/// Connection parameters for a networked datastore.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// `host`, `host:port`, or an IPv6 address (`::1`, `[::1]:3306`).
    pub host: String,
    pub user: String,
    pub password: String,
    pub schema: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Datastore failures, before they are classified by the request handler.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to acquire connection: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("{0}")]
    Execute(#[source] sqlx::Error),

    #[error("{0}")]
    Decode(String),

    /// A count or id reported by the driver does not fit the wire type.
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: u64 },
}

/// A connection checked out for the duration of one request.
#[async_trait]
pub trait Connection: Send {
    /// Run a statement that returns no rows.
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecOutcome, StoreError>;

    /// Run a statement and collect every row it returns, decoding column
    /// `i` as `columns[i]`.
    async fn query(
        &mut self,
        sql: &str,
        args: &[Value],
        columns: &[ColumnType],
    ) -> Result<Vec<Row>, StoreError>;
}

/// Source of scoped connections.
#[async_trait]
pub trait ConnectionProvider: Send + Sync + 'static {
    type Connection: Connection;

    /// Check a connection out of the pool.
    ///
    /// Waits until a connection is available or the pool gives up.
    async fn connect(&self) -> Result<Self::Connection, StoreError>;
}

/// Bind positional arguments onto a `sqlx` query.
#[cfg(any(feature = "mysql", feature = "sqlite"))]
fn bind_all<'q, DB>(
    mut query: sqlx::query::Query<'q, DB, <DB as sqlx::Database>::Arguments<'q>>,
    args: &[Value],
) -> sqlx::query::Query<'q, DB, <DB as sqlx::Database>::Arguments<'q>>
where
    DB: sqlx::Database,
    i64: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    String: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    Option<String>: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
{
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Int(v) => query.bind(*v),
            Value::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

/// Convert a driver row into a [`Row`], decoding each column as the
/// requested [`ColumnType`].
///
/// A text column holding an integer (SQLite numeric affinity) is rendered
/// back to its decimal text.
#[cfg(any(feature = "mysql", feature = "sqlite"))]
fn decode_row<R>(row: &R, columns: &[ColumnType]) -> Result<Row, StoreError>
where
    R: sqlx::Row,
    usize: sqlx::ColumnIndex<R>,
    for<'r> i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'r> String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    use sqlx::ValueRef;

    if row.len() != columns.len() {
        return Err(StoreError::Decode(format!(
            "expected {} columns, got {}",
            columns.len(),
            row.len()
        )));
    }

    let mut values = Vec::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let raw = row
            .try_get_raw(i)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        if raw.is_null() {
            values.push(Value::Null);
            continue;
        }
        let value = match column {
            ColumnType::Int => row.try_get::<i64, _>(i).map(Value::Int),
            ColumnType::Text => row.try_get::<String, _>(i).map(Value::Text).or_else(|e| {
                row.try_get::<i64, _>(i)
                    .map(|v| Value::Text(v.to_string()))
                    .map_err(|_| e)
            }),
        };
        values.push(value.map_err(|e| StoreError::Decode(e.to_string()))?);
    }
    Ok(Row::new(values))
}
