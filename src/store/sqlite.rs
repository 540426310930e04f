//! SQLite backend, for local development and tests.

use std::path::Path;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{
    ColumnType, Connection, ConnectionProvider, ExecOutcome, Row, StoreError, Value, bind_all,
    decode_row,
};

/// Pooled SQLite connections.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    /// Open (creating if needed) a database file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// A private in-memory database.
    ///
    /// Every SQLite memory connection is its own database, so the pool holds
    /// exactly one connection and never recycles it.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// Connections currently idle in the pool.
    pub fn idle_connections(&self) -> usize {
        self.pool.num_idle()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A SQLite connection checked out of [`SqliteProvider`].
#[derive(Debug)]
pub struct SqliteConnection {
    conn: PoolConnection<Sqlite>,
}

#[async_trait]
impl Connection for SqliteConnection {
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecOutcome, StoreError> {
        let result = bind_all(sqlx::query(sql), args)
            .execute(&mut *self.conn)
            .await
            .map_err(StoreError::Execute)?;
        let rowid = result.last_insert_rowid();
        let last_insert_id = u64::try_from(rowid)
            .map_err(|_| StoreError::Decode(format!("negative rowid {rowid}")))?;
        Ok(ExecOutcome::new(last_insert_id, result.rows_affected()))
    }

    async fn query(
        &mut self,
        sql: &str,
        args: &[Value],
        columns: &[ColumnType],
    ) -> Result<Vec<Row>, StoreError> {
        let rows = bind_all(sqlx::query(sql), args)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(StoreError::Execute)?;
        rows.iter().map(|row| decode_row(row, columns)).collect()
    }
}

#[async_trait]
impl ConnectionProvider for SqliteProvider {
    type Connection = SqliteConnection;

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::Connect)?;
        Ok(SqliteConnection { conn })
    }
}
