//! MySQL backend.

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use tracing::debug;

use super::{
    ColumnType, Connection, ConnectionProvider, DatabaseSettings, ExecOutcome, Row, StoreError,
    Value, bind_all, decode_row,
};

/// Port used when the host does not name one.
pub const DEFAULT_PORT: u16 = 3306;

impl DatabaseSettings {
    /// Split `host` into host name and port.
    ///
    /// IPv6 addresses are accepted bare (`::1`) or bracketed with an optional
    /// port (`[::1]:3307`).
    fn host_and_port(&self) -> Result<(&str, u16), StoreError> {
        let host = self.host.as_str();
        if let Some(rest) = host.strip_prefix('[') {
            let (addr, tail) = rest
                .split_once(']')
                .ok_or_else(|| self.invalid_host("unclosed '['"))?;
            return match tail {
                "" => Ok((addr, DEFAULT_PORT)),
                _ => match tail.strip_prefix(':') {
                    Some(port) => Ok((addr, self.parse_port(port)?)),
                    None => Err(self.invalid_host("unexpected text after ']'")),
                },
            };
        }
        match host.split_once(':') {
            // More than one ':' without brackets is a bare IPv6 address.
            Some((_, rest)) if rest.contains(':') => Ok((host, DEFAULT_PORT)),
            Some((name, port)) => Ok((name, self.parse_port(port)?)),
            None => Ok((host, DEFAULT_PORT)),
        }
    }

    fn parse_port(&self, port: &str) -> Result<u16, StoreError> {
        port.parse().map_err(|e| self.invalid_host(&format!("invalid port: {e}")))
    }

    fn invalid_host(&self, reason: &str) -> StoreError {
        StoreError::Connect(sqlx::Error::Configuration(
            format!("invalid database host '{}': {reason}", self.host).into(),
        ))
    }

    fn mysql_options(&self) -> Result<MySqlConnectOptions, StoreError> {
        let (host, port) = self.host_and_port()?;
        Ok(MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.schema))
    }
}

/// Pooled MySQL connections.
///
/// The pool is created lazily: no connection is opened until the first
/// request asks for one.
#[derive(Debug, Clone)]
pub struct MySqlProvider {
    pool: MySqlPool,
}

impl MySqlProvider {
    pub fn new(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = settings.mysql_options()?;
        debug!(
            host = %settings.host,
            schema = %settings.schema,
            max_connections = settings.max_connections,
            "creating MySQL pool"
        );
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A MySQL connection checked out of [`MySqlProvider`].
#[derive(Debug)]
pub struct MySqlConnection {
    conn: PoolConnection<MySql>,
}

#[async_trait]
impl Connection for MySqlConnection {
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecOutcome, StoreError> {
        let result = bind_all(sqlx::query(sql), args)
            .execute(&mut *self.conn)
            .await
            .map_err(StoreError::Execute)?;
        Ok(ExecOutcome::new(result.last_insert_id(), result.rows_affected()))
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
impl ConnectionProvider for MySqlProvider {
    type Connection = MySqlConnection;

    async fn connect(&self) -> Result<MySqlConnection, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::Connect)?;
        Ok(MySqlConnection { conn })
    }
}
