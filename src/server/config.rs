//! Configuration loading for reevd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.reev/config.toml` (user)
//! 3. `/etc/reev/config.toml` (system)
//!
//! A config file is optional: every required value can also come from CLI
//! flags (or their `REEV_*` environment variables), which take precedence.
//!
//! The database password may also live in a secrets file, loaded separately
//! with a mandatory permission check:
//! 1. `~/.reev/secrets.toml` (user, must be 0600)
//! 2. `/etc/reev/secrets.toml` (system, must be 0600)

use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::DatabaseSettings;
use crate::{ReevError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind to (default: 0.0.0.0).
    #[serde(default = "default_address")]
    pub address: String,
    /// TCP port for the gRPC server. Required.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: None,
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent requests per client connection (default: 100).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl LimitsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_max_concurrent() -> usize {
    100
}

fn default_timeout() -> u64 {
    30
}

/// Datastore configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `host` or `host:port`.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    /// Pool size (default: 10).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            password: None,
            schema: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

/// Values given on the command line; each one replaces its config entry.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub grpc_port: Option<u16>,
    pub db_host: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_schema: Option<String>,
}

/// Fully validated settings, ready for startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub limits: LimitsConfig,
    pub database: DatabaseSettings,
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub database: Option<DatabaseSecret>,
}

/// Datastore credentials kept out of the main config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSecret {
    pub password: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, a missing file yields the
    /// defaults so that flags alone can configure the server.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReevError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ReevError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ReevError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".reev").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/reev/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.grpc_port.is_some() {
            self.server.port = overrides.grpc_port;
        }
        let db = &mut self.database;
        db.host = overrides.db_host.or(db.host.take());
        db.user = overrides.db_user.or(db.user.take());
        db.password = overrides.db_password.or(db.password.take());
        db.schema = overrides.db_schema.or(db.schema.take());
        self
    }

    /// Validate and produce startup settings.
    ///
    /// Fails fast when the listen port is missing or zero, or when any
    /// database parameter is absent. The password falls back to `secrets`.
    pub fn resolve(self, secrets: &Secrets) -> Result<Settings> {
        let port = match self.server.port {
            Some(port) if port != 0 => port,
            other => {
                return Err(ReevError::Configuration(format!(
                    "invalid TCP port for gRPC server: '{}'",
                    other.map(|p| p.to_string()).unwrap_or_default()
                )));
            }
        };
        let ip: IpAddr = self.server.address.parse().map_err(|e| {
            ReevError::Configuration(format!("invalid address '{}': {e}", self.server.address))
        })?;

        let db = self.database;
        let password = db
            .password
            .or_else(|| secrets.database.as_ref().map(|s| s.password.clone()));
        let database = DatabaseSettings {
            host: required(db.host, "database host")?,
            user: required(db.user, "database user")?,
            password: required(password, "database password")?,
            schema: required(db.schema, "database schema")?,
            max_connections: db.max_connections,
        };

        Ok(Settings {
            addr: SocketAddr::new(ip, port),
            limits: self.server.limits,
            database,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ReevError::Configuration(format!("missing {what}")))
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.reev/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/reev/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists.
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".reev").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/reev/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file, enforcing its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            ReevError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ReevError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ReevError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(ReevError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [server]
        address = "127.0.0.1"
        port = 9090

        [server.limits]
        max_concurrent_requests = 50
        request_timeout_secs = 5

        [database]
        host = "db:3306"
        user = "reev"
        password = "secret"
        schema = "posts"
        max_connections = 4
    "#;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.server.port, None);
        assert_eq!(config.server.limits.max_concurrent_requests, 100);
        assert_eq!(config.server.limits.request_timeout_secs, 30);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(FULL).unwrap();
        let settings = config.resolve(&Secrets::default()).unwrap();
        assert_eq!(settings.addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(settings.limits.max_concurrent_requests, 50);
        assert_eq!(settings.limits.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.database.host, "db:3306");
        assert_eq!(settings.database.schema, "posts");
        assert_eq!(settings.database.max_connections, 4);
    }

    #[test]
    fn missing_port_fails_fast() {
        let mut config: Config = toml::from_str(FULL).unwrap();
        config.server.port = None;
        let err = config.resolve(&Secrets::default()).unwrap_err();
        assert!(err.to_string().contains("invalid TCP port"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config: Config = toml::from_str(FULL).unwrap();
        config.server.port = Some(0);
        assert!(config.resolve(&Secrets::default()).is_err());
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        let mut config: Config = toml::from_str(FULL).unwrap();
        config.server.address = "not-an-ip".to_string();
        let err = config.resolve(&Secrets::default()).unwrap_err();
        assert!(err.to_string().contains("invalid address 'not-an-ip'"));
    }

    #[test]
    fn missing_database_field_is_rejected() {
        let mut config: Config = toml::from_str(FULL).unwrap();
        config.database.schema = None;
        let err = config.resolve(&Secrets::default()).unwrap_err();
        assert!(err.to_string().contains("database schema"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config: Config = toml::from_str(FULL).unwrap();
        let settings = config
            .with_overrides(Overrides {
                grpc_port: Some(7000),
                db_user: Some("admin".to_string()),
                ..Default::default()
            })
            .resolve(&Secrets::default())
            .unwrap();
        assert_eq!(settings.addr.port(), 7000);
        assert_eq!(settings.database.user, "admin");
        // Untouched values survive
        assert_eq!(settings.database.host, "db:3306");
    }

    #[test]
    fn flags_alone_are_enough() {
        let settings = Config::default()
            .with_overrides(Overrides {
                grpc_port: Some(9090),
                db_host: Some("localhost".to_string()),
                db_user: Some("u".to_string()),
                db_password: Some("p".to_string()),
                db_schema: Some("s".to_string()),
            })
            .resolve(&Secrets::default())
            .unwrap();
        assert_eq!(settings.addr, "0.0.0.0:9090".parse().unwrap());
    }

    #[test]
    fn password_falls_back_to_secrets() {
        let mut config: Config = toml::from_str(FULL).unwrap();
        config.database.password = None;
        let secrets: Secrets = toml::from_str(
            r#"
            [database]
            password = "from-secrets"
        "#,
        )
        .unwrap();
        let settings = config.resolve(&secrets).unwrap();
        assert_eq!(settings.database.password, "from-secrets");
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[cfg(unix)]
    #[test]
    fn insecure_secrets_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[database]\npassword = \"x\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let err = Secrets::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("insecure permissions"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.database.unwrap().password, "x");
    }
}
