//! reevd - Reev daemon.
//!
//! Serves the post API over gRPC, backed by a MySQL datastore.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use reev::PostHandler;
use reev::server::config::{Config, Overrides, Secrets};
use reev::store::MySqlProvider;
use reev::version::BuildInfo;

/// Reev daemon - post CRUD service.
#[derive(Parser)]
#[command(name = "reevd")]
#[command(version = reev::PKG_VERSION)]
#[command(about = "Reev post service daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// gRPC port to bind.
    #[arg(long, env = "REEV_GRPC_PORT")]
    grpc_port: Option<u16>,

    /// Database host (`host` or `host:port`).
    #[arg(long, env = "REEV_DB_HOST")]
    db_host: Option<String>,

    /// Database user.
    #[arg(long, env = "REEV_DB_USER")]
    db_user: Option<String>,

    /// Database password.
    #[arg(long, env = "REEV_DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    /// Database schema.
    #[arg(long, env = "REEV_DB_SCHEMA")]
    db_schema: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            grpc_port: self.grpc_port,
            db_host: self.db_host.clone(),
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            db_schema: self.db_schema.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info for the daemon; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration; flags win over files
    let secrets = Secrets::load()?;
    let settings = Config::load(args.config.as_deref())?
        .with_overrides(args.overrides())
        .resolve(&secrets)?;

    let build = BuildInfo::current();
    info!(
        version = %build,
        built_at = build.built_at,
        addr = %settings.addr,
        db_host = %settings.database.host,
        db_schema = %settings.database.schema,
        "reevd starting"
    );

    let provider = MySqlProvider::new(&settings.database)
        .map_err(reev::ReevError::store("failed to open database"))?;
    let handler = Arc::new(PostHandler::new(provider.clone()));

    reev::server::serve(handler, settings.addr, &settings.limits, shutdown_signal()).await?;

    provider.close().await;
    info!("reevd stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}
