mod handlers;
mod routes;
mod state;
mod static_assets;
mod v1;

#[cfg(test)]
mod routes_test;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

pub use routes::create_router;
pub use state::AppState;
pub use v1::ErrorResponse;

/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable holding the bind address.
pub const HOST_ENV: &str = "HOST";
/// Environment variable holding the database file path.
pub const DB_PATH_ENV: &str = "DB_PATH";

/// Errors raised while configuring or running the API server.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Invalid value for {key}: '{value}'")]
    #[diagnostic(code(todo_server::api::invalid_config))]
    InvalidConfig { key: &'static str, value: String },

    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(todo_server::api::bind),
        help("Is another process already listening on this port? Try --port or PORT.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(todo_server::api::serve))]
    Serve(#[source] std::io::Error),
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            db_path: PathBuf::from("./data/todos.db"),
        }
    }
}

impl Config {
    /// Defaults overridden by `HOST`, `PORT` and `DB_PATH` when set.
    pub fn new() -> Result<Self, ApiError> {
        let mut config = Self::default();

        if let Some(value) = non_empty_env(HOST_ENV) {
            config.host = value.parse().map_err(|_| ApiError::InvalidConfig {
                key: HOST_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = non_empty_env(PORT_ENV) {
            config.port = value.parse().map_err(|_| ApiError::InvalidConfig {
                key: PORT_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = non_empty_env(DB_PATH_ENV) {
            config.db_path = PathBuf::from(value);
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration and database.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    let state = AppState::new(db);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
