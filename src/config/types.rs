//! Runtime configuration read from the environment at start-up.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DATABASE_SCHEMA: &str = "public";
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Which store implementation backs the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted table API (PostgREST dialect).
    Rest(RestStoreConfig),
    /// Direct PostgreSQL connection.
    Postgres(PostgresStoreConfig),
    /// In-process tables; data is lost on exit.
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Rest(_) => "rest",
            StoreBackend::Postgres(_) => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct RestStoreConfig {
    pub url: String,
    pub key: String,
    pub timeout: Duration,
}

// Keeps the access key out of logs.
impl std::fmt::Debug for RestStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStoreConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostgresStoreConfig {
    pub database_url: String,
    pub schema: String,
    pub max_connections: u32,
    /// Create the three tables on start-up when they are missing.
    pub apply_schema: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub body_limit_bytes: usize,
    pub store: StoreBackend,
}
