//! Load `GatewayConfig` from environment variables.

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

impl GatewayConfig {
    /// Read configuration from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; unset and blank values are treated alike.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match get("STORE_BACKEND").as_deref().unwrap_or("rest") {
            "rest" | "supabase" => StoreBackend::Rest(RestStoreConfig {
                url: get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                key: get("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?,
                timeout: Duration::from_secs(parse_or(
                    "STORE_TIMEOUT_SECS",
                    get("STORE_TIMEOUT_SECS"),
                    DEFAULT_STORE_TIMEOUT_SECS,
                )?),
            }),
            "postgres" | "postgresql" => StoreBackend::Postgres(PostgresStoreConfig {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                schema: get("DATABASE_SCHEMA").unwrap_or_else(|| DEFAULT_DATABASE_SCHEMA.into()),
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    get("DATABASE_MAX_CONNECTIONS"),
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                apply_schema: parse_or("DATABASE_APPLY_SCHEMA", get("DATABASE_APPLY_SCHEMA"), false)?,
            }),
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    reason: format!("unknown backend '{}' (expected rest, postgres or memory)", other),
                })
            }
        };

        let config = GatewayConfig {
            bind_addr: parse_or(
                "BIND_ADDR",
                Some(get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())),
                SocketAddr::from(([0, 0, 0, 0], 5000)),
            )?,
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), DEFAULT_BODY_LIMIT_BYTES)?,
            store,
        };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: format!("'{}': {}", s, e),
        }),
    }
}
