//! Config validation: fail fast on values that cannot produce a working store client.

use crate::config::{GatewayConfig, StoreBackend};
use crate::error::ConfigError;

pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    if config.body_limit_bytes == 0 {
        return Err(ConfigError::Invalid {
            var: "BODY_LIMIT_BYTES",
            reason: "must be greater than zero".into(),
        });
    }
    match &config.store {
        StoreBackend::Rest(rest) => {
            let url = reqwest::Url::parse(&rest.url).map_err(|e| ConfigError::Invalid {
                var: "SUPABASE_URL",
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    var: "SUPABASE_URL",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            if rest.timeout.is_zero() {
                return Err(ConfigError::Invalid {
                    var: "STORE_TIMEOUT_SECS",
                    reason: "must be greater than zero".into(),
                });
            }
        }
        StoreBackend::Postgres(pg) => {
            if !(pg.database_url.starts_with("postgres://") || pg.database_url.starts_with("postgresql://")) {
                return Err(ConfigError::Invalid {
                    var: "DATABASE_URL",
                    reason: "expected a postgres:// URL".into(),
                });
            }
            if pg.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    reason: "must be greater than zero".into(),
                });
            }
            if !is_identifier(&pg.schema) {
                return Err(ConfigError::Invalid {
                    var: "DATABASE_SCHEMA",
                    reason: format!("'{}' is not a valid identifier", pg.schema),
                });
            }
        }
        StoreBackend::Memory => {}
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostgresStoreConfig, RestStoreConfig};
    use std::time::Duration;

    fn with_store(store: StoreBackend) -> GatewayConfig {
        GatewayConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            body_limit_bytes: 1024,
            store,
        }
    }

    #[test]
    fn rest_url_must_be_http() {
        let cfg = with_store(StoreBackend::Rest(RestStoreConfig {
            url: "ftp://example.com".into(),
            key: "k".into(),
            timeout: Duration::from_secs(1),
        }));
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid { var: "SUPABASE_URL", .. })));

        let cfg = with_store(StoreBackend::Rest(RestStoreConfig {
            url: "not a url".into(),
            key: "k".into(),
            timeout: Duration::from_secs(1),
        }));
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn postgres_schema_must_be_identifier() {
        let cfg = with_store(StoreBackend::Postgres(PostgresStoreConfig {
            database_url: "postgres://localhost/db".into(),
            schema: "public; drop".into(),
            max_connections: 1,
            apply_schema: false,
        }));
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid { var: "DATABASE_SCHEMA", .. })));
    }

    #[test]
    fn memory_backend_is_always_valid() {
        assert!(validate(&with_store(StoreBackend::Memory)).is_ok());
    }
}
