//! Config validation: values that parse but cannot be used.

use crate::config::{AppConfig, StorageBackend};
use crate::error::ConfigError;

/// Schema names end up in DDL, so only plain identifiers are accepted.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.body_limit == 0 {
        return Err(ConfigError::Validation("body limit must be positive".into()));
    }
    if let StorageBackend::Postgres { schema, max_connections, .. } = &config.storage {
        if !is_plain_identifier(schema) {
            return Err(ConfigError::Validation(format!(
                "schema '{}' must be a lower-case identifier",
                schema
            )));
        }
        if *max_connections == 0 {
            return Err(ConfigError::Validation("max connections must be at least 1".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres(schema: &str, max_connections: u32) -> AppConfig {
        AppConfig {
            storage: StorageBackend::Postgres {
                database_url: "postgres://localhost/adoption".into(),
                schema: schema.into(),
                max_connections,
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn identifiers() {
        assert!(is_plain_identifier("adoption"));
        assert!(is_plain_identifier("_pets2"));
        assert!(!is_plain_identifier("2pets"));
        assert!(!is_plain_identifier("Pets"));
        assert!(!is_plain_identifier("a;drop"));
        assert!(!is_plain_identifier(""));
    }

    #[test]
    fn rejects_bad_schema_and_pool_size() {
        assert!(validate(&postgres("adoption", 5)).is_ok());
        assert!(validate(&postgres("bad-name", 5)).is_err());
        assert!(validate(&postgres("adoption", 0)).is_err());
    }

    #[test]
    fn rejects_zero_body_limit() {
        let c = AppConfig { body_limit: 0, ..AppConfig::default() };
        assert!(validate(&c).is_err());
    }
}
