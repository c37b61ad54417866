//! Load `AppConfig` from environment variables (or any key lookup, for tests).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;

pub const ENV_STORAGE: &str = "ADOPTION_STORAGE";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_SCHEMA: &str = "ADOPTION_SCHEMA";
pub const ENV_MAX_CONNECTIONS: &str = "ADOPTION_MAX_CONNECTIONS";
pub const ENV_BIND: &str = "ADOPTION_BIND";
pub const ENV_BODY_LIMIT: &str = "ADOPTION_BODY_LIMIT";

impl AppConfig {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to honor a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate settings from a key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get(ENV_DATABASE_URL);
        let backend = match get(ENV_STORAGE) {
            Some(s) => s.to_lowercase(),
            None if database_url.is_some() => "postgres".to_string(),
            None => "memory".to_string(),
        };
        let storage = match backend.as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" | "postgresql" => StorageBackend::Postgres {
                database_url: database_url.ok_or(ConfigError::Missing(ENV_DATABASE_URL))?,
                schema: get(ENV_SCHEMA).unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
                max_connections: parse_or(ENV_MAX_CONNECTIONS, get(ENV_MAX_CONNECTIONS), DEFAULT_MAX_CONNECTIONS)?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: ENV_STORAGE,
                    value: backend.clone(),
                })
            }
        };

        let config = AppConfig {
            storage,
            bind: parse_or(ENV_BIND, get(ENV_BIND), AppConfig::default().bind)?,
            body_limit: parse_or(ENV_BODY_LIMIT, get(ENV_BODY_LIMIT), DEFAULT_BODY_LIMIT)?,
        };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_memory() {
        let c = load(&[]).unwrap();
        assert_eq!(c, AppConfig::default());
    }

    #[test]
    fn database_url_selects_postgres() {
        let c = load(&[(ENV_DATABASE_URL, "postgres://localhost/adoption")]).unwrap();
        assert_eq!(
            c.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/adoption".into(),
                schema: DEFAULT_SCHEMA.into(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            }
        );
    }

    #[test]
    fn explicit_memory_wins_over_database_url() {
        let c = load(&[(ENV_STORAGE, "Memory"), (ENV_DATABASE_URL, "postgres://localhost/x")]).unwrap();
        assert_eq!(c.storage, StorageBackend::Memory);
    }

    #[test]
    fn postgres_requires_url() {
        assert!(matches!(load(&[(ENV_STORAGE, "postgres")]), Err(ConfigError::Missing(ENV_DATABASE_URL))));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(load(&[(ENV_STORAGE, "sqlite")]), Err(ConfigError::Invalid { .. })));
        assert!(matches!(load(&[(ENV_BIND, "nowhere")]), Err(ConfigError::Invalid { .. })));
        assert!(matches!(load(&[(ENV_BODY_LIMIT, "-1")]), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn reads_bind_and_limit() {
        let c = load(&[(ENV_BIND, "127.0.0.1:8080"), (ENV_BODY_LIMIT, "2048")]).unwrap();
        assert_eq!(c.bind.port(), 8080);
        assert_eq!(c.body_limit, 2048);
    }
}
