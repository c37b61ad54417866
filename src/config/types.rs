//! Runtime settings for the service, filled from the environment by `loader`.

use std::net::SocketAddr;

pub const DEFAULT_SCHEMA: &str = "adoption";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres {
        database_url: String,
        /// Schema holding the entity tables. A plain identifier.
        schema: String,
        max_connections: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub bind: SocketAddr,
    /// Max request body bytes.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage: StorageBackend::Memory,
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}
