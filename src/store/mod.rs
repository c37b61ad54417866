//! Persistence gateway: one `Store` per entity type over a memory or PostgreSQL backend.
//!
//! `Storage` is the explicit handle built at startup, handed to the services, and closed at shutdown.

pub mod memory;
pub mod postgres;
pub mod schema;

use crate::config::{AppConfig, StorageBackend};
use crate::error::AppError;
use crate::model::{Adopter, AdopterFilter, Pet, PetFilter, Shelter};
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use memory::MemoryStore;
pub use postgres::{delete_shelter_detached, PgEntity, PgStore};
pub use schema::{ensure_database_exists, ensure_tables};

/// A record with a generated integer identity and a set of exact-match filters.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Filter: Debug + Send + Sync;

    /// Lower-case kind used in logs and not-found messages.
    const KIND: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);
    fn matches(&self, filter: &Self::Filter) -> bool;
}

#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    /// All records ordered by id.
    async fn find_all(&self) -> Result<Vec<E>, AppError>;

    /// Exact lookup; `AppError::NotFound` when absent.
    async fn find_by_id(&self, id: i64) -> Result<E, AppError>;

    /// Records matching every field of `filter`, ordered by id. Empty when nothing matches.
    async fn find_by(&self, filter: &E::Filter) -> Result<Vec<E>, AppError>;

    /// Upsert. No id: assign one and insert. With id: replace the whole record.
    async fn save(&self, entity: E) -> Result<E, AppError>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(AppError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// How many records lost their shelter reference when a shelter was deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Detached {
    pub adopters: u64,
    pub pets: u64,
}

#[derive(Clone)]
enum Backend {
    Memory,
    Postgres { pool: PgPool, schema: String },
}

/// Handle to every entity store over one backend.
#[derive(Clone)]
pub struct Storage {
    pub adopters: Arc<dyn Store<Adopter>>,
    pub shelters: Arc<dyn Store<Shelter>>,
    pub pets: Arc<dyn Store<Pet>>,
    /// Held shared while a record's shelter reference is checked and written, exclusively while a
    /// shelter is deleted. Orders the two so no write can land a reference to a deleted shelter.
    pub shelter_links: Arc<RwLock<()>>,
    backend: Backend,
}

impl Storage {
    pub fn memory() -> Self {
        Storage {
            adopters: Arc::new(MemoryStore::<Adopter>::new()),
            shelters: Arc::new(MemoryStore::<Shelter>::new()),
            pets: Arc::new(MemoryStore::<Pet>::new()),
            shelter_links: Arc::new(RwLock::new(())),
            backend: Backend::Memory,
        }
    }

    /// Wrap an existing pool. Creates the schema and tables if missing.
    pub async fn postgres(pool: PgPool, schema: &str) -> Result<Self, AppError> {
        ensure_tables(&pool, schema).await?;
        Ok(Storage {
            adopters: Arc::new(PgStore::<Adopter>::new(pool.clone(), schema)),
            shelters: Arc::new(PgStore::<Shelter>::new(pool.clone(), schema)),
            pets: Arc::new(PgStore::<Pet>::new(pool.clone(), schema)),
            shelter_links: Arc::new(RwLock::new(())),
            backend: Backend::Postgres {
                pool,
                schema: schema.to_string(),
            },
        })
    }

    /// Open the backend selected by config. For postgres the database is created if it does not exist.
    pub async fn open(config: &AppConfig) -> Result<Self, AppError> {
        match &config.storage {
            StorageBackend::Memory => {
                tracing::info!("using in-memory storage");
                Ok(Self::memory())
            }
            StorageBackend::Postgres { database_url, schema, max_connections } => {
                ensure_database_exists(database_url).await?;
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url)
                    .await?;
                tracing::info!(schema = %schema, "using postgres storage");
                Self::postgres(pool, schema).await
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            Backend::Postgres { .. } => "postgres",
        }
    }

    /// Readiness check: a trivial round trip for postgres, always ok for memory.
    pub async fn ping(&self) -> Result<(), AppError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::Postgres { pool, .. } => {
                sqlx::query("SELECT 1").fetch_optional(pool).await?;
                Ok(())
            }
        }
    }

    /// Clear every adopter's and pet's reference to the shelter, then delete it, as one unit.
    /// `None` when no shelter has this id.
    pub async fn delete_shelter(&self, id: i64) -> Result<Option<Detached>, AppError> {
        let _links = self.shelter_links.write().await;
        match &self.backend {
            Backend::Postgres { pool, schema } => delete_shelter_detached(pool, schema, id).await,
            Backend::Memory => {
                if !self.shelters.exists(id).await? {
                    return Ok(None);
                }
                let mut detached = Detached::default();
                for mut adopter in self.adopters.find_by(&AdopterFilter::Shelter(id)).await? {
                    adopter.shelter_model = None;
                    self.adopters.save(adopter).await?;
                    detached.adopters += 1;
                }
                for mut pet in self.pets.find_by(&PetFilter::Shelter(id)).await? {
                    pet.shelter_model = None;
                    self.pets.save(pet).await?;
                    detached.pets += 1;
                }
                self.shelters.delete_by_id(id).await?;
                Ok(Some(detached))
            }
        }
    }

    pub async fn close(&self) {
        if let Backend::Postgres { pool, .. } = &self.backend {
            pool.close().await;
        }
        tracing::info!(backend = self.backend_name(), "storage closed");
    }
}
