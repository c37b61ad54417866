//! Adoption API: REST backend for adopters, shelters and pets over memory or PostgreSQL storage.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, StorageBackend};
pub use error::{AppError, ConfigError};
pub use model::{Adopter, AdoptionStatus, Contact, Pet, PetType, Shelter, ShelterRef};
pub use routes::{api_routes, app, common_routes};
pub use service::{AdopterService, PetService, ShelterService};
pub use state::AppState;
pub use store::{Storage, Store};
