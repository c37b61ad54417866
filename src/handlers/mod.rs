//! HTTP handlers for adopters, shelters and pets.

pub mod adopter;
pub mod extract;
pub mod pet;
pub mod shelter;

pub use extract::{parse_id, ApiJson};
