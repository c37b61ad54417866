//! Entity records: adopters, shelters, pets and the enums they share.

pub mod adopter;
pub mod contact;
pub mod enums;
pub mod pet;
pub mod shelter;

pub use adopter::{Adopter, AdopterFilter};
pub use contact::{Contact, ShelterRef};
pub use enums::{AdoptionStatus, PetType};
pub use pet::{Pet, PetFilter};
pub use shelter::{Shelter, ShelterFilter};
