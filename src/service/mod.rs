//! Application services, one per entity kind. Each validates input and delegates to its store.

pub mod adopter;
pub mod pet;
pub mod shelter;
pub mod validation;

pub use adopter::AdopterService;
pub use pet::PetService;
pub use shelter::ShelterService;
pub use validation::RequestValidator;

use crate::error::AppError;
use crate::model::{Shelter, ShelterRef};
use crate::store::Store;

/// A saved record may only point at a shelter that exists.
async fn check_shelter_ref(shelters: &dyn Store<Shelter>, shelter: Option<ShelterRef>) -> Result<(), AppError> {
    if let Some(ShelterRef { id }) = shelter {
        if !shelters.exists(id).await? {
            return Err(AppError::Validation(format!("shelter {} does not exist", id)));
        }
    }
    Ok(())
}
