//! Static route tables for the entity endpoints.
//!
//! Collection routes answer with and without a trailing slash. The two adopter lookups that would
//! otherwise share the `{a}/{b}` shape live under distinct `by-name` and `by-pet-type` prefixes.

use crate::handlers::{adopter, pet, shelter};
use crate::state::AppState;
use axum::{routing::get, Router};

pub const ADOPTERS: &str = "/api/v1/adopters";
pub const SHELTERS: &str = "/api/v1/shelters";
pub const PETS: &str = "/api/v1/pets";

pub fn adopter_routes(state: AppState) -> Router {
    let collection = get(adopter::get_all_adopters)
        .post(adopter::add_adopter)
        .put(adopter::save_adopter);
    Router::new()
        .route(ADOPTERS, collection.clone())
        .route(&format!("{}/", ADOPTERS), collection)
        .route(
            &format!("{}/:id", ADOPTERS),
            get(adopter::get_adopter).delete(adopter::delete_adopter),
        )
        .route(&format!("{}/by-name/:name/:zip", ADOPTERS), get(adopter::get_by_name_zip))
        .route(
            &format!("{}/by-pet-type/:preferred_pet_type/:zip", ADOPTERS),
            get(adopter::get_by_preferred_pet_type_zip),
        )
        .with_state(state)
}

pub fn shelter_routes(state: AppState) -> Router {
    let collection = get(shelter::get_all_shelters)
        .post(shelter::save_shelter)
        .put(shelter::save_shelter);
    Router::new()
        .route(SHELTERS, collection.clone())
        .route(&format!("{}/", SHELTERS), collection)
        .route(
            &format!("{}/:id", SHELTERS),
            get(shelter::get_shelter).delete(shelter::delete_shelter),
        )
        .route(&format!("{}/:id/adopters", SHELTERS), get(shelter::get_shelter_adopters))
        .route(&format!("{}/:id/pets", SHELTERS), get(shelter::get_shelter_pets))
        .route(&format!("{}/by-name/:name/:zip", SHELTERS), get(shelter::get_by_name_zip))
        .with_state(state)
}

pub fn pet_routes(state: AppState) -> Router {
    let collection = get(pet::get_all_pets).post(pet::save_pet).put(pet::save_pet);
    Router::new()
        .route(PETS, collection.clone())
        .route(&format!("{}/", PETS), collection)
        .route(&format!("{}/:id", PETS), get(pet::get_pet).delete(pet::delete_pet))
        .route(&format!("{}/by-type/:pet_type", PETS), get(pet::get_by_pet_type))
        .route(&format!("{}/by-shelter/:shelter_id", PETS), get(pet::get_by_shelter))
        .with_state(state)
}

/// Every entity route.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(adopter_routes(state.clone()))
        .merge(shelter_routes(state.clone()))
        .merge(pet_routes(state))
}
