//! Adopter handlers. No business logic: parse the path or body, call the service, return JSON.

use crate::error::AppError;
use crate::handlers::extract::{parse_id, ApiJson};
use crate::model::{Adopter, PetType};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_all_adopters(State(state): State<AppState>) -> Result<Json<Vec<Adopter>>, AppError> {
    Ok(Json(state.adopters.find_all().await?))
}

pub async fn get_adopter(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Adopter>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.adopters.find_by_id(id).await?))
}

pub async fn get_by_name_zip(
    State(state): State<AppState>,
    Path((name, zip)): Path<(String, String)>,
) -> Result<Json<Vec<Adopter>>, AppError> {
    Ok(Json(state.adopters.find_by_name_zip(&name, &zip).await?))
}

pub async fn get_by_preferred_pet_type_zip(
    State(state): State<AppState>,
    Path((preferred_pet_type, zip)): Path<(String, String)>,
) -> Result<Json<Vec<Adopter>>, AppError> {
    let pet_type: PetType = preferred_pet_type.parse()?;
    Ok(Json(state.adopters.find_by_preferred_pet_type_zip(pet_type, &zip).await?))
}

/// Responds `true` or `false`; a missing id is not an error.
pub async fn delete_adopter(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.adopters.delete_adopter(id).await?))
}

pub async fn add_adopter(
    State(state): State<AppState>,
    ApiJson(adopter): ApiJson<Adopter>,
) -> Result<Json<Adopter>, AppError> {
    Ok(Json(state.adopters.save_adopter(adopter).await?))
}

/// Upsert: creates when the body has no id.
pub async fn save_adopter(
    State(state): State<AppState>,
    ApiJson(adopter): ApiJson<Adopter>,
) -> Result<Json<Adopter>, AppError> {
    Ok(Json(state.adopters.save_adopter(adopter).await?))
}
