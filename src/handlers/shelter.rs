use crate::error::AppError;
use crate::handlers::extract::{parse_id, ApiJson};
use crate::model::{Adopter, Pet, Shelter};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_all_shelters(State(state): State<AppState>) -> Result<Json<Vec<Shelter>>, AppError> {
    Ok(Json(state.shelters.find_all().await?))
}

pub async fn get_shelter(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Shelter>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.shelters.find_by_id(id).await?))
}

pub async fn get_by_name_zip(
    State(state): State<AppState>,
    Path((name, zip)): Path<(String, String)>,
) -> Result<Json<Vec<Shelter>>, AppError> {
    Ok(Json(state.shelters.find_by_name_zip(&name, &zip).await?))
}

pub async fn get_shelter_adopters(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Vec<Adopter>>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.shelters.find_adopters(id).await?))
}

pub async fn get_shelter_pets(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.shelters.find_pets(id).await?))
}

/// Detaches adopters and pets before deleting; responds `true` or `false`.
pub async fn delete_shelter(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.shelters.delete_shelter(id).await?))
}

pub async fn save_shelter(
    State(state): State<AppState>,
    ApiJson(shelter): ApiJson<Shelter>,
) -> Result<Json<Shelter>, AppError> {
    Ok(Json(state.shelters.save_shelter(shelter).await?))
}
