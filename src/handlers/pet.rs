use crate::error::AppError;
use crate::handlers::extract::{parse_id, ApiJson};
use crate::model::{Pet, PetType};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_all_pets(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, AppError> {
    Ok(Json(state.pets.find_all().await?))
}

pub async fn get_pet(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<Json<Pet>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.pets.find_by_id(id).await?))
}

pub async fn get_by_pet_type(
    State(state): State<AppState>,
    Path(pet_type): Path<String>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pet_type: PetType = pet_type.parse()?;
    Ok(Json(state.pets.find_by_pet_type(pet_type).await?))
}

pub async fn get_by_shelter(
    State(state): State<AppState>,
    Path(shelter_id): Path<String>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let shelter_id = parse_id(&shelter_id)?;
    Ok(Json(state.pets.find_by_shelter(shelter_id).await?))
}

pub async fn delete_pet(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<Json<bool>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.pets.delete_pet(id).await?))
}

pub async fn save_pet(State(state): State<AppState>, ApiJson(pet): ApiJson<Pet>) -> Result<Json<Pet>, AppError> {
    Ok(Json(state.pets.save_pet(pet).await?))
}
