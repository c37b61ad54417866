use crate::error::AppError;
use crate::model::{Pet, PetFilter, PetType, Shelter};
use crate::service::{check_shelter_ref, RequestValidator};
use crate::store::{Storage, Store};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn Store<Pet>>,
    shelters: Arc<dyn Store<Shelter>>,
    shelter_links: Arc<RwLock<()>>,
}

impl PetService {
    pub fn new(storage: &Storage) -> Self {
        PetService {
            pets: storage.pets.clone(),
            shelters: storage.shelters.clone(),
            shelter_links: storage.shelter_links.clone(),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Pet>, AppError> {
        self.pets.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Pet, AppError> {
        self.pets.find_by_id(id).await
    }

    pub async fn find_by_pet_type(&self, pet_type: PetType) -> Result<Vec<Pet>, AppError> {
        self.pets.find_by(&PetFilter::PetType(pet_type)).await
    }

    /// Pets pointing at `shelter_id`. Empty, not an error, when the shelter is unknown.
    pub async fn find_by_shelter(&self, shelter_id: i64) -> Result<Vec<Pet>, AppError> {
        self.pets.find_by(&PetFilter::Shelter(shelter_id)).await
    }

    pub async fn save_pet(&self, pet: Pet) -> Result<Pet, AppError> {
        RequestValidator::validate_id(pet.id)?;
        RequestValidator::validate_pet(&pet)?;
        let _links = self.shelter_links.read().await;
        check_shelter_ref(self.shelters.as_ref(), pet.shelter_model).await?;
        let creating = pet.id.is_none();
        let saved = self.pets.save(pet).await?;
        tracing::info!(id = ?saved.id, created = creating, "pet saved");
        Ok(saved)
    }

    pub async fn delete_pet(&self, id: i64) -> Result<bool, AppError> {
        let deleted = self.pets.delete_by_id(id).await?;
        tracing::info!(id, deleted, "pet delete");
        Ok(deleted)
    }
}
