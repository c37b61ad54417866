use crate::error::AppError;
use crate::model::{Adopter, AdopterFilter, PetType, Shelter};
use crate::service::{check_shelter_ref, RequestValidator};
use crate::store::{Storage, Store};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AdopterService {
    adopters: Arc<dyn Store<Adopter>>,
    shelters: Arc<dyn Store<Shelter>>,
    shelter_links: Arc<RwLock<()>>,
}

impl AdopterService {
    pub fn new(storage: &Storage) -> Self {
        AdopterService {
            adopters: storage.adopters.clone(),
            shelters: storage.shelters.clone(),
            shelter_links: storage.shelter_links.clone(),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Adopter>, AppError> {
        self.adopters.find_all().await
    }

    /// `AppError::NotFound` when no adopter has this id.
    pub async fn find_by_id(&self, id: i64) -> Result<Adopter, AppError> {
        self.adopters.find_by_id(id).await
    }

    pub async fn find_by_name_zip(&self, name: &str, zip: &str) -> Result<Vec<Adopter>, AppError> {
        let filter = AdopterFilter::NameZip {
            name: name.to_string(),
            zip: zip.to_string(),
        };
        self.adopters.find_by(&filter).await
    }

    pub async fn find_by_preferred_pet_type_zip(&self, pet_type: PetType, zip: &str) -> Result<Vec<Adopter>, AppError> {
        let filter = AdopterFilter::PreferredPetTypeZip {
            pet_type,
            zip: zip.to_string(),
        };
        self.adopters.find_by(&filter).await
    }

    /// Create when `id` is unset, otherwise replace the stored adopter in full. Last write wins.
    pub async fn save_adopter(&self, adopter: Adopter) -> Result<Adopter, AppError> {
        RequestValidator::validate_id(adopter.id)?;
        RequestValidator::validate_contact(&adopter.contact)?;
        let _links = self.shelter_links.read().await;
        check_shelter_ref(self.shelters.as_ref(), adopter.shelter_model).await?;
        let creating = adopter.id.is_none();
        let saved = self.adopters.save(adopter).await?;
        tracing::info!(id = ?saved.id, created = creating, "adopter saved");
        Ok(saved)
    }

    /// Whether an adopter was removed. The shelter it pointed at is left alone.
    pub async fn delete_adopter(&self, id: i64) -> Result<bool, AppError> {
        let deleted = self.adopters.delete_by_id(id).await?;
        tracing::info!(id, deleted, "adopter delete");
        Ok(deleted)
    }
}
