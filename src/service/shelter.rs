use crate::error::AppError;
use crate::model::{Adopter, AdopterFilter, Pet, PetFilter, Shelter, ShelterFilter};
use crate::service::RequestValidator;
use crate::store::{Storage, Store};

#[derive(Clone)]
pub struct ShelterService {
    storage: Storage,
}

impl ShelterService {
    pub fn new(storage: &Storage) -> Self {
        ShelterService {
            storage: storage.clone(),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Shelter>, AppError> {
        self.storage.shelters.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Shelter, AppError> {
        self.storage.shelters.find_by_id(id).await
    }

    pub async fn find_by_name_zip(&self, name: &str, zip: &str) -> Result<Vec<Shelter>, AppError> {
        let filter = ShelterFilter::NameZip {
            name: name.to_string(),
            zip: zip.to_string(),
        };
        self.storage.shelters.find_by(&filter).await
    }

    /// Adopters referencing the shelter; `NotFound` if the shelter does not exist.
    pub async fn find_adopters(&self, id: i64) -> Result<Vec<Adopter>, AppError> {
        self.storage.shelters.find_by_id(id).await?;
        self.storage.adopters.find_by(&AdopterFilter::Shelter(id)).await
    }

    /// Pets housed at the shelter; `NotFound` if the shelter does not exist.
    pub async fn find_pets(&self, id: i64) -> Result<Vec<Pet>, AppError> {
        self.storage.shelters.find_by_id(id).await?;
        self.storage.pets.find_by(&PetFilter::Shelter(id)).await
    }

    pub async fn save_shelter(&self, shelter: Shelter) -> Result<Shelter, AppError> {
        RequestValidator::validate_id(shelter.id)?;
        RequestValidator::validate_contact(&shelter.contact)?;
        let creating = shelter.id.is_none();
        let saved = self.storage.shelters.save(shelter).await?;
        tracing::info!(id = ?saved.id, created = creating, "shelter saved");
        Ok(saved)
    }

    /// Detach every adopter and pet that references the shelter, then delete it.
    pub async fn delete_shelter(&self, id: i64) -> Result<bool, AppError> {
        match self.storage.delete_shelter(id).await? {
            Some(detached) => {
                tracing::info!(id, detached_adopters = detached.adopters, detached_pets = detached.pets, "shelter deleted");
                Ok(true)
            }
            None => {
                tracing::info!(id, deleted = false, "shelter delete");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, PetType, ShelterRef};
    use crate::service::{AdopterService, PetService};

    #[tokio::test]
    async fn delete_detaches_adopters_and_pets() {
        let storage = Storage::memory();
        let shelters = ShelterService::new(&storage);
        let adopters = AdopterService::new(&storage);
        let pets = PetService::new(&storage);

        let shelter = shelters.save_shelter(Shelter::new(Contact::new("Happy Tails", "43004"))).await.unwrap();
        let sid = shelter.id.unwrap();
        let adopter = adopters
            .save_adopter(Adopter { shelter_model: Some(ShelterRef::new(sid)), ..Adopter::new(Contact::new("Jane Doe", "12345")) })
            .await
            .unwrap();
        let pet = pets
            .save_pet(Pet { shelter_model: Some(ShelterRef::new(sid)), ..Pet::new("Rex", PetType::Dog) })
            .await
            .unwrap();
        assert_eq!(shelters.find_adopters(sid).await.unwrap().len(), 1);
        assert_eq!(shelters.find_pets(sid).await.unwrap().len(), 1);

        assert!(shelters.delete_shelter(sid).await.unwrap());
        assert!(!shelters.delete_shelter(sid).await.unwrap());

        let adopter = adopters.find_by_id(adopter.id.unwrap()).await.unwrap();
        assert_eq!(adopter.shelter_model, None);
        let pet = pets.find_by_id(pet.id.unwrap()).await.unwrap();
        assert_eq!(pet.shelter_model, None);
        assert!(matches!(shelters.find_adopters(sid).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn saves_racing_a_delete_never_leave_a_dangling_reference() {
        for _ in 0..20 {
            let storage = Storage::memory();
            let shelters = ShelterService::new(&storage);
            let adopters = AdopterService::new(&storage);
            let sid = shelters.save_shelter(Shelter::new(Contact::new("Happy Tails", "43004"))).await.unwrap().id.unwrap();

            let mut saves = Vec::new();
            for i in 0..16 {
                let adopters = adopters.clone();
                saves.push(tokio::spawn(async move {
                    let a = Adopter { shelter_model: Some(ShelterRef::new(sid)), ..Adopter::new(Contact::new(&format!("A{}", i), "12345")) };
                    adopters.save_adopter(a).await
                }));
            }
            let delete = {
                let shelters = shelters.clone();
                tokio::spawn(async move { shelters.delete_shelter(sid).await })
            };
            for s in saves {
                match s.await.unwrap() {
                    Ok(_) | Err(AppError::Validation(_)) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
            assert!(delete.await.unwrap().unwrap());
            for a in adopters.find_all().await.unwrap() {
                assert_eq!(a.shelter_model, None, "adopter {:?} still points at a deleted shelter", a.id);
            }
        }
    }

    #[tokio::test]
    async fn finds_by_name_zip() {
        let shelters = ShelterService::new(&Storage::memory());
        shelters.save_shelter(Shelter::new(Contact::new("Happy Tails", "43004"))).await.unwrap();
        assert_eq!(shelters.find_by_name_zip("Happy Tails", "43004").await.unwrap().len(), 1);
        assert!(shelters.find_by_name_zip("Happy Tails", "43005").await.unwrap().is_empty());
    }
}
