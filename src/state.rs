//! Shared application state for all routes: the storage handle and the services built over it.

use crate::service::{AdopterService, PetService, ShelterService};
use crate::store::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub adopters: AdopterService,
    pub shelters: ShelterService,
    pub pets: PetService,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        AppState {
            adopters: AdopterService::new(&storage),
            shelters: ShelterService::new(&storage),
            pets: PetService::new(&storage),
            storage,
        }
    }
}
