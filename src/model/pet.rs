//! Pet record.

use crate::model::{PetType, ShelterRef};
use crate::store::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub pet_type: PetType,
    #[serde(default)]
    pub breed: Option<String>,
    /// Age in whole years.
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub shelter_model: Option<ShelterRef>,
}

impl Pet {
    pub fn new(name: impl Into<String>, pet_type: PetType) -> Self {
        Pet {
            id: None,
            name: name.into(),
            pet_type,
            breed: None,
            age: None,
            notes: None,
            image_url: None,
            shelter_model: None,
        }
    }

    pub fn shelter_id(&self) -> Option<i64> {
        self.shelter_model.map(|s| s.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PetFilter {
    PetType(PetType),
    Shelter(i64),
}

impl Entity for Pet {
    type Filter = PetFilter;
    const KIND: &'static str = "pet";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &PetFilter) -> bool {
        match filter {
            PetFilter::PetType(t) => self.pet_type == *t,
            PetFilter::Shelter(id) => self.shelter_id() == Some(*id),
        }
    }
}
