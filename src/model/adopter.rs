//! Adopter record and its lookup filters.

use crate::model::{AdoptionStatus, Contact, PetType, ShelterRef};
use crate::store::Entity;
use serde::{Deserialize, Serialize};

/// A person seeking to adopt a pet. Contact fields are flattened into the JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adopter {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(default)]
    pub preferred_pet_type: Option<PetType>,
    #[serde(default)]
    pub adoption_status: Option<AdoptionStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub shelter_model: Option<ShelterRef>,
}

impl Adopter {
    pub fn new(contact: Contact) -> Self {
        Adopter {
            contact,
            ..Default::default()
        }
    }

    pub fn shelter_id(&self) -> Option<i64> {
        self.shelter_model.map(|s| s.id)
    }
}

/// Exact-match lookups supported for adopters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdopterFilter {
    NameZip { name: String, zip: String },
    PreferredPetTypeZip { pet_type: PetType, zip: String },
    Shelter(i64),
}

impl Entity for Adopter {
    type Filter = AdopterFilter;
    const KIND: &'static str = "adopter";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &AdopterFilter) -> bool {
        match filter {
            AdopterFilter::NameZip { name, zip } => self.contact.name == *name && self.contact.zip == *zip,
            AdopterFilter::PreferredPetTypeZip { pet_type, zip } => {
                self.preferred_pet_type == Some(*pet_type) && self.contact.zip == *zip
            }
            AdopterFilter::Shelter(id) => self.shelter_id() == Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> Adopter {
        Adopter {
            preferred_pet_type: Some(PetType::Dog),
            adoption_status: Some(AdoptionStatus::Pending),
            ..Adopter::new(Contact::new("Jane Doe", "12345"))
        }
    }

    #[test]
    fn serializes_flat_camel_case() {
        let mut a = jane();
        a.id = Some(3);
        a.shelter_model = Some(ShelterRef::new(9));
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["id"], json!(3));
        assert_eq!(v["name"], json!("Jane Doe"));
        assert_eq!(v["zip"], json!("12345"));
        assert_eq!(v["preferredPetType"], json!("DOG"));
        assert_eq!(v["adoptionStatus"], json!("PENDING"));
        assert_eq!(v["shelterModel"], json!({"id": 9}));
        assert!(v.get("imageURL").is_some());
        assert!(v.get("addressLine1").is_some());
        assert!(v.get("contact").is_none());
    }

    #[test]
    fn deserializes_without_id_and_ignores_extra_shelter_fields() {
        let a: Adopter = serde_json::from_value(json!({
            "name": "Jane Doe",
            "zip": "12345",
            "preferredPetType": "CAT",
            "shelterModel": {"id": 2, "name": "Happy Tails"}
        }))
        .unwrap();
        assert_eq!(a.id, None);
        assert_eq!(a.preferred_pet_type, Some(PetType::Cat));
        assert_eq!(a.shelter_id(), Some(2));
        assert_eq!(a.contact.email, None);
    }

    #[test]
    fn unknown_enum_fails_to_deserialize() {
        let r: Result<Adopter, _> = serde_json::from_value(json!({
            "name": "Jane Doe",
            "zip": "12345",
            "preferredPetType": "DRAGON"
        }));
        assert!(r.is_err());
    }

    #[test]
    fn filters_are_exact() {
        let a = jane();
        let by_name = |n: &str, z: &str| AdopterFilter::NameZip { name: n.into(), zip: z.into() };
        assert!(a.matches(&by_name("Jane Doe", "12345")));
        assert!(!a.matches(&by_name("Jane", "12345")));
        assert!(!a.matches(&by_name("jane doe", "12345")));
        assert!(!a.matches(&by_name("Jane Doe", "12346")));
        assert!(a.matches(&AdopterFilter::PreferredPetTypeZip { pet_type: PetType::Dog, zip: "12345".into() }));
        assert!(!a.matches(&AdopterFilter::PreferredPetTypeZip { pet_type: PetType::Cat, zip: "12345".into() }));
        assert!(!a.matches(&AdopterFilter::Shelter(1)));
    }
}
