//! Closed enums shared by adopters and pets. Serialized as upper-case names (`"DOG"`).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetType {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Reptile,
    Fish,
    SmallAnimal,
    Other,
}

impl PetType {
    pub const ALL: [PetType; 8] = [
        PetType::Dog,
        PetType::Cat,
        PetType::Bird,
        PetType::Rabbit,
        PetType::Reptile,
        PetType::Fish,
        PetType::SmallAnimal,
        PetType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetType::Dog => "DOG",
            PetType::Cat => "CAT",
            PetType::Bird => "BIRD",
            PetType::Rabbit => "RABBIT",
            PetType::Reptile => "REPTILE",
            PetType::Fish => "FISH",
            PetType::SmallAnimal => "SMALL_ANIMAL",
            PetType::Other => "OTHER",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdoptionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl AdoptionStatus {
    pub const ALL: [AdoptionStatus; 4] = [
        AdoptionStatus::Pending,
        AdoptionStatus::Approved,
        AdoptionStatus::Rejected,
        AdoptionStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "PENDING",
            AdoptionStatus::Approved => "APPROVED",
            AdoptionStatus::Rejected => "REJECTED",
            AdoptionStatus::Completed => "COMPLETED",
        }
    }
}

/// Path segments and stored text: case-insensitive, `-` accepted for `_`.
fn normalize(s: &str) -> String {
    s.trim().to_uppercase().replace('-', "_")
}

impl FromStr for PetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = normalize(s);
        PetType::ALL
            .into_iter()
            .find(|t| t.as_str() == n)
            .ok_or_else(|| AppError::BadRequest(format!("unknown pet type: {}", s)))
    }
}

impl FromStr for AdoptionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = normalize(s);
        AdoptionStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == n)
            .ok_or_else(|| AppError::BadRequest(format!("unknown adoption status: {}", s)))
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_segments_loosely() {
        assert_eq!("dog".parse::<PetType>().unwrap(), PetType::Dog);
        assert_eq!("Small-Animal".parse::<PetType>().unwrap(), PetType::SmallAnimal);
        assert_eq!("approved".parse::<AdoptionStatus>().unwrap(), AdoptionStatus::Approved);
        assert!(matches!("dragon".parse::<PetType>(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn serde_names_match_as_str() {
        for t in PetType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), serde_json::json!(t.as_str()));
        }
        for s in AdoptionStatus::ALL {
            assert_eq!(serde_json::to_value(s).unwrap(), serde_json::json!(s.as_str()));
        }
    }

    #[test]
    fn deserialize_rejects_lowercase() {
        assert!(serde_json::from_str::<PetType>("\"dog\"").is_err());
    }
}
