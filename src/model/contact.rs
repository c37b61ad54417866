//! Contact fields shared by adopters and shelters, composed rather than inherited.

use serde::{Deserialize, Serialize};

/// Name, address and reachability of a person or organization.
///
/// `name` and `zip` are required; the service layer rejects empty values. Everything else may be
/// absent and serializes as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter state code.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: String,
    /// US format, e.g. `(555) 123-4567` or `555-123-4567`.
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, zip: impl Into<String>) -> Self {
        Contact {
            name: name.into(),
            zip: zip.into(),
            ..Default::default()
        }
    }
}

/// Reference to a shelter by id. Serialized as `{"id": 3}`; other fields in a submitted object are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelterRef {
    pub id: i64,
}

impl ShelterRef {
    pub fn new(id: i64) -> Self {
        ShelterRef { id }
    }
}
