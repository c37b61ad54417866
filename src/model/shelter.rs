//! Shelter record: the organization adopters and pets may belong to.

use crate::model::Contact;
use crate::store::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Shelter {
    pub fn new(contact: Contact) -> Self {
        Shelter {
            contact,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShelterFilter {
    NameZip { name: String, zip: String },
}

impl Entity for Shelter {
    type Filter = ShelterFilter;
    const KIND: &'static str = "shelter";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &ShelterFilter) -> bool {
        match filter {
            ShelterFilter::NameZip { name, zip } => self.contact.name == *name && self.contact.zip == *zip,
        }
    }
}
