use serde::{Deserialize, Serialize};

use crate::model::common::{deserialize_tags, nullable_string, serialize_tags};
use crate::model::Id;

/// A person record as the contacts API returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id,
    #[serde(default, deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone_number: String,
    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        serialize_with = "serialize_tags"
    )]
    pub tags: Vec<String>,
}

impl Contact {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive prefix match of the name against a trimmed query
    pub fn name_starts_with(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.full_name.to_lowercase().starts_with(&query)
    }

    /// Overwrite the editable fields, keeping the id stable
    pub fn apply(&mut self, fields: &ContactFields) {
        self.full_name = fields.full_name.clone();
        self.email = fields.email.clone();
        self.phone_number = fields.phone_number.clone();
        self.tags = fields.tags.clone();
    }

    /// Overwrite only the fields a submission carried; empty fields are
    /// never sent, so they leave the stored value alone
    pub fn merge(&mut self, fields: &ContactFields) {
        if !fields.full_name.is_empty() {
            self.full_name = fields.full_name.clone();
        }
        if !fields.email.is_empty() {
            self.email = fields.email.clone();
        }
        if !fields.phone_number.is_empty() {
            self.phone_number = fields.phone_number.clone();
        }
        if !fields.tags.is_empty() {
            self.tags = fields.tags.clone();
        }
    }

    pub fn from_fields(id: Id, fields: &ContactFields) -> Self {
        let mut contact = Self {
            id,
            full_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            tags: Vec::new(),
        };
        contact.apply(fields);
        contact
    }
}

/// The editable part of a contact, as carried by a form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub tags: Vec<String>,
}
