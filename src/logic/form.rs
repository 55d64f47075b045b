//! Bridge between the contact form's text fields and the API submission format.
//!
//! The form holds one string per field name. Tags are typed space-separated
//! in the form and travel comma-joined on the wire.

use itertools::Itertools;
use std::collections::BTreeMap;

use crate::model::{split_tags, Contact, ContactFields, Id};

pub const FULL_NAME: &str = "full_name";
pub const EMAIL: &str = "email";
pub const PHONE_NUMBER: &str = "phone_number";
pub const TAGS: &str = "tags";

/// Field names in submission order
pub const FIELD_NAMES: [&str; 4] = [FULL_NAME, EMAIL, PHONE_NUMBER, TAGS];

/// Which submission an open form performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Id),
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Create Contact",
            FormMode::Edit(_) => "Edit Contact",
        }
    }

    pub fn submit_id(&self) -> &'static str {
        match self {
            FormMode::Create => "add-contact",
            FormMode::Edit(_) => "edit-contact",
        }
    }
}

/// Field values of one open form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}

/// Lower-case the typed tags and comma-join their words
fn tags_for_wire(typed: &str) -> String {
    typed.to_lowercase().split_whitespace().join(",")
}

/// Encode the form into the `key=value&...` body the API accepts.
///
/// Empty fields are left out entirely.
pub fn encode(form: &FormState) -> String {
    FIELD_NAMES
        .iter()
        .filter_map(|&name| {
            let value = match name {
                TAGS => tags_for_wire(form.get(name)),
                _ => form.get(name).to_string(),
            };
            if value.is_empty() {
                None
            } else {
                Some(format!("{}={}", name, urlencoding::encode(&value)))
            }
        })
        .join("&")
}

/// Parse a submission body back into typed fields. Unknown keys are ignored.
pub fn decode(submission: &str) -> ContactFields {
    let mut fields = ContactFields::default();
    for pair in submission.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let raw = raw.replace('+', " ");
        let value = urlencoding::decode(&raw)
            .map(|v| v.into_owned())
            .unwrap_or(raw);
        match key {
            FULL_NAME => fields.full_name = value,
            EMAIL => fields.email = value,
            PHONE_NUMBER => fields.phone_number = value,
            TAGS => fields.tags = split_tags(&value),
            _ => {}
        }
    }
    fields
}

/// Fill the form from a stored contact; tags display space-joined
pub fn populate(form: &mut FormState, contact: &Contact) {
    form.set(FULL_NAME, contact.full_name.clone());
    form.set(EMAIL, contact.email.clone());
    form.set(PHONE_NUMBER, contact.phone_number.clone());
    form.set(TAGS, contact.tags.join(" "));
}

pub fn clear(form: &mut FormState) {
    for name in FIELD_NAMES {
        form.set(name, "");
    }
}
