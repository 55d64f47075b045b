//! Typed view-models for the contact list and the contact form.
//!
//! Rendering is a pure mapping from records to view-models; the only side
//! effects are insertions into and removals from a [`ContactContainer`].

use itertools::Itertools;
use std::fmt;

use crate::logic::form::{FormMode, FormState, FIELD_NAMES};
use crate::model::{Contact, Id};

pub const CONTACTS_CONTAINER: &str = "contacts";
pub const NO_CONTACTS_TITLE: &str = "There are no contacts";
pub const NO_CONTACTS_BUTTON: &str = "Add Contact";

/// What activating a rendered affordance requests from the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    OpenCreateForm,
    Edit(Id),
    Delete(Id),
    FilterByTag(String),
    SubmitForm,
    CancelForm,
}

/// A clickable tag on a contact entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    pub tag: String,
}

impl TagToken {
    pub fn action(&self) -> UiAction {
        UiAction::FilterByTag(self.tag.clone())
    }
}

/// One list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub contact_id: Id,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub tags: Vec<TagToken>,
}

impl ContactCard {
    pub fn edit_action(&self) -> UiAction {
        UiAction::Edit(self.contact_id)
    }

    pub fn delete_action(&self) -> UiAction {
        UiAction::Delete(self.contact_id)
    }
}

pub fn render_contact(contact: &Contact) -> ContactCard {
    ContactCard {
        contact_id: contact.id,
        name: contact.full_name.clone(),
        phone: contact.phone_number.clone(),
        email: contact.email.clone(),
        tags: contact
            .tags
            .iter()
            .map(|tag| TagToken { tag: tag.clone() })
            .collect(),
    }
}

impl fmt::Display for ContactCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[{}] {}", self.contact_id, self.name)?;
        writeln!(f, "    Phone Number: {}", self.phone)?;
        writeln!(f, "    Email: {}", self.email)?;
        write!(
            f,
            "    Tags: {}",
            self.tags.iter().map(|t| format!("#{}", t.tag)).join(" ")
        )
    }
}

/// Shown in place of the list when there is nothing to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub button_label: &'static str,
}

impl Placeholder {
    pub fn no_contacts() -> Self {
        Self {
            title: NO_CONTACTS_TITLE,
            button_label: NO_CONTACTS_BUTTON,
        }
    }

    pub fn action(&self) -> UiAction {
        UiAction::OpenCreateForm
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} with `add`)", self.title, self.button_label)
    }
}

/// Named container holding the rendered entries, or the placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactContainer {
    name: &'static str,
    cards: Vec<ContactCard>,
    placeholder: Option<Placeholder>,
}

impl ContactContainer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cards: Vec::new(),
            placeholder: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Replace the content with `contacts`, or the placeholder when there are none
    pub fn populate<'a>(&mut self, contacts: impl IntoIterator<Item = &'a Contact>) {
        self.clear();
        for contact in contacts {
            self.insert(render_contact(contact));
        }
        if self.cards.is_empty() {
            self.show_placeholder();
        }
    }

    /// Append an entry; any placeholder goes away
    pub fn insert(&mut self, card: ContactCard) {
        self.placeholder = None;
        self.cards.push(card);
    }

    /// Swap the entry for the same contact, if it is on display
    pub fn replace(&mut self, card: ContactCard) -> bool {
        match self
            .cards
            .iter_mut()
            .find(|c| c.contact_id == card.contact_id)
        {
            Some(existing) => {
                *existing = card;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Id) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.contact_id != id);
        self.cards.len() != before
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.placeholder = None;
    }

    pub fn show_placeholder(&mut self) {
        self.cards.clear();
        self.placeholder = Some(Placeholder::no_contacts());
    }

    pub fn cards(&self) -> &[ContactCard] {
        &self.cards
    }

    pub fn card(&self, id: Id) -> Option<&ContactCard> {
        self.cards.iter().find(|c| c.contact_id == id)
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub fn displayed_ids(&self) -> Vec<Id> {
        self.cards.iter().map(|c| c.contact_id).collect()
    }
}

impl fmt::Display for ContactContainer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(placeholder) = &self.placeholder {
            return write!(f, "{}", placeholder);
        }
        write!(f, "{}", self.cards.iter().join("\n"))
    }
}

/// The open form as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub submit_id: &'static str,
    pub fields: Vec<(&'static str, String)>,
    pub submit_enabled: bool,
}

pub fn render_form(mode: FormMode, state: &FormState, submitting: bool) -> FormView {
    FormView {
        title: mode.title(),
        submit_id: mode.submit_id(),
        fields: FIELD_NAMES
            .iter()
            .map(|&name| (name, state.get(name).to_string()))
            .collect(),
        submit_enabled: !submitting,
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (name, value) in &self.fields {
            writeln!(f, "    {}: {}", name, value)?;
        }
        Ok(())
    }
}
