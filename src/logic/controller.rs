use log::{debug, info, warn};
use std::sync::Arc;

use crate::logic::form::{self, FormMode, FormState};
use crate::logic::render::{
    render_contact, render_form, ContactContainer, FormView, UiAction, CONTACTS_CONTAINER,
};
use crate::model::{Contact, Id, TagIndex};
use crate::store::ContactStore;

pub const DELETE_PROMPT: &str = "Do you want to delete the contact?";

/// What a controller operation ended up doing.
///
/// Remote failures never surface as errors: they are logged and reported as
/// `Failed`, with the view left as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed and its effects were applied
    Applied,
    /// The user answered "no" to the confirmation
    Declined,
    /// The remote call failed; nothing changed
    Failed,
    /// The response belonged to a form session that is no longer open
    Discarded,
    /// Not allowed in the current view state, e.g. a second submission
    Rejected,
}

/// Which of the two exclusive views is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Form,
}

/// Contacts plus the tag index derived from them
#[derive(Debug, Clone, Default)]
pub struct ContactState {
    contacts: Vec<Contact>,
    tags: TagIndex,
}

impl ContactState {
    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        let tags = TagIndex::from_contacts(&contacts);
        Self { contacts, tags }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn get(&self, id: Id) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn add(&mut self, contact: Contact) {
        self.tags.insert(&contact);
        self.contacts.push(contact);
    }

    /// Replace the stored record with the same id; returns the stored copy
    pub fn update(&mut self, contact: Contact) -> Option<&Contact> {
        let slot = self.contacts.iter_mut().find(|c| c.id == contact.id)?;
        *slot = contact;
        self.tags.replace(slot);
        Some(&*slot)
    }

    pub fn remove(&mut self, id: Id) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        self.tags.remove(id);
        self.contacts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }
}

/// The single open form
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    state: FormState,
    generation: u64,
    submitting: bool,
}

impl FormSession {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

/// A submission taken from a form session, awaiting its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub generation: u64,
    pub mode: FormMode,
    pub body: String,
}

/// Owns the contact list, keeps it in sync with the API, and renders it.
pub struct ContactListController<S: ContactStore> {
    store: Arc<S>,
    state: ContactState,
    container: ContactContainer,
    active_form: Option<FormSession>,
    generation: u64,
}

impl<S: ContactStore> ContactListController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: ContactState::default(),
            container: ContactContainer::new(CONTACTS_CONTAINER),
            active_form: None,
            generation: 0,
        }
    }

    pub fn store(&self) -> Arc<S> {
        self.store.clone()
    }

    pub fn contacts(&self) -> &[Contact] {
        self.state.contacts()
    }

    pub fn tag_index(&self) -> &TagIndex {
        self.state.tags()
    }

    pub fn container(&self) -> &ContactContainer {
        &self.container
    }

    pub fn active_form(&self) -> Option<&FormSession> {
        self.active_form.as_ref()
    }

    pub fn view(&self) -> View {
        if self.active_form.is_some() {
            View::Form
        } else {
            View::List
        }
    }

    pub fn form_view(&self) -> Option<FormView> {
        self.active_form
            .as_ref()
            .map(|s| render_form(s.mode, &s.state, s.submitting))
    }

    /// Field values of the open form, for the user to type into
    pub fn form_state_mut(&mut self) -> Option<&mut FormState> {
        self.active_form.as_mut().map(|s| &mut s.state)
    }

    /// Load every contact and render the list. A failed load leaves the list empty.
    pub async fn initialize(&mut self) -> Outcome {
        let (contacts, outcome) = match self.store.list_contacts().await {
            Ok(contacts) => {
                info!("loaded {} contacts", contacts.len());
                (contacts, Outcome::Applied)
            }
            Err(err) => {
                warn!("failed to load contacts: {}", err);
                (Vec::new(), Outcome::Failed)
            }
        };
        self.state = ContactState::from_contacts(contacts);
        self.show_all();
        outcome
    }

    /// Re-render the full, unfiltered list
    pub fn show_all(&mut self) -> &ContactContainer {
        self.container.populate(self.state.contacts());
        &self.container
    }

    /// Create a contact from form fields and close the form on success
    pub async fn create_contact(&mut self, fields: &FormState) -> Outcome {
        let outcome = self.send_create(&form::encode(fields)).await;
        if outcome == Outcome::Applied {
            self.close_form();
        }
        outcome
    }

    /// Send new field values for `id`; the cached record is refreshed on success
    pub async fn update_contact(&mut self, id: Id, fields: &FormState) -> Outcome {
        self.send_update(id, &form::encode(fields)).await
    }

    /// Delete `id` once `confirm` agrees
    pub async fn delete_contact<F>(&mut self, id: Id, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_PROMPT) {
            debug!("deletion of contact {} declined", id);
            return Outcome::Declined;
        }

        match self.store.delete_contact(id).await {
            Ok(()) => {
                self.state.remove(id);
                self.container.remove(id);
                if self.state.is_empty() {
                    self.container.show_placeholder();
                }
                info!("deleted contact {}", id);
                Outcome::Applied
            }
            Err(err) => {
                warn!("failed to delete contact {}: {}", id, err);
                Outcome::Failed
            }
        }
    }

    /// Show contacts whose name starts with `query`, ignoring case and
    /// surrounding whitespace. The contact list itself is untouched.
    pub fn search(&mut self, query: &str) -> &ContactContainer {
        let matches = self
            .state
            .contacts()
            .iter()
            .filter(|c| c.name_starts_with(query));
        self.container.populate(matches);
        &self.container
    }

    /// Show the contacts carrying `tag`, in list order
    pub fn filter_by_tag(&mut self, tag: &str) -> &ContactContainer {
        let state = &self.state;
        let matches = state
            .contacts()
            .iter()
            .filter(|c| state.tags().contains(tag, c.id));
        self.container.populate(matches);
        &self.container
    }

    /// Flip between the list and a fresh form in `mode`.
    ///
    /// Opening always starts a new session; closing discards the open one.
    pub fn toggle_form_view(&mut self, mode: FormMode) -> View {
        if self.active_form.is_some() {
            self.close_form();
        } else {
            self.generation += 1;
            self.active_form = Some(FormSession {
                mode,
                state: FormState::new(),
                generation: self.generation,
                submitting: false,
            });
        }
        self.view()
    }

    pub fn cancel_form(&mut self) -> Outcome {
        if self.active_form.is_none() {
            return Outcome::Rejected;
        }
        self.close_form();
        Outcome::Applied
    }

    /// Open the edit form for `id` and fill it from the API
    pub async fn open_edit_form(&mut self, id: Id) -> Outcome {
        if self.active_form.is_some() {
            debug!("edit of contact {} ignored: a form is already open", id);
            return Outcome::Rejected;
        }
        self.toggle_form_view(FormMode::Edit(id));
        let generation = self.generation;

        match self.store.get_contact(id).await {
            Ok(contact) => match self.session_mut(generation) {
                Some(session) => {
                    form::populate(&mut session.state, &contact);
                    Outcome::Applied
                }
                None => {
                    debug!("discarding contact {} for a closed edit form", id);
                    Outcome::Discarded
                }
            },
            Err(err) => {
                warn!("failed to load contact {} for editing: {}", id, err);
                Outcome::Failed
            }
        }
    }

    /// Submit the open form: create or update according to its mode
    pub async fn submit_form(&mut self) -> Outcome {
        let Some(pending) = self.begin_submit() else {
            return Outcome::Rejected;
        };
        let outcome = self.send_submission(&pending).await;
        self.finish_submit(&pending, outcome)
    }

    /// Take the open form's fields for submission and disable its submit.
    ///
    /// Returns `None` when no form is open or a submission is outstanding.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        let session = match self.active_form.as_mut() {
            Some(session) => session,
            None => {
                debug!("submit ignored: no form is open");
                return None;
            }
        };
        if session.submitting {
            debug!("submit ignored: a submission is already outstanding");
            return None;
        }
        session.submitting = true;
        Some(PendingSubmission {
            generation: session.generation,
            mode: session.mode,
            body: form::encode(&session.state),
        })
    }

    /// Issue the request for a pending submission and apply its data
    pub async fn send_submission(&mut self, pending: &PendingSubmission) -> Outcome {
        match pending.mode {
            FormMode::Create => self.send_create(&pending.body).await,
            FormMode::Edit(id) => self.send_update(id, &pending.body).await,
        }
    }

    /// Settle the form that issued `pending`.
    ///
    /// On success the form is cleared and closed; on failure it stays open
    /// with submit enabled again. A session that has since been replaced is
    /// left alone.
    pub fn finish_submit(&mut self, pending: &PendingSubmission, outcome: Outcome) -> Outcome {
        let Some(session) = self.session_mut(pending.generation) else {
            debug!(
                "discarding completion for form generation {}",
                pending.generation
            );
            return Outcome::Discarded;
        };
        session.submitting = false;
        if outcome == Outcome::Applied {
            form::clear(&mut session.state);
            self.close_form();
        }
        outcome
    }

    /// Route an activated affordance to its operation
    pub async fn dispatch<F>(&mut self, action: UiAction, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        match action {
            UiAction::OpenCreateForm => {
                if self.active_form.is_some() {
                    return Outcome::Rejected;
                }
                self.toggle_form_view(FormMode::Create);
                Outcome::Applied
            }
            UiAction::Edit(id) => self.open_edit_form(id).await,
            UiAction::Delete(id) => self.delete_contact(id, confirm).await,
            UiAction::FilterByTag(tag) => {
                self.filter_by_tag(&tag);
                Outcome::Applied
            }
            UiAction::SubmitForm => self.submit_form().await,
            UiAction::CancelForm => self.cancel_form(),
        }
    }

    async fn send_create(&mut self, body: &str) -> Outcome {
        match self.store.create_contact(body).await {
            Ok(contact) => {
                info!("created contact {} ({})", contact.id, contact.full_name);
                self.state.add(contact);
                self.show_all();
                Outcome::Applied
            }
            Err(err) => {
                warn!("failed to create contact: {}", err);
                Outcome::Failed
            }
        }
    }

    async fn send_update(&mut self, id: Id, body: &str) -> Outcome {
        let refreshed = match self.store.update_contact(id, body).await {
            Ok(Some(contact)) => contact,
            Ok(None) => match self.state.get(id) {
                // No record in the response: apply what was submitted
                Some(cached) => {
                    let mut contact = cached.clone();
                    contact.merge(&form::decode(body));
                    contact
                }
                None => {
                    debug!("updated contact {} is not in the local list", id);
                    return Outcome::Applied;
                }
            },
            Err(err) => {
                warn!("failed to update contact {}: {}", id, err);
                return Outcome::Failed;
            }
        };

        match self.state.update(refreshed) {
            Some(stored) => {
                self.container.replace(render_contact(stored));
                info!("updated contact {}", id);
            }
            None => debug!("updated contact {} is not in the local list", id),
        }
        Outcome::Applied
    }

    fn session_mut(&mut self, generation: u64) -> Option<&mut FormSession> {
        self.active_form
            .as_mut()
            .filter(|s| s.generation == generation)
    }

    fn close_form(&mut self) {
        self.active_form = None;
    }
}
