pub mod controller;
pub mod form;
pub mod render;

pub use controller::{
    ContactListController, ContactState, FormSession, Outcome, PendingSubmission, View,
    DELETE_PROMPT,
};
pub use form::{FormMode, FormState};
pub use render::{
    render_contact, render_form, ContactCard, ContactContainer, FormView, Placeholder, TagToken,
    UiAction,
};
