#![allow(dead_code)]

//! Fake contacts backend served by axum on an ephemeral port.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use contact_manager::logic::form;
use contact_manager::{Contact, Id};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug)]
struct BackendState {
    contacts: BTreeMap<Id, Contact>,
    next_id: Id,
    update_status: StatusCode,
    update_returns_body: bool,
    submissions: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Backend {
    state: Arc<Mutex<BackendState>>,
}

impl Backend {
    pub fn new() -> Self {
        Self::with_contacts(Vec::new())
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id).max().unwrap_or(0);
        Self {
            state: Arc::new(Mutex::new(BackendState {
                contacts: contacts.into_iter().map(|c| (c.id, c)).collect(),
                next_id,
                update_status: StatusCode::CREATED,
                update_returns_body: true,
                submissions: Vec::new(),
            })),
        }
    }

    pub async fn set_update_status(&self, status: StatusCode) {
        self.state.lock().await.update_status = status;
    }

    pub async fn set_update_returns_body(&self, returns_body: bool) {
        self.state.lock().await.update_returns_body = returns_body;
    }

    pub async fn contacts(&self) -> Vec<Contact> {
        self.state.lock().await.contacts.values().cloned().collect()
    }

    /// (content type, body) of every POST/PUT received
    pub async fn submissions(&self) -> Vec<(String, String)> {
        self.state.lock().await.submissions.clone()
    }

    /// Serve on 127.0.0.1 and return the API base URL
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }
}

fn router(backend: Backend) -> Router {
    let contacts = Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .with_state(backend);
    Router::new().nest("/api", contacts)
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn list_contacts(State(backend): State<Backend>) -> Json<Vec<Contact>> {
    Json(backend.contacts().await)
}

async fn get_contact(
    State(backend): State<Backend>,
    Path(id): Path<Id>,
) -> Result<Json<Contact>, StatusCode> {
    let state = backend.state.lock().await;
    state
        .contacts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_contact(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Contact>) {
    let mut state = backend.state.lock().await;
    state.submissions.push((content_type(&headers), body.clone()));
    state.next_id += 1;
    let contact = Contact::from_fields(state.next_id, &form::decode(&body));
    state.contacts.insert(contact.id, contact.clone());
    (StatusCode::CREATED, Json(contact))
}

async fn update_contact(
    State(backend): State<Backend>,
    Path(id): Path<Id>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = backend.state.lock().await;
    state.submissions.push((content_type(&headers), body.clone()));
    let status = state.update_status;
    let returns_body = state.update_returns_body;
    let Some(contact) = state.contacts.get_mut(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    contact.merge(&form::decode(&body));
    if returns_body {
        (status, Json(contact.clone())).into_response()
    } else {
        status.into_response()
    }
}

async fn delete_contact(State(backend): State<Backend>, Path(id): Path<Id>) -> StatusCode {
    let mut state = backend.state.lock().await;
    match state.contacts.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

pub fn contact(id: Id, name: &str, tags: &[&str]) -> Contact {
    Contact::from_fields(
        id,
        &contact_manager::ContactFields {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "555-0100".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        },
    )
}
