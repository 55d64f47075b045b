use crate::model::{Contact, Id};
use crate::store::ApiResult;

/// The five calls the contacts API exposes.
///
/// Each call is a single attempt: a result on the documented success status,
/// an [`ApiError`](crate::store::ApiError) otherwise. Submission bodies are
/// the `key=value&...` strings produced by [`crate::logic::form::encode`].
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    /// `GET /contacts`, expects 200
    async fn list_contacts(&self) -> ApiResult<Vec<Contact>>;
    /// `GET /contacts/:id`, expects 200
    async fn get_contact(&self, id: Id) -> ApiResult<Contact>;
    /// `POST /contacts`, expects 201 with the stored record
    async fn create_contact(&self, submission: &str) -> ApiResult<Contact>;
    /// `PUT /contacts/:id`, expects 201; the refreshed record when the body carries one
    async fn update_contact(&self, id: Id, submission: &str) -> ApiResult<Option<Contact>>;
    /// `DELETE /contacts/:id`, expects 204
    async fn delete_contact(&self, id: Id) -> ApiResult<()>;
}
