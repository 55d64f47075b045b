use log::{debug, warn};
use reqwest::{header, Client, Response, StatusCode};

use crate::model::{Contact, Id};
use crate::store::{ApiError, ApiResult, ContactStore};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// [`ContactStore`] backed by the contacts REST API
#[derive(Debug, Clone)]
pub struct HttpContactStore {
    client: Client,
    base_url: String,
}

impl HttpContactStore {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/contacts", self.base_url)
    }

    fn contact_url(&self, id: Id) -> String {
        format!("{}/contacts/{}", self.base_url, id)
    }

    fn expect_status(response: &Response, expected: StatusCode) -> ApiResult<()> {
        let actual = response.status();
        if actual == expected {
            Ok(())
        } else {
            warn!(
                "contacts API {} returned {} (expected {})",
                response.url(),
                actual.as_u16(),
                expected.as_u16()
            );
            Err(ApiError::UnexpectedStatus {
                expected: expected.as_u16(),
                actual: actual.as_u16(),
            })
        }
    }
}

#[async_trait::async_trait]
impl ContactStore for HttpContactStore {
    async fn list_contacts(&self) -> ApiResult<Vec<Contact>> {
        let response = self.client.get(self.collection_url()).send().await?;
        Self::expect_status(&response, StatusCode::OK)?;
        let contacts: Vec<Contact> = response.json().await?;
        debug!("fetched {} contacts", contacts.len());
        Ok(contacts)
    }

    async fn get_contact(&self, id: Id) -> ApiResult<Contact> {
        let response = self.client.get(self.contact_url(id)).send().await?;
        Self::expect_status(&response, StatusCode::OK)?;
        Ok(response.json().await?)
    }

    async fn create_contact(&self, submission: &str) -> ApiResult<Contact> {
        let response = self
            .client
            .post(self.collection_url())
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(submission.to_string())
            .send()
            .await?;
        Self::expect_status(&response, StatusCode::CREATED)?;
        Ok(response.json().await?)
    }

    async fn update_contact(&self, id: Id, submission: &str) -> ApiResult<Option<Contact>> {
        let response = self
            .client
            .put(self.contact_url(id))
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(submission.to_string())
            .send()
            .await?;
        // The API acknowledges updates with 201, not 200
        Self::expect_status(&response, StatusCode::CREATED)?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Contact>(&body) {
            Ok(contact) => Ok(Some(contact)),
            Err(err) => {
                debug!("update of contact {} returned a non-contact body: {}", id, err);
                Ok(None)
            }
        }
    }

    async fn delete_contact(&self, id: Id) -> ApiResult<()> {
        let response = self.client.delete(self.contact_url(id)).send().await?;
        Self::expect_status(&response, StatusCode::NO_CONTENT)
    }
}
