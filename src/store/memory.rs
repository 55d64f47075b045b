use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::logic::form;
use crate::model::{Contact, Id};
use crate::store::{ApiError, ApiResult, ContactStore};

#[derive(Debug, Default)]
struct Inner {
    contacts: BTreeMap<Id, Contact>,
    next_id: Id,
}

/// In-memory [`ContactStore`] that answers with the same statuses as the API.
///
/// Useful offline and as the backing store for controller tests. While
/// offline every call fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    inner: Arc<RwLock<Inner>>,
    offline: Arc<AtomicBool>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; ids are kept and new ids continue after the largest one
    pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let mut inner = Inner::default();
        for contact in contacts {
            inner.next_id = inner.next_id.max(contact.id);
            inner.contacts.insert(contact.id, contact);
        }
        Self {
            inner: Arc::new(RwLock::new(inner)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<Contact> {
        self.inner.read().await.contacts.values().cloned().collect()
    }

    fn check_online(&self) -> ApiResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ApiError::Transport("contacts store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn not_found(expected: u16) -> ApiError {
        ApiError::UnexpectedStatus {
            expected,
            actual: 404,
        }
    }
}

#[async_trait::async_trait]
impl ContactStore for MemoryContactStore {
    async fn list_contacts(&self) -> ApiResult<Vec<Contact>> {
        self.check_online()?;
        Ok(self.snapshot().await)
    }

    async fn get_contact(&self, id: Id) -> ApiResult<Contact> {
        self.check_online()?;
        let inner = self.inner.read().await;
        inner
            .contacts
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(200))
    }

    async fn create_contact(&self, submission: &str) -> ApiResult<Contact> {
        self.check_online()?;
        let fields = form::decode(submission);
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let contact = Contact::from_fields(inner.next_id, &fields);
        inner.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update_contact(&self, id: Id, submission: &str) -> ApiResult<Option<Contact>> {
        self.check_online()?;
        let fields = form::decode(submission);
        let mut inner = self.inner.write().await;
        let contact = inner
            .contacts
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(201))?;
        contact.merge(&fields);
        Ok(Some(contact.clone()))
    }

    async fn delete_contact(&self, id: Id) -> ApiResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        inner
            .contacts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(204))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryContactStore::new();
        let ann = store
            .create_contact("full_name=Ann&tags=vip")
            .await
            .unwrap();
        let bob = store.create_contact("full_name=Bob").await.unwrap();

        assert_eq!(ann.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(ann.tags, vec!["vip"]);
        assert_eq!(store.list_contacts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_contact_reports_404() {
        let store = MemoryContactStore::new();
        let err = store.delete_contact(9).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryContactStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.list_contacts().await,
            Err(ApiError::Transport(_))
        ));
    }
}
