use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Contact, Id};

/// Derived mapping from tag name to the contacts carrying it.
///
/// The index is a view over the controller's contact list: a contact id sits
/// under tag `T` exactly when `T` is one of that contact's tags and the
/// contact is still in the list. Buckets that become empty are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    buckets: BTreeMap<String, BTreeSet<Id>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from scratch
    pub fn from_contacts<'a>(contacts: impl IntoIterator<Item = &'a Contact>) -> Self {
        let mut index = Self::new();
        for contact in contacts {
            index.insert(contact);
        }
        index
    }

    /// Add a contact under each of its tags
    pub fn insert(&mut self, contact: &Contact) {
        for tag in &contact.tags {
            self.buckets
                .entry(tag.clone())
                .or_default()
                .insert(contact.id);
        }
    }

    /// Remove a contact id from every bucket
    pub fn remove(&mut self, id: Id) {
        self.buckets.retain(|_, ids| {
            ids.remove(&id);
            !ids.is_empty()
        });
    }

    /// Re-index a contact whose tags may have changed
    pub fn replace(&mut self, contact: &Contact) {
        self.remove(contact.id);
        self.insert(contact);
    }

    pub fn contacts_for(&self, tag: &str) -> Option<&BTreeSet<Id>> {
        self.buckets.get(tag)
    }

    pub fn contains(&self, tag: &str, id: Id) -> bool {
        self.buckets
            .get(tag)
            .map(|ids| ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(|tag| tag.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContactFields;

    fn contact(id: Id, name: &str, tags: &[&str]) -> Contact {
        Contact::from_fields(
            id,
            &ContactFields {
                full_name: name.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_insert_is_idempotent_per_contact() {
        let ann = contact(7, "Ann", &["vip", "work"]);
        let mut index = TagIndex::new();
        index.insert(&ann);
        index.insert(&ann);

        assert_eq!(index.contacts_for("vip").map(|ids| ids.len()), Some(1));
        assert!(index.contains("work", 7));
        assert_eq!(index.tags().collect::<Vec<_>>(), vec!["vip", "work"]);
    }

    #[test]
    fn test_remove_clears_every_bucket() {
        let ann = contact(1, "Ann", &["vip", "work"]);
        let bob = contact(2, "Bob", &["work"]);
        let mut index = TagIndex::from_contacts([&ann, &bob]);

        index.remove(1);

        assert!(index.contacts_for("vip").is_none());
        assert!(!index.contains("work", 1));
        assert!(index.contains("work", 2));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_replace_moves_contact_between_buckets() {
        let mut ann = contact(1, "Ann", &["vip"]);
        let mut index = TagIndex::from_contacts([&ann]);

        ann.tags = vec!["family".to_string()];
        index.replace(&ann);

        assert!(index.contacts_for("vip").is_none());
        assert!(index.contains("family", 1));
    }
}
