use super::backend::{Collection, StorageBackend};
use crate::error::{Result, VaultError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the vault is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    documents: RefCell<HashMap<Collection, BTreeMap<String, Value>>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to plant a raw document, bypassing every check.
    pub fn insert_raw(&self, collection: Collection, id: &str, document: Value) {
        self.documents
            .borrow_mut()
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document);
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(VaultError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_collection(&self, collection: Collection) -> Result<BTreeMap<String, Value>> {
        let documents = self.documents.borrow();
        Ok(documents.get(&collection).cloned().unwrap_or_default())
    }

    fn read_document(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let documents = self.documents.borrow();
        Ok(documents.get(&collection).and_then(|c| c.get(id)).cloned())
    }

    fn write_document(&self, collection: Collection, id: &str, document: &Value) -> Result<()> {
        self.check_writable()?;
        self.insert_raw(collection, id, document.clone());
        Ok(())
    }

    fn remove_document(&self, collection: Collection, id: &str) -> Result<bool> {
        self.check_writable()?;
        let mut documents = self.documents.borrow_mut();
        Ok(documents
            .get_mut(&collection)
            .and_then(|c| c.remove(id))
            .is_some())
    }

    fn clear_collection(&self, collection: Collection) -> Result<()> {
        self.check_writable()?;
        self.documents.borrow_mut().remove(&collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_read_remove() {
        let backend = MemBackend::new();
        backend
            .write_document(Collection::Nodes, "text.a", &json!({"x": 1}))
            .unwrap();
        assert_eq!(
            backend.read_document(Collection::Nodes, "text.a").unwrap(),
            Some(json!({"x": 1}))
        );
        assert_eq!(backend.read_document(Collection::Links, "text.a").unwrap(), None);
        assert!(backend.remove_document(Collection::Nodes, "text.a").unwrap());
        assert!(!backend.remove_document(Collection::Nodes, "text.a").unwrap());
    }

    #[test]
    fn simulated_write_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let err = backend
            .write_document(Collection::Anchors, "anchor.a", &json!({}))
            .unwrap_err();
        assert!(matches!(err, VaultError::Store(_)));
        assert!(!err.is_expected());
    }

    #[test]
    fn clear_only_touches_one_collection() {
        let backend = MemBackend::new();
        backend.insert_raw(Collection::Nodes, "text.a", json!({}));
        backend.insert_raw(Collection::Links, "link.a", json!({}));
        backend.clear_collection(Collection::Nodes).unwrap();
        assert!(backend.load_collection(Collection::Nodes).unwrap().is_empty());
        assert_eq!(backend.load_collection(Collection::Links).unwrap().len(), 1);
    }
}
