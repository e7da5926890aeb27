use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// The three document collections the vault keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Nodes,
    Anchors,
    Links,
}

pub const COLLECTIONS: &[Collection] = &[Collection::Nodes, Collection::Anchors, Collection::Links];

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Nodes => "nodes",
            Collection::Anchors => "anchors",
            Collection::Links => "links",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract interface for raw document I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while VaultStore handles the "what" (typed documents, derived children,
/// search index, doctor).
///
/// Documents are untyped JSON keyed by their id. Every write is a single
/// document and must be atomic on its own; nothing spans documents.
pub trait StorageBackend {
    /// Load every document of a collection, keyed by id.
    fn load_collection(&self, collection: Collection) -> Result<BTreeMap<String, Value>>;

    /// Read one document.
    /// Returns Ok(None) if it does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_document(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Create or replace one document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_document(&self, collection: Collection, id: &str, document: &Value) -> Result<()>;

    /// Remove one document. Returns whether it existed; removing a missing
    /// document is not an error.
    fn remove_document(&self, collection: Collection, id: &str) -> Result<bool>;

    /// Remove every document of a collection.
    fn clear_collection(&self, collection: Collection) -> Result<()>;
}
