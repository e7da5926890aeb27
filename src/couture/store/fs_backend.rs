use super::backend::{Collection, StorageBackend};
use crate::error::{Result, VaultError};
use crate::model::id::is_valid_id;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const DOCUMENT_EXT: &str = "json";

/// One JSON file per document:
///
/// ```text
/// <root>/
/// ├── nodes/<nodeId>.json
/// ├── anchors/<anchorId>.json
/// └── links/<linkId>.json
/// ```
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.as_str())
    }

    /// `None` for ids that cannot name a file. No document can exist under
    /// such an id, so reads and removals treat it as absent.
    fn document_path(&self, collection: Collection, id: &str) -> Option<PathBuf> {
        if !is_valid_id(id) {
            debug!(%collection, id, "id cannot name a document");
            return None;
        }
        Some(
            self.collection_dir(collection)
                .join(format!("{}.{}", id, DOCUMENT_EXT)),
        )
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_collection(&self, collection: Collection) -> Result<BTreeMap<String, Value>> {
        let dir = self.collection_dir(collection);
        let mut documents = BTreeMap::new();
        if !dir.exists() {
            return Ok(documents);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)?;
            let document: Value = serde_json::from_str(&content)?;
            documents.insert(id.to_string(), document);
        }
        Ok(documents)
    }

    fn read_document(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let Some(path) = self.document_path(collection, id) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_document(&self, collection: Collection, id: &str, document: &Value) -> Result<()> {
        let target = self.document_path(collection, id).ok_or_else(|| {
            VaultError::Store(format!("refusing to use '{}' as a document name", id))
        })?;
        let dir = self.collection_dir(collection);
        self.ensure_dir(&dir)?;

        let content = serde_json::to_string_pretty(document)?;

        // Atomic Write
        let tmp_path = dir.join(format!(".{}-{}.tmp", id, Uuid::new_v4()));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, target)?;

        Ok(())
    }

    fn remove_document(&self, collection: Collection, id: &str) -> Result<bool> {
        let Some(path) = self.document_path(collection, id) else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn clear_collection(&self, collection: Collection) -> Result<()> {
        let dir = self.collection_dir(collection);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn unnameable_ids_read_as_absent() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        for id in ["outfit.a b", "outfit/x", "../escape", ""] {
            assert_eq!(backend.read_document(Collection::Nodes, id).unwrap(), None);
            assert!(!backend.remove_document(Collection::Links, id).unwrap());
        }
    }

    #[test]
    fn unnameable_ids_cannot_be_written() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        let err = backend
            .write_document(Collection::Nodes, "outfit/x", &json!({}))
            .unwrap_err();
        assert!(matches!(err, VaultError::Store(_)));
    }

    #[test]
    fn documents_round_trip_through_files() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        let doc = json!({"title": "Look"});
        backend.write_document(Collection::Nodes, "outfit.a", &doc).unwrap();
        assert!(dir.path().join("nodes").join("outfit.a.json").is_file());
        assert_eq!(
            backend.read_document(Collection::Nodes, "outfit.a").unwrap(),
            Some(doc)
        );
        assert!(backend.remove_document(Collection::Nodes, "outfit.a").unwrap());
        assert!(backend.load_collection(Collection::Nodes).unwrap().is_empty());
    }
}
