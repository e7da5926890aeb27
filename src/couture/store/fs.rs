use super::fs_backend::FsBackend;
use super::vault_store::VaultStore;
use std::path::PathBuf;

/// The production store: documents as JSON files under a data directory.
pub type FileStore = VaultStore<FsBackend>;

impl FileStore {
    pub fn open(data_dir: PathBuf) -> Self {
        VaultStore::with_backend(FsBackend::new(data_dir))
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.backend.root()
    }
}
