//! # Storage Layer
//!
//! This module defines the storage abstraction for the vault. The [`DataStore`]
//! trait lets commands work against any backend.
//!
//! ## Documents
//!
//! The vault keeps three collections, each a flat map of id to JSON document:
//!
//! | Collection | Keyed by | Document |
//! |------------|----------|----------|
//! | `nodes` | `nodeId` | [`Node`] |
//! | `anchors` | `anchorId` | [`Anchor`] |
//! | `links` | `linkId` | [`Link`] |
//!
//! Every write touches exactly one document. Operations that span documents
//! (move, cascading delete) are sequences of single-document writes, so the
//! store must cope with the state a crash halfway through leaves behind.
//!
//! ## Tree Truth
//!
//! A node's own `filePath.path` decides where it lives. The `children` list
//! stored on a parent is a denormalized index:
//!
//! - **Derived on read**: [`DataStore::get_node`] and [`DataStore::list_nodes`]
//!   recompute `children` from the paths of the other nodes.
//! - **Repaired on mismatch**: when the stored list differs from the derived
//!   one, the corrected document is written back and a warning is logged.
//! - **Doctor**: [`DataStore::doctor`] does the same for every node in one pass,
//!   and also sweeps anchors and links left dangling by an interrupted cascade.
//!
//! ## Search
//!
//! Node `title` and `content` are covered by an in-memory
//! [`SearchIndex`](crate::index::SearchIndex), built on first query and then
//! kept current on every node save and delete.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON file per document under a data directory.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── couture.toml        # Optional configuration
//! ├── nodes/{nodeId}.json
//! ├── anchors/{anchorId}.json
//! └── links/{linkId}.json
//! ```

use crate::error::{Result, VaultError};
use crate::model::{Anchor, AnchorId, Link, LinkId, Node, NodeId};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod vault_store;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    /// Nodes whose path still carried a prefix from before a move.
    pub rehomed_nodes: usize,
    /// Parents whose stored `children` list drifted from the derived one.
    pub repaired_children: usize,
    /// Nodes whose parent no longer exists (left by an interrupted delete).
    pub removed_stranded_nodes: usize,
    /// Anchors whose node no longer exists.
    pub removed_dangling_anchors: usize,
    /// Links with at least one missing endpoint anchor.
    pub removed_dangling_links: usize,
    /// Nodes in the rebuilt search index.
    pub indexed_nodes: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.rehomed_nodes == 0
            && self.repaired_children == 0
            && self.removed_stranded_nodes == 0
            && self.removed_dangling_anchors == 0
            && self.removed_dangling_links == 0
    }
}

/// Abstract interface for vault storage.
///
/// Mutating methods take `&mut self`: a store has a single writer. Deletes are
/// idempotent and report whether anything was removed.
pub trait DataStore {
    // --- Nodes ---

    /// Save a node (create or replace).
    fn save_node(&mut self, node: &Node) -> Result<()>;

    /// Look up a node, with `children` derived from the tree.
    fn find_node(&self, id: &NodeId) -> Result<Option<Node>>;

    /// All nodes, with derived `children`.
    fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Several nodes in the order asked for, misses skipped. Children are
    /// derived once for the whole batch.
    fn find_nodes(&self, ids: &[NodeId]) -> Result<Vec<Node>>;

    /// Remove a node document. Does not cascade.
    fn delete_node(&mut self, id: &NodeId) -> Result<bool>;

    // --- Anchors ---

    fn save_anchor(&mut self, anchor: &Anchor) -> Result<()>;

    fn find_anchor(&self, id: &AnchorId) -> Result<Option<Anchor>>;

    fn list_anchors(&self) -> Result<Vec<Anchor>>;

    /// Remove an anchor document. Does not cascade.
    fn delete_anchor(&mut self, id: &AnchorId) -> Result<bool>;

    // --- Links ---

    fn save_link(&mut self, link: &Link) -> Result<()>;

    fn find_link(&self, id: &LinkId) -> Result<Option<Link>>;

    fn list_links(&self) -> Result<Vec<Link>>;

    fn delete_link(&mut self, id: &LinkId) -> Result<bool>;

    // --- Whole store ---

    /// Nodes matching `term`, most relevant first.
    fn search_nodes(&self, term: &str) -> Result<Vec<Node>>;

    /// Verify and fix consistency issues.
    fn doctor(&mut self) -> Result<DoctorReport>;

    /// Remove every node, anchor and link.
    fn clear(&mut self) -> Result<()>;

    // --- Provided lookups ---

    fn get_node(&self, id: &NodeId) -> Result<Node> {
        self.find_node(id)?
            .ok_or_else(|| VaultError::node_not_found(id.as_str()))
    }

    fn get_anchor(&self, id: &AnchorId) -> Result<Anchor> {
        self.find_anchor(id)?
            .ok_or_else(|| VaultError::anchor_not_found(id.as_str()))
    }

    fn get_link(&self, id: &LinkId) -> Result<Link> {
        self.find_link(id)?
            .ok_or_else(|| VaultError::link_not_found(id.as_str()))
    }

    fn anchors_for_node(&self, node_id: &NodeId) -> Result<Vec<Anchor>> {
        Ok(self
            .list_anchors()?
            .into_iter()
            .filter(|a| &a.node_id == node_id)
            .collect())
    }

    fn links_for_anchor(&self, anchor_id: &AnchorId) -> Result<Vec<Link>> {
        Ok(self
            .list_links()?
            .into_iter()
            .filter(|l| l.touches_anchor(anchor_id))
            .collect())
    }

    fn links_for_node(&self, node_id: &NodeId) -> Result<Vec<Link>> {
        Ok(self
            .list_links()?
            .into_iter()
            .filter(|l| l.touches_node(node_id))
            .collect())
    }
}
