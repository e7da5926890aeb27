use super::backend::{Collection, StorageBackend, COLLECTIONS};
use super::{DataStore, DoctorReport};
use crate::error::Result;
use crate::index::SearchIndex;
use crate::model::{Anchor, AnchorId, Link, LinkId, Node, NodeId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub struct VaultStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    /// Built on first search, then maintained on every node write.
    index: RefCell<Option<SearchIndex>>,
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn encode<T: Serialize>(document: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(document)?)
}

/// Immediate children of every node, derived from the nodes' own paths.
/// A node counts as a child of `p` iff its path is `p`'s path plus its id.
fn derive_children(nodes: &[Node]) -> HashMap<NodeId, Vec<NodeId>> {
    let paths: HashMap<&NodeId, &[NodeId]> = nodes
        .iter()
        .map(|n| (&n.node_id, n.file_path.path.as_slice()))
        .collect();

    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for node in nodes {
        let Some(parent_id) = node.parent_id() else {
            continue;
        };
        let Some(parent_path) = paths.get(parent_id) else {
            continue;
        };
        if node.file_path.ancestors() == *parent_path {
            children
                .entry(parent_id.clone())
                .or_default()
                .push(node.node_id.clone());
        }
    }
    children
}

/// Replaces `stored` with `derived`, keeping the stored order for ids present
/// in both. Returns whether anything changed.
fn reconcile_children(stored: &mut Vec<NodeId>, derived: &[NodeId]) -> bool {
    let derived_set: HashSet<&NodeId> = derived.iter().collect();
    let stored_set: HashSet<&NodeId> = stored.iter().collect();
    if derived_set == stored_set && stored.len() == derived.len() {
        return false;
    }

    let mut merged: Vec<NodeId> = Vec::with_capacity(derived.len());
    for id in stored.iter() {
        if derived_set.contains(id) && !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    for id in derived {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    *stored = merged;
    true
}

impl<B: StorageBackend> VaultStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            index: RefCell::new(None),
        }
    }

    fn load_all<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        self.backend
            .load_collection(collection)?
            .into_values()
            .map(decode)
            .collect()
    }

    fn find_document<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>> {
        self.backend
            .read_document(collection, id)?
            .map(decode)
            .transpose()
    }

    fn write_node(&self, node: &Node) -> Result<()> {
        self.backend
            .write_document(Collection::Nodes, node.node_id.as_str(), &encode(node)?)?;
        if let Some(index) = self.index.borrow_mut().as_mut() {
            index.upsert(node);
        }
        Ok(())
    }

    fn remove_node(&self, id: &NodeId) -> Result<bool> {
        let removed = self.backend.remove_document(Collection::Nodes, id.as_str())?;
        if let Some(index) = self.index.borrow_mut().as_mut() {
            index.remove(id);
        }
        Ok(removed)
    }

    /// Loads every node and brings its `children` in line with the tree,
    /// writing back the ones that drifted. Returns the nodes and the number
    /// of repairs.
    fn load_reconciled(&self) -> Result<(Vec<Node>, usize)> {
        let mut nodes: Vec<Node> = self.load_all(Collection::Nodes)?;
        let derived = derive_children(&nodes);
        let mut repaired = 0;

        for node in nodes.iter_mut() {
            let expected = derived
                .get(&node.node_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if reconcile_children(&mut node.file_path.children, expected) {
                warn!(node_id = %node.node_id, "children list drifted from tree, repairing");
                self.write_node(node)?;
                repaired += 1;
            }
        }
        Ok((nodes, repaired))
    }

    fn with_index<T>(&self, f: impl FnOnce(&SearchIndex) -> T) -> Result<T> {
        if self.index.borrow().is_none() {
            let nodes: Vec<Node> = self.load_all(Collection::Nodes)?;
            debug!(nodes = nodes.len(), "building search index");
            *self.index.borrow_mut() = Some(SearchIndex::build(&nodes));
        }
        let index = self.index.borrow();
        Ok(match index.as_ref() {
            Some(index) => f(index),
            None => f(&SearchIndex::new()),
        })
    }
}

impl<B: StorageBackend> DataStore for VaultStore<B> {
    fn save_node(&mut self, node: &Node) -> Result<()> {
        debug!(node_id = %node.node_id, "saving node");
        self.write_node(node)
    }

    fn find_node(&self, id: &NodeId) -> Result<Option<Node>> {
        Ok(self.find_nodes(std::slice::from_ref(id))?.into_iter().next())
    }

    fn find_nodes(&self, ids: &[NodeId]) -> Result<Vec<Node>> {
        let mut found: Vec<Node> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(node) = self.find_document::<Node>(Collection::Nodes, id.as_str())? {
                found.push(node);
            }
        }
        if found.is_empty() {
            return Ok(found);
        }

        // One scan derives children for the whole batch.
        let derived = derive_children(&self.load_all::<Node>(Collection::Nodes)?);
        for node in found.iter_mut() {
            let expected = derived
                .get(&node.node_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if reconcile_children(&mut node.file_path.children, expected) {
                warn!(node_id = %node.node_id, "children list drifted from tree, repairing");
                self.write_node(node)?;
            }
        }
        Ok(found)
    }

    fn list_nodes(&self) -> Result<Vec<Node>> {
        let (nodes, _) = self.load_reconciled()?;
        Ok(nodes)
    }

    fn delete_node(&mut self, id: &NodeId) -> Result<bool> {
        let removed = self.remove_node(id)?;
        debug!(node_id = %id, removed, "deleted node document");
        Ok(removed)
    }

    fn save_anchor(&mut self, anchor: &Anchor) -> Result<()> {
        debug!(anchor_id = %anchor.anchor_id, "saving anchor");
        self.backend.write_document(
            Collection::Anchors,
            anchor.anchor_id.as_str(),
            &encode(anchor)?,
        )
    }

    fn find_anchor(&self, id: &AnchorId) -> Result<Option<Anchor>> {
        self.find_document(Collection::Anchors, id.as_str())
    }

    fn list_anchors(&self) -> Result<Vec<Anchor>> {
        self.load_all(Collection::Anchors)
    }

    fn delete_anchor(&mut self, id: &AnchorId) -> Result<bool> {
        let removed = self
            .backend
            .remove_document(Collection::Anchors, id.as_str())?;
        debug!(anchor_id = %id, removed, "deleted anchor document");
        Ok(removed)
    }

    fn save_link(&mut self, link: &Link) -> Result<()> {
        debug!(link_id = %link.link_id, "saving link");
        self.backend
            .write_document(Collection::Links, link.link_id.as_str(), &encode(link)?)
    }

    fn find_link(&self, id: &LinkId) -> Result<Option<Link>> {
        self.find_document(Collection::Links, id.as_str())
    }

    fn list_links(&self) -> Result<Vec<Link>> {
        self.load_all(Collection::Links)
    }

    fn delete_link(&mut self, id: &LinkId) -> Result<bool> {
        let removed = self.backend.remove_document(Collection::Links, id.as_str())?;
        debug!(link_id = %id, removed, "deleted link document");
        Ok(removed)
    }

    fn search_nodes(&self, term: &str) -> Result<Vec<Node>> {
        let hits = self.with_index(|index| index.query(term))?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<NodeId, Node> = self
            .list_nodes()?
            .into_iter()
            .map(|n| (n.node_id.clone(), n))
            .collect();
        Ok(hits
            .into_iter()
            .filter_map(|hit| by_id.remove(&hit.node_id))
            .collect())
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();

        // 1. Stale prefixes left by an interrupted move: follow the parent's
        //    current path. Shorter paths first so parents settle before
        //    their children.
        let mut nodes: Vec<Node> = self.load_all(Collection::Nodes)?;
        nodes.sort_by_key(|n| n.file_path.path.len());
        let mut current: HashMap<NodeId, Vec<NodeId>> = nodes
            .iter()
            .map(|n| (n.node_id.clone(), n.file_path.path.clone()))
            .collect();
        for node in nodes.iter_mut() {
            let Some(parent_id) = node.parent_id().cloned() else {
                continue;
            };
            let Some(parent_path) = current.get(&parent_id) else {
                continue;
            };
            if parent_path.as_slice() == node.file_path.ancestors() {
                continue;
            }
            if parent_path.contains(&node.node_id) {
                warn!(node_id = %node.node_id, "parent path loops back to node, leaving as is");
                continue;
            }
            let mut path = parent_path.clone();
            path.push(node.node_id.clone());
            warn!(node_id = %node.node_id, "re-homing node under its parent's current path");
            node.file_path.path = path.clone();
            self.write_node(node)?;
            current.insert(node.node_id.clone(), path);
            report.rehomed_nodes += 1;
        }

        // 2. Nodes whose ancestry is broken: an interrupted delete removed a
        //    parent but not all of its subtree.
        let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.node_id).collect();
        let stranded: Vec<NodeId> = nodes
            .iter()
            .filter(|n| n.file_path.ancestors().iter().any(|a| !ids.contains(a)))
            .map(|n| n.node_id.clone())
            .collect();
        for id in &stranded {
            warn!(node_id = %id, "removing node with missing ancestor");
            self.remove_node(id)?;
        }
        report.removed_stranded_nodes = stranded.len();

        // 3. Children lists
        let (nodes, repaired) = self.load_reconciled()?;
        report.repaired_children = repaired;
        let node_ids: HashSet<NodeId> = nodes.iter().map(|n| n.node_id.clone()).collect();

        // 4. Anchors on missing nodes
        let mut anchor_ids: HashSet<AnchorId> = HashSet::new();
        for anchor in self.list_anchors()? {
            if node_ids.contains(&anchor.node_id) {
                anchor_ids.insert(anchor.anchor_id);
            } else {
                warn!(anchor_id = %anchor.anchor_id, node_id = %anchor.node_id, "removing anchor on missing node");
                self.delete_anchor(&anchor.anchor_id)?;
                report.removed_dangling_anchors += 1;
            }
        }

        // 5. Links with a missing endpoint
        for link in self.list_links()? {
            if !anchor_ids.contains(&link.anchor1_id) || !anchor_ids.contains(&link.anchor2_id) {
                warn!(link_id = %link.link_id, "removing link with missing anchor");
                self.delete_link(&link.link_id)?;
                report.removed_dangling_links += 1;
            }
        }

        // 6. Search index
        let index = SearchIndex::build(&nodes);
        report.indexed_nodes = index.len();
        *self.index.borrow_mut() = Some(index);

        info!(?report, "doctor finished");
        Ok(report)
    }

    fn clear(&mut self) -> Result<()> {
        for collection in COLLECTIONS {
            self.backend.clear_collection(*collection)?;
        }
        *self.index.borrow_mut() = Some(SearchIndex::new());
        info!("cleared all collections");
        Ok(())
    }
}
