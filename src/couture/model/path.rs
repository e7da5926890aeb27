//! # Node Paths
//!
//! A node's position in the tree is the ordered list of ids from its root down
//! to the node itself:
//!
//! ```text
//! outfit.a                      path = [outfit.a]
//! └── clothingitem.b            path = [outfit.a, clothingitem.b]
//!     └── image.c               path = [outfit.a, clothingitem.b, image.c]
//! ```
//!
//! The path stored on a node is the source of truth for where it lives.
//! `children` is a denormalized list of immediate child ids: the store derives
//! it from the paths of other nodes and repairs it when it drifts, so nothing
//! should treat it as authoritative.

use super::id::{is_valid_id, NodeId};
use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath {
    pub path: Vec<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// Builds a path, failing with `InvalidPath` when `ids` is empty.
pub fn make_path(ids: Vec<NodeId>, children: Option<Vec<NodeId>>) -> Result<NodePath> {
    if ids.is_empty() {
        return Err(VaultError::InvalidPath(
            "a path needs at least one node id".to_string(),
        ));
    }
    Ok(NodePath {
        path: ids,
        children: children.unwrap_or_default(),
    })
}

/// True iff the path is non-empty, every element is a well-formed id and no
/// id appears twice.
pub fn is_valid_path(p: &NodePath) -> bool {
    if p.path.is_empty() {
        return false;
    }
    let mut seen = HashSet::with_capacity(p.path.len());
    p.path
        .iter()
        .all(|id| is_valid_id(id.as_str()) && seen.insert(id))
        && p.children.iter().all(|id| is_valid_id(id.as_str()))
}

/// True iff `ancestor_id` appears in `candidate.path` before its last element.
pub fn is_descendant_path(candidate: &NodePath, ancestor_id: &NodeId) -> bool {
    match candidate.path.split_last() {
        Some((_, ancestors)) => ancestors.contains(ancestor_id),
        None => false,
    }
}

impl NodePath {
    pub fn root(id: NodeId) -> Self {
        Self {
            path: vec![id],
            children: Vec::new(),
        }
    }

    /// The id this path leads to.
    pub fn node_id(&self) -> Option<&NodeId> {
        self.path.last()
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        match self.path.len() {
            0 | 1 => None,
            n => self.path.get(n - 2),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Strict ancestors, root first.
    pub fn ancestors(&self) -> &[NodeId] {
        match self.path.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }

    /// Path of a new child placed directly under this node.
    pub fn child(&self, id: NodeId) -> NodePath {
        let mut path = self.path.clone();
        path.push(id);
        NodePath {
            path,
            children: Vec::new(),
        }
    }

    /// Replaces the first `old_prefix_len` ids with `new_prefix`, keeping the
    /// suffix. Used to re-home a subtree after its root has moved.
    pub fn rebase(&self, old_prefix_len: usize, new_prefix: &[NodeId]) -> NodePath {
        let suffix = self.path.get(old_prefix_len..).unwrap_or(&[]);
        let mut path = Vec::with_capacity(new_prefix.len() + suffix.len());
        path.extend_from_slice(new_prefix);
        path.extend_from_slice(suffix);
        NodePath {
            path,
            children: self.children.clone(),
        }
    }

    pub fn add_child(&mut self, id: &NodeId) -> bool {
        if self.children.contains(id) {
            return false;
        }
        self.children.push(id.clone());
        true
    }

    pub fn remove_child(&mut self, id: &NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|child| child != id);
        before != self.children.len()
    }
}
