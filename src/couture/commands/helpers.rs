use crate::error::{Result, VaultError};
use crate::fields::{updatable_fields, NodeProperty};
use crate::model::id::is_valid_id;
use crate::model::{is_valid_path, Node, NodeId, NodeType};
use crate::store::DataStore;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Checks that `id` is storable and carries `node_type`'s prefix.
pub fn check_node_id(id: &NodeId, node_type: NodeType) -> Result<()> {
    if !is_valid_id(id.as_str()) {
        return Err(VaultError::Validation(format!(
            "'{}' is not a valid node id",
            id
        )));
    }
    if id.prefix() != Some(node_type.as_str()) {
        return Err(VaultError::Validation(format!(
            "node id '{}' must start with '{}.'",
            id, node_type
        )));
    }
    Ok(())
}

/// Re-validates every type-specific field a node carries, the same way an
/// update of that field would be validated.
pub fn check_fields(node: &Node) -> Result<()> {
    let mut scratch = node.clone();
    for name in updatable_fields(node.node_type()) {
        if matches!(name, "filePath" | "comments") {
            continue;
        }
        if let Some(value) = node.get_field(name) {
            scratch.set_field(&NodeProperty::new(name, value))?;
        }
    }
    Ok(())
}

/// Checks `node.file_path` on its own: well-formed and ending in the node's id.
pub fn check_own_path(node: &Node) -> Result<()> {
    if !is_valid_path(&node.file_path) {
        return Err(VaultError::InvalidPath(format!(
            "path of '{}' is empty, malformed or repeats an id",
            node.node_id
        )));
    }
    if node.file_path.node_id() != Some(&node.node_id) {
        return Err(VaultError::InvalidPath(format!(
            "path of '{}' must end with its own id",
            node.node_id
        )));
    }
    Ok(())
}

/// The nodes of the vault keyed by id, with derived `children`, for
/// traversals that must not hit the store once per node.
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
}

impl Tree {
    pub fn load<S: DataStore>(store: &S) -> Result<Self> {
        Ok(Self::from_nodes(store.list_nodes()?))
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|n| (n.node_id.clone(), n))
                .collect(),
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_root())
    }

    pub fn children(&self, id: &NodeId) -> impl Iterator<Item = &Node> {
        self.nodes
            .get(id)
            .map(|n| n.file_path.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|child| self.nodes.get(child))
    }

    /// Breadth-first levels of the subtree rooted at `root`: `levels[0]` is
    /// `[root]`, `levels[1]` its children, and so on. Fails when the subtree
    /// is deeper than `max_depth` levels. Empty when `root` does not exist.
    pub fn levels(&self, root: &NodeId, max_depth: usize) -> Result<Vec<Vec<NodeId>>> {
        if !self.nodes.contains_key(root) {
            return Ok(Vec::new());
        }

        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut frontier: VecDeque<&NodeId> = VecDeque::from([root]);
        seen.insert(root);

        while !frontier.is_empty() {
            if levels.len() >= max_depth {
                warn!(root = %root, max_depth, "subtree exceeds maximum depth");
                return Err(VaultError::Store(format!(
                    "subtree of '{}' is deeper than the maximum of {} levels",
                    root, max_depth
                )));
            }

            let mut level = Vec::with_capacity(frontier.len());
            let mut next = VecDeque::new();
            for id in frontier.drain(..) {
                level.push(id.clone());
                for child in self.children(id) {
                    if seen.insert(&child.node_id) {
                        next.push_back(&child.node_id);
                    }
                }
            }
            levels.push(level);
            frontier = next;
        }
        Ok(levels)
    }
}
