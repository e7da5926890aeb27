use crate::commands::helpers::Tree;
use crate::commands::CmdResult;
use crate::error::{Result, VaultError};
use crate::model::{Node, NodeId, NodeType};
use crate::store::DataStore;
use serde::Serialize;

/// A node with its subtree, for rendering the whole hierarchy at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTree {
    pub node: Node,
    pub children: Vec<NodeTree>,
}

impl NodeTree {
    /// Number of nodes in this tree, root included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(NodeTree::size).sum::<usize>()
    }
}

pub fn get_node<S: DataStore>(store: &S, id: &NodeId) -> Result<CmdResult<Node>> {
    Ok(CmdResult::new(store.get_node(id)?))
}

/// Found nodes in request order. Unknown ids are skipped.
pub fn get_nodes_by_id<S: DataStore>(store: &S, ids: &[NodeId]) -> Result<CmdResult<Vec<Node>>> {
    Ok(CmdResult::new(store.find_nodes(ids)?))
}

/// All roots, oldest first.
pub fn find_roots<S: DataStore>(store: &S) -> Result<CmdResult<Vec<Node>>> {
    let mut roots: Vec<Node> = store
        .list_nodes()?
        .into_iter()
        .filter(Node::is_root)
        .collect();
    sort_oldest_first(&mut roots);
    Ok(CmdResult::new(roots))
}

fn sort_oldest_first(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| {
        a.date_created
            .cmp(&b.date_created)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
}

fn build_tree(tree: &Tree, node: &Node, remaining_depth: usize) -> Result<NodeTree> {
    if remaining_depth == 0 {
        return Err(VaultError::Store(format!(
            "tree under '{}' is deeper than the configured maximum",
            node.node_id
        )));
    }
    let mut children: Vec<Node> = tree.children(&node.node_id).cloned().collect();
    sort_oldest_first(&mut children);
    let children = children
        .iter()
        .map(|child| build_tree(tree, child, remaining_depth - 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(NodeTree {
        node: node.clone(),
        children,
    })
}

pub fn get_tree<S: DataStore>(
    store: &S,
    id: &NodeId,
    max_depth: usize,
) -> Result<CmdResult<NodeTree>> {
    let tree = Tree::load(store)?;
    let root = tree
        .get(id)
        .ok_or_else(|| VaultError::node_not_found(id.as_str()))?;
    Ok(CmdResult::new(build_tree(&tree, root, max_depth)?))
}

pub fn find_root_trees<S: DataStore>(
    store: &S,
    max_depth: usize,
) -> Result<CmdResult<Vec<NodeTree>>> {
    let tree = Tree::load(store)?;
    let mut roots: Vec<Node> = tree.roots().cloned().collect();
    sort_oldest_first(&mut roots);
    let trees = roots
        .iter()
        .map(|root| build_tree(&tree, root, max_depth))
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::new(trees))
}

/// Sum of the prices of the clothing items directly inside an outfit.
/// Items without a price count as zero.
pub fn outfit_total<S: DataStore>(store: &S, id: &NodeId) -> Result<CmdResult<f64>> {
    let outfit = store.get_node(id)?;
    if outfit.node_type() != NodeType::Outfit {
        return Err(VaultError::Validation(format!(
            "'{}' is a {}, not an outfit",
            id,
            outfit.node_type()
        )));
    }
    let children = get_nodes_by_id(store, &outfit.file_path.children)?.payload;
    let total: f64 = children.iter().filter_map(Node::price).sum();
    Ok(CmdResult::new(total))
}
