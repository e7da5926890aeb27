use crate::commands::helpers::{check_fields, check_node_id, check_own_path};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::fields::NodeProperty;
use crate::model::{Node, NodeDraft};
use crate::store::DataStore;
use tracing::info;

/// Persists a fully-formed node and registers it with its parent.
///
/// The node's own path decides where it goes: a path of length one makes a
/// root, anything longer names the parent as the second-to-last id, and that
/// parent must exist at exactly the path's prefix.
pub fn run<S: DataStore>(store: &mut S, node: Node) -> Result<CmdResult<Node>> {
    let mut node = node;
    check_node_id(&node.node_id, node.node_type())?;
    check_own_path(&node)?;
    check_fields(&node)?;

    if store.find_node(&node.node_id)?.is_some() {
        return Err(VaultError::Validation(format!(
            "a node with id '{}' already exists",
            node.node_id
        )));
    }

    let parent = match node.parent_id() {
        None => None,
        Some(parent_id) => {
            let parent = store.get_node(parent_id)?;
            if parent.file_path.path.as_slice() != node.file_path.ancestors() {
                return Err(VaultError::InvalidPath(format!(
                    "path of '{}' does not continue its parent's path",
                    node.node_id
                )));
            }
            if let Some(reason) = node.node_type().nesting_violation(parent.node_type()) {
                return Err(VaultError::Validation(reason.to_string()));
            }
            Some(parent)
        }
    };

    // A new node has no children yet, whatever the caller sent.
    node.file_path.children.clear();
    store.save_node(&node)?;

    if let Some(mut parent) = parent {
        if parent.file_path.add_child(&node.node_id) {
            store.save_node(&parent)?;
        }
    }

    info!(node_id = %node.node_id, node_type = %node.node_type(), "created node");
    let message = CmdMessage::success(format!("Node created: {}", node.title));
    Ok(CmdResult::new(node).with_message(message))
}

/// Creates a node from what a UI knows: type, title, content and an optional
/// parent id. The id and path are generated.
pub fn from_draft<S: DataStore>(store: &mut S, draft: NodeDraft) -> Result<CmdResult<Node>> {
    from_draft_with_fields(store, draft, &[])
}

/// Like [`from_draft`], with extra fields (price, brand, ...) applied to the
/// built node before it is validated and saved.
pub fn from_draft_with_fields<S: DataStore>(
    store: &mut S,
    draft: NodeDraft,
    fields: &[NodeProperty],
) -> Result<CmdResult<Node>> {
    let parent_path = match &draft.parent {
        Some(parent_id) => Some(store.get_node(parent_id)?.file_path),
        None => None,
    };
    let mut node = draft.build(parent_path.as_ref());
    for field in fields {
        node.set_field(field)?;
    }
    run(store, node)
}
