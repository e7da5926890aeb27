use crate::commands::move_node::{check_target, relocate};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::fields::NodeProperty;
use crate::model::{Node, NodeId};
use crate::store::DataStore;
use tracing::info;

/// Applies a batch of field updates to one node, all or nothing.
///
/// Every property is applied to a copy first; the first invalid one fails the
/// whole update and the stored node is left untouched. A `filePath` whose
/// `path` differs from the current one relocates the node like a move, and
/// must name an existing parent at exactly its prefix. The `children` part of
/// a `filePath` value is ignored: children are derived from the tree.
pub fn run<S: DataStore>(
    store: &mut S,
    id: &NodeId,
    properties: &[NodeProperty],
    max_depth: usize,
) -> Result<CmdResult<Node>> {
    if properties.is_empty() {
        return Err(VaultError::Validation("nothing to update".to_string()));
    }

    let original = store.get_node(id)?;
    let mut updated = original.clone();
    for property in properties {
        updated.set_field(property)?;
    }

    let relocation = if updated.file_path.path != original.file_path.path {
        let new_parent = match updated.parent_id() {
            None => None,
            Some(parent_id) => {
                let parent = store.get_node(parent_id)?;
                if parent.file_path.path.as_slice() != updated.file_path.ancestors() {
                    return Err(VaultError::InvalidPath(format!(
                        "new path of '{}' does not continue its parent's path",
                        id
                    )));
                }
                Some(parent)
            }
        };
        check_target(&original, new_parent.as_ref())?;
        Some(new_parent)
    } else {
        None
    };
    updated.file_path.children = original.file_path.children.clone();

    let node = match relocation {
        Some(new_parent) => {
            updated.file_path.path = original.file_path.path.clone();
            relocate(store, updated, new_parent, max_depth)?
        }
        None => {
            store.save_node(&updated)?;
            updated
        }
    };

    let fields: Vec<&str> = properties.iter().map(|p| p.field_name.as_str()).collect();
    info!(node_id = %id, fields = ?fields, "updated node");
    let message = CmdMessage::success(format!("Updated {}: {}", node.title, fields.join(", ")));
    Ok(CmdResult::new(node).with_message(message))
}
