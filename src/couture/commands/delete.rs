use crate::commands::anchors;
use crate::commands::helpers::Tree;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{AnchorId, LinkId, NodeId};
use crate::store::DataStore;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDeletion {
    /// Deleted nodes, deepest first.
    pub deleted_nodes: Vec<NodeId>,
    pub removed_anchors: Vec<AnchorId>,
    pub removed_links: Vec<LinkId>,
}

/// Deletes a node with its whole subtree, every anchor on those nodes and
/// every link touching those anchors, then unregisters the node from its
/// parent.
///
/// Nodes go bottom-up, so an interrupted delete leaves a smaller but still
/// well-formed subtree and running it again finishes the job. Deleting a
/// node that does not exist succeeds and removes nothing.
pub fn run<S: DataStore>(
    store: &mut S,
    id: &NodeId,
    max_depth: usize,
) -> Result<CmdResult<NodeDeletion>> {
    let tree = Tree::load(store)?;
    let Some(node) = tree.get(id).cloned() else {
        debug!(node_id = %id, "node already gone");
        let message = CmdMessage::info(format!("Node {} does not exist", id));
        return Ok(CmdResult::new(NodeDeletion::default()).with_message(message));
    };
    let levels = tree.levels(id, max_depth)?;

    let mut deletion = NodeDeletion::default();
    for level in levels.iter().rev() {
        for node_id in level {
            let removal = anchors::delete_by_node(store, node_id)?.payload;
            deletion.removed_anchors.extend(removal.removed_anchors);
            deletion.removed_links.extend(removal.removed_links);
            if store.delete_node(node_id)? {
                deletion.deleted_nodes.push(node_id.clone());
            }
        }
    }

    if let Some(parent_id) = node.parent_id() {
        if let Some(mut parent) = store.find_node(parent_id)? {
            if parent.file_path.remove_child(id) {
                store.save_node(&parent)?;
            }
        }
    }

    info!(
        node_id = %id,
        nodes = deletion.deleted_nodes.len(),
        anchors = deletion.removed_anchors.len(),
        links = deletion.removed_links.len(),
        "deleted node"
    );
    let message = CmdMessage::success(format!(
        "Deleted {} ({} node(s), {} anchor(s), {} link(s))",
        node.title,
        deletion.deleted_nodes.len(),
        deletion.removed_anchors.len(),
        deletion.removed_links.len()
    ));
    Ok(CmdResult::new(deletion).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extent;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn deletes_subtree_and_unregisters_from_parent() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let shirt = f.clothing("Shirt", Some(3.0), &outfit);
        let note = f.text("Note", "", Some(&shirt));
        let keep = f.text("Keep", "", Some(&outfit));

        let deletion = run(&mut f.store, &shirt.node_id, 64).unwrap().payload;
        assert_eq!(
            deletion.deleted_nodes,
            vec![note.node_id.clone(), shirt.node_id.clone()]
        );
        assert!(f.store.get_node(&shirt.node_id).unwrap_err().is_not_found());
        assert!(f.store.get_node(&note.node_id).unwrap_err().is_not_found());

        let parent = f.store.get_node(&outfit.node_id).unwrap();
        assert_eq!(parent.file_path.children, vec![keep.node_id]);
    }

    #[test]
    fn cascades_to_anchors_and_links() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let note = f.text("Note", "hello", Some(&outfit));
        let other = f.text("Other", "", None);
        let a1 = f.anchor(&note, Some(Extent::text("hello", 0)));
        let a2 = f.anchor(&other, None);
        let link = f.link(&a1, &a2);

        let deletion = run(&mut f.store, &outfit.node_id, 64).unwrap().payload;
        assert_eq!(deletion.deleted_nodes.len(), 2);
        assert_eq!(deletion.removed_anchors, vec![a1.anchor_id]);
        assert_eq!(deletion.removed_links, vec![link.link_id]);
        assert!(f.store.links_for_anchor(&a2.anchor_id).unwrap().is_empty());
        assert_eq!(f.store.list_anchors().unwrap().len(), 1);
    }

    #[test]
    fn deleting_missing_node_succeeds() {
        let mut f = StoreFixture::new();
        let result = run(&mut f.store, &NodeId::from("text.gone"), 64).unwrap();
        assert_eq!(result.payload, NodeDeletion::default());
    }

    #[test]
    fn second_delete_is_noop() {
        let mut f = StoreFixture::new();
        let note = f.text("Note", "", None);
        run(&mut f.store, &note.node_id, 64).unwrap();
        let again = run(&mut f.store, &note.node_id, 64).unwrap().payload;
        assert!(again.deleted_nodes.is_empty());
    }

    #[test]
    fn depth_guard_aborts_before_writing() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let shirt = f.clothing("Shirt", None, &outfit);
        f.text("Note", "", Some(&shirt));

        assert!(run(&mut f.store, &outfit.node_id, 2).is_err());
        assert_eq!(f.store.list_nodes().unwrap().len(), 3);
    }
}
