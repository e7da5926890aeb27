//! Shape properties of random trees built through the public API.

use couture::api::VaultApi;
use couture::commands::move_node::MoveTarget;
use couture::model::{Node, NodeDraft, NodeId, NodeType};
use couture::store::memory::InMemoryStore;
use couture::store::DataStore;
use proptest::prelude::*;
use std::collections::HashSet;

/// Each entry picks a parent among the nodes created before it (`None` for a
/// root). Only text nodes, so nesting rules never interfere.
fn build(shape: &[Option<usize>]) -> (VaultApi<InMemoryStore>, Vec<Node>) {
    let mut api = VaultApi::new(InMemoryStore::new());
    let mut nodes: Vec<Node> = Vec::new();
    for (i, parent) in shape.iter().enumerate() {
        let mut draft = NodeDraft::new(NodeType::Text, format!("n{}", i));
        if let Some(p) = parent {
            if !nodes.is_empty() {
                draft = draft.under(nodes[p % nodes.len()].node_id.clone());
            }
        }
        let node = api.create_from_draft(draft).unwrap().payload.unwrap();
        nodes.push(node);
    }
    (api, nodes)
}

fn descendants(api: &VaultApi<InMemoryStore>, id: &NodeId) -> HashSet<NodeId> {
    api.store()
        .list_nodes()
        .unwrap()
        .into_iter()
        .filter(|n| n.file_path.ancestors().contains(id))
        .map(|n| n.node_id)
        .collect()
}

fn assert_consistent(api: &VaultApi<InMemoryStore>) {
    let nodes = api.store().list_nodes().unwrap();
    let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.node_id).collect();
    for node in &nodes {
        assert_eq!(node.file_path.path.last(), Some(&node.node_id));
        for ancestor in node.file_path.ancestors() {
            assert!(ids.contains(ancestor));
        }
        for child in &node.file_path.children {
            let child = nodes.iter().find(|n| &n.node_id == child).unwrap();
            assert_eq!(child.parent_id(), Some(&node.node_id));
        }
    }
}

fn shape() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::weighted(0.8, 0usize..64), 1..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moves_into_own_subtree_are_rejected(shape in shape(), pick in 0usize..64) {
        let (mut api, nodes) = build(&shape);
        let node = &nodes[pick % nodes.len()];
        let before = api.store().list_nodes().unwrap().len();

        let mut targets: Vec<NodeId> = descendants(&api, &node.node_id).into_iter().collect();
        targets.push(node.node_id.clone());
        for target in targets {
            let response = api.move_node(&node.node_id, &MoveTarget::Node(target)).unwrap();
            prop_assert!(!response.success);
        }

        let stored = api.get_node(&node.node_id).unwrap().payload.unwrap();
        prop_assert_eq!(stored.file_path.path, node.file_path.path.clone());
        prop_assert_eq!(api.store().list_nodes().unwrap().len(), before);
    }

    #[test]
    fn legal_moves_keep_the_tree_consistent(shape in shape(), pick in 0usize..64, to in 0usize..64) {
        let (mut api, nodes) = build(&shape);
        let node = &nodes[pick % nodes.len()];
        let target = &nodes[to % nodes.len()];
        let inside = target.node_id == node.node_id
            || descendants(&api, &node.node_id).contains(&target.node_id);

        let response = api
            .move_node(&node.node_id, &MoveTarget::Node(target.node_id.clone()))
            .unwrap();
        prop_assert_eq!(response.success, !inside);
        assert_consistent(&api);
        prop_assert!(api.doctor().unwrap().payload.unwrap().is_clean());
    }

    #[test]
    fn delete_takes_exactly_the_subtree(shape in shape(), pick in 0usize..64) {
        let (mut api, nodes) = build(&shape);
        let node = &nodes[pick % nodes.len()];
        let mut doomed = descendants(&api, &node.node_id);
        doomed.insert(node.node_id.clone());

        let deletion = api.delete_node(&node.node_id).unwrap().payload.unwrap();
        let deleted: HashSet<NodeId> = deletion.deleted_nodes.into_iter().collect();
        prop_assert_eq!(&deleted, &doomed);

        let remaining = api.store().list_nodes().unwrap();
        prop_assert_eq!(remaining.len(), nodes.len() - doomed.len());
        for n in &remaining {
            prop_assert!(!doomed.contains(&n.node_id));
        }
        assert_consistent(&api);
    }
}
