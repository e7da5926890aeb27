//! The filesystem store against a real temporary directory.

use couture::api::VaultApi;
use couture::commands::move_node::MoveTarget;
use couture::fields::NodeProperty;
use couture::model::{AnchorId, LinkId, NodeDraft, NodeId, NodeType};
use couture::store::fs::FileStore;
use couture::store::DataStore;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> VaultApi<FileStore> {
    VaultApi::new(FileStore::open(dir.path().to_path_buf()))
}

#[test]
fn documents_live_one_file_per_id() {
    let dir = TempDir::new().unwrap();
    let mut api = open(&dir);
    let look = api
        .create_from_draft(NodeDraft::new(NodeType::Outfit, "Look"))
        .unwrap()
        .payload
        .unwrap();
    let anchor = api
        .create_anchor(&look.node_id, Value::Null)
        .unwrap()
        .payload
        .unwrap();

    let node_file = dir
        .path()
        .join("nodes")
        .join(format!("{}.json", look.node_id));
    let anchor_file = dir
        .path()
        .join("anchors")
        .join(format!("{}.json", anchor.anchor_id));
    assert!(node_file.is_file());
    assert!(anchor_file.is_file());

    let raw: Value = serde_json::from_str(&fs::read_to_string(node_file).unwrap()).unwrap();
    assert_eq!(raw["type"], "outfit");
    assert_eq!(raw["title"], "Look");
    assert_eq!(raw["filePath"]["path"][0], look.node_id.as_str());
}

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let (look, shirt) = {
        let mut api = open(&dir);
        let look = api
            .create_from_draft(NodeDraft::new(NodeType::Outfit, "Evening look"))
            .unwrap()
            .payload
            .unwrap();
        let shirt = api
            .create_from_draft_with(
                NodeDraft::new(NodeType::ClothingItem, "Silk shirt").under(look.node_id.clone()),
                &[NodeProperty::new("price", 80)],
            )
            .unwrap()
            .payload
            .unwrap();
        (look, shirt)
    };

    let api = open(&dir);
    let stored = api.get_node(&look.node_id).unwrap().payload.unwrap();
    assert_eq!(stored.file_path.children, vec![shirt.node_id.clone()]);
    assert_eq!(api.outfit_total(&look.node_id).unwrap().payload, Some(80.0));

    let found = api.search("silk").unwrap().payload.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].node_id, shirt.node_id);
}

#[test]
fn doctor_repairs_hand_edited_children() {
    let dir = TempDir::new().unwrap();
    let mut api = open(&dir);
    let note = api
        .create_from_draft(NodeDraft::new(NodeType::Text, "Note"))
        .unwrap()
        .payload
        .unwrap();
    api.create_from_draft(NodeDraft::new(NodeType::Text, "Child").under(note.node_id.clone()))
        .unwrap();

    let path = dir.path().join("nodes").join(format!("{}.json", note.node_id));
    let mut raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    raw["filePath"]["children"] = Value::Array(vec![]);
    fs::write(&path, serde_json::to_string_pretty(&raw).unwrap()).unwrap();

    let report = open(&dir).doctor().unwrap().payload.unwrap();
    assert_eq!(report.repaired_children, 1);
    assert!(open(&dir).doctor().unwrap().payload.unwrap().is_clean());
}

#[test]
fn clear_empties_every_collection() {
    let dir = TempDir::new().unwrap();
    let mut api = open(&dir);
    let note = api
        .create_from_draft(NodeDraft::new(NodeType::Text, "Note").with_content("hi"))
        .unwrap()
        .payload
        .unwrap();
    api.create_anchor(&note.node_id, Value::Null).unwrap();

    assert!(api.clear_all().unwrap().success);
    let store = FileStore::open(dir.path().to_path_buf());
    assert!(store.list_nodes().unwrap().is_empty());
    assert!(store.list_anchors().unwrap().is_empty());
    assert!(store.list_links().unwrap().is_empty());
}

#[test]
fn missing_data_dir_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let api = VaultApi::new(FileStore::open(dir.path().join("not-yet")));
    assert_eq!(api.find_roots().unwrap().payload, Some(vec![]));
}

#[test]
fn malformed_ids_are_misses_not_faults() {
    let dir = TempDir::new().unwrap();
    let mut api = open(&dir);
    let look = api
        .create_from_draft(NodeDraft::new(NodeType::Outfit, "Look"))
        .unwrap()
        .payload
        .unwrap();

    let missing = api.get_node(&NodeId::from("outfit.a b")).unwrap();
    assert!(!missing.success);

    let found = api
        .get_nodes_by_id(&[look.node_id.clone(), NodeId::from("outfit/x")])
        .unwrap()
        .payload
        .unwrap();
    assert_eq!(found, vec![look.clone()]);

    assert!(api.delete_links(&[LinkId::from("link x")]).unwrap().success);
    assert!(api.delete_anchor(&AnchorId::from("anchor x")).unwrap().success);
    assert!(api.delete_node(&NodeId::from("../outfit")).unwrap().success);

    let moved = api
        .move_node(&look.node_id, &MoveTarget::Node(NodeId::from("outfit x")))
        .unwrap();
    assert!(!moved.success);
    assert!(api.get_node(&look.node_id).unwrap().payload.unwrap().is_root());
}
