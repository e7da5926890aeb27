use super::mem_backend::MemBackend;
use super::vault_store::VaultStore;

pub type InMemoryStore = VaultStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        VaultStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{
        Anchor, ClothingDetails, Extent, Link, Node, NodeDetails, NodeDraft, NodeType,
    };
    use crate::store::DataStore;

    /// Builds small vaults directly through the store, skipping command
    /// validation. Parents' `children` lists are left to derivation.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn node(&mut self, node_type: NodeType, title: &str, parent: Option<&Node>) -> Node {
            let node = NodeDraft::new(node_type, title).build(parent.map(|p| &p.file_path));
            self.store.save_node(&node).unwrap();
            node
        }

        pub fn outfit(&mut self, title: &str) -> Node {
            self.node(NodeType::Outfit, title, None)
        }

        pub fn clothing(&mut self, title: &str, price: Option<f64>, parent: &Node) -> Node {
            let details = NodeDetails::ClothingItem(ClothingDetails {
                price,
                ..ClothingDetails::default()
            });
            let node = NodeDraft::new(NodeType::ClothingItem, title)
                .with_details(details)
                .build(Some(&parent.file_path));
            self.store.save_node(&node).unwrap();
            node
        }

        pub fn text(&mut self, title: &str, content: &str, parent: Option<&Node>) -> Node {
            let node = NodeDraft::new(NodeType::Text, title)
                .with_content(content)
                .build(parent.map(|p| &p.file_path));
            self.store.save_node(&node).unwrap();
            node
        }

        pub fn anchor(&mut self, node: &Node, extent: Option<Extent>) -> Anchor {
            let anchor = Anchor::new(node.node_id.clone(), extent);
            self.store.save_anchor(&anchor).unwrap();
            anchor
        }

        pub fn link(&mut self, a: &Anchor, b: &Anchor) -> Link {
            let link = Link::new(
                a.anchor_id.clone(),
                a.node_id.clone(),
                b.anchor_id.clone(),
                b.node_id.clone(),
            );
            self.store.save_link(&link).unwrap();
            link
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use crate::model::NodeType;
    use crate::store::DataStore;

    #[test]
    fn fixture_builds_a_tree() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let shirt = f.clothing("Shirt", Some(12.0), &outfit);
        let note = f.node(NodeType::Text, "Note", Some(&shirt));

        assert_eq!(note.file_path.path.len(), 3);
        let loaded = f.store.get_node(&outfit.node_id).unwrap();
        assert_eq!(loaded.file_path.children, vec![shirt.node_id]);
    }

    #[test]
    fn fixture_links_anchors() {
        let mut f = StoreFixture::new();
        let a = f.text("A", "hello", None);
        let b = f.text("B", "world", None);
        let anchor_a = f.anchor(&a, None);
        let anchor_b = f.anchor(&b, None);
        let link = f.link(&anchor_a, &anchor_b);

        assert_eq!(f.store.links_for_anchor(&anchor_b.anchor_id).unwrap(), vec![link]);
        assert_eq!(f.store.anchors_for_node(&a.node_id).unwrap().len(), 1);
    }
}
