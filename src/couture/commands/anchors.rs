use crate::commands::links::delete_for_anchor;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Anchor, AnchorId, Extent, LinkId, NodeId};
use crate::store::DataStore;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What an anchor removal took with it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRemoval {
    pub removed_anchors: Vec<AnchorId>,
    pub removed_links: Vec<LinkId>,
    /// Anchors an orphan cleanup chose to keep.
    pub kept_anchors: Vec<AnchorId>,
}

impl AnchorRemoval {
    fn absorb(&mut self, other: AnchorRemoval) {
        self.removed_anchors.extend(other.removed_anchors);
        self.removed_links.extend(other.removed_links);
        self.kept_anchors.extend(other.kept_anchors);
    }

    fn describe(&self) -> String {
        format!(
            "Removed {} anchor(s) and {} link(s)",
            self.removed_anchors.len(),
            self.removed_links.len()
        )
    }
}

fn check_extent(extent: Option<&Extent>) -> Result<()> {
    match extent {
        Some(extent) => extent.validate(),
        None => Ok(()),
    }
}

/// Marks a region of an existing node. `None` marks the node as a whole.
pub fn create<S: DataStore>(
    store: &mut S,
    node_id: &NodeId,
    extent: Option<Extent>,
) -> Result<CmdResult<Anchor>> {
    check_extent(extent.as_ref())?;
    store.get_node(node_id)?;

    let anchor = Anchor::new(node_id.clone(), extent);
    store.save_anchor(&anchor)?;
    info!(anchor_id = %anchor.anchor_id, node_id = %node_id, "created anchor");
    Ok(CmdResult::new(anchor).with_message(CmdMessage::success("Anchor created")))
}

pub fn get<S: DataStore>(store: &S, id: &AnchorId) -> Result<CmdResult<Anchor>> {
    Ok(CmdResult::new(store.get_anchor(id)?))
}

/// Found anchors in request order. Unknown ids are skipped.
pub fn get_by_ids<S: DataStore>(store: &S, ids: &[AnchorId]) -> Result<CmdResult<Vec<Anchor>>> {
    let mut anchors = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(anchor) = store.find_anchor(id)? {
            anchors.push(anchor);
        }
    }
    Ok(CmdResult::new(anchors))
}

pub fn get_by_node<S: DataStore>(store: &S, node_id: &NodeId) -> Result<CmdResult<Vec<Anchor>>> {
    Ok(CmdResult::new(store.anchors_for_node(node_id)?))
}

pub fn update_extent<S: DataStore>(
    store: &mut S,
    id: &AnchorId,
    extent: Option<Extent>,
) -> Result<CmdResult<Anchor>> {
    check_extent(extent.as_ref())?;
    let mut anchor = store.get_anchor(id)?;
    anchor.extent = extent;
    store.save_anchor(&anchor)?;
    info!(anchor_id = %id, "updated anchor extent");
    Ok(CmdResult::new(anchor).with_message(CmdMessage::success("Anchor updated")))
}

/// Removes the links touching an anchor, then the anchor. Links go first so an
/// interruption never leaves a link pointing at a missing anchor.
fn remove_anchor<S: DataStore>(store: &mut S, id: &AnchorId) -> Result<AnchorRemoval> {
    let removed_links = delete_for_anchor(store, id)?;
    let mut removal = AnchorRemoval {
        removed_links,
        ..AnchorRemoval::default()
    };
    if store.delete_anchor(id)? {
        removal.removed_anchors.push(id.clone());
    } else {
        debug!(anchor_id = %id, "anchor already gone");
    }
    Ok(removal)
}

/// Deletes an anchor and every link touching it. Deleting a missing anchor
/// succeeds and removes nothing.
pub fn delete<S: DataStore>(store: &mut S, id: &AnchorId) -> Result<CmdResult<AnchorRemoval>> {
    let removal = remove_anchor(store, id)?;
    let message = CmdMessage::success(removal.describe());
    Ok(CmdResult::new(removal).with_message(message))
}

/// Deletes every anchor on a node, each with its links.
pub fn delete_by_node<S: DataStore>(
    store: &mut S,
    node_id: &NodeId,
) -> Result<CmdResult<AnchorRemoval>> {
    let mut removal = AnchorRemoval::default();
    for anchor in store.anchors_for_node(node_id)? {
        removal.absorb(remove_anchor(store, &anchor.anchor_id)?);
    }
    let message = CmdMessage::success(removal.describe());
    Ok(CmdResult::new(removal).with_message(message))
}

/// Drops anchors on `node_id` that the node's editor no longer references.
///
/// | Links on the anchor | Outcome |
/// |---------------------|---------|
/// | 0 | anchor removed |
/// | 1 | anchor and its link removed |
/// | 2 or more | anchor kept |
///
/// An anchor with several links is ambiguous: the other ends may still want
/// it, so it stays and is reported in `kept_anchors`.
pub fn cleanup_orphans<S: DataStore>(
    store: &mut S,
    node_id: &NodeId,
    referenced: &[AnchorId],
) -> Result<CmdResult<AnchorRemoval>> {
    let referenced: HashSet<&AnchorId> = referenced.iter().collect();
    let mut removal = AnchorRemoval::default();

    for anchor in store.anchors_for_node(node_id)? {
        if referenced.contains(&anchor.anchor_id) {
            continue;
        }
        let links = store.links_for_anchor(&anchor.anchor_id)?.len();
        if links <= 1 {
            removal.absorb(remove_anchor(store, &anchor.anchor_id)?);
        } else {
            warn!(anchor_id = %anchor.anchor_id, links, "keeping unreferenced anchor with several links");
            removal.kept_anchors.push(anchor.anchor_id);
        }
    }

    let mut result = CmdResult::new(removal);
    let message = CmdMessage::success(result.payload.describe());
    result.add_message(message);
    if !result.payload.kept_anchors.is_empty() {
        let warning = CmdMessage::warning(format!(
            "Kept {} unreferenced anchor(s) with several links",
            result.payload.kept_anchors.len()
        ));
        result.add_message(warning);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use crate::model::{Node, NodeType};
    use crate::store::memory::fixtures::StoreFixture;

    fn two_nodes(f: &mut StoreFixture) -> (Node, Node) {
        (f.text("N1", "hello world", None), f.node(NodeType::Image, "N2", None))
    }

    #[test]
    fn create_requires_node() {
        let mut f = StoreFixture::new();
        let err = create(&mut f.store, &NodeId::from("text.none"), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn create_rejects_bad_text_extent() {
        let mut f = StoreFixture::new();
        let (n1, _) = two_nodes(&mut f);
        let bad = Extent::Text {
            start_character: 5,
            end_character: 0,
            text: "hello".into(),
        };
        let err = create(&mut f.store, &n1.node_id, Some(bad)).unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
        assert!(f.store.list_anchors().unwrap().is_empty());
    }

    #[test]
    fn lookups() {
        let mut f = StoreFixture::new();
        let (n1, n2) = two_nodes(&mut f);
        let a1 = create(&mut f.store, &n1.node_id, Some(Extent::text("hello", 0)))
            .unwrap()
            .payload;
        create(&mut f.store, &n2.node_id, None).unwrap();

        assert_eq!(get(&f.store, &a1.anchor_id).unwrap().payload, a1);
        assert_eq!(get_by_node(&f.store, &n1.node_id).unwrap().payload, vec![a1.clone()]);
        assert!(get_by_node(&f.store, &NodeId::from("text.none"))
            .unwrap()
            .payload
            .is_empty());
        let found = get_by_ids(&f.store, &[AnchorId::from("anchor.none"), a1.anchor_id.clone()])
            .unwrap()
            .payload;
        assert_eq!(found, vec![a1]);
    }

    #[test]
    fn update_extent_replaces_region() {
        let mut f = StoreFixture::new();
        let (n1, _) = two_nodes(&mut f);
        let a1 = f.anchor(&n1, Some(Extent::text("hello", 0)));
        let updated = update_extent(&mut f.store, &a1.anchor_id, Some(Extent::text("world", 6)))
            .unwrap()
            .payload;
        assert_eq!(updated.extent, Some(Extent::text("world", 6)));
        assert_eq!(f.store.get_anchor(&a1.anchor_id).unwrap(), updated);

        let err = update_extent(&mut f.store, &AnchorId::from("anchor.none"), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_cascades_to_links() {
        let mut f = StoreFixture::new();
        let (n1, n2) = two_nodes(&mut f);
        let a1 = f.anchor(&n1, Some(Extent::text("hello", 0)));
        let a2 = f.anchor(&n2, None);
        let link = f.link(&a1, &a2);

        let removal = delete(&mut f.store, &a1.anchor_id).unwrap().payload;
        assert_eq!(removal.removed_anchors, vec![a1.anchor_id.clone()]);
        assert_eq!(removal.removed_links, vec![link.link_id]);
        assert!(f.store.links_for_anchor(&a2.anchor_id).unwrap().is_empty());
        assert!(f.store.find_anchor(&a2.anchor_id).unwrap().is_some());

        let again = delete(&mut f.store, &a1.anchor_id).unwrap().payload;
        assert_eq!(again, AnchorRemoval::default());
    }

    #[test]
    fn delete_by_node_removes_all_anchors_there() {
        let mut f = StoreFixture::new();
        let (n1, n2) = two_nodes(&mut f);
        let a1 = f.anchor(&n1, None);
        let a2 = f.anchor(&n1, Some(Extent::text("world", 6)));
        let b = f.anchor(&n2, None);
        f.link(&a1, &b);
        f.link(&a2, &b);

        let removal = delete_by_node(&mut f.store, &n1.node_id).unwrap().payload;
        assert_eq!(removal.removed_anchors.len(), 2);
        assert_eq!(removal.removed_links.len(), 2);
        assert_eq!(f.store.list_anchors().unwrap(), vec![b]);
    }

    #[test]
    fn orphan_cleanup_policy() {
        let mut f = StoreFixture::new();
        let (n1, n2) = two_nodes(&mut f);
        let kept_by_editor = f.anchor(&n1, None);
        let no_links = f.anchor(&n1, None);
        let one_link = f.anchor(&n1, None);
        let many_links = f.anchor(&n1, None);
        let far1 = f.anchor(&n2, None);
        let far2 = f.anchor(&n2, None);
        f.link(&kept_by_editor, &far1);
        let single = f.link(&one_link, &far1);
        f.link(&many_links, &far1);
        f.link(&many_links, &far2);

        let result = cleanup_orphans(
            &mut f.store,
            &n1.node_id,
            std::slice::from_ref(&kept_by_editor.anchor_id),
        )
        .unwrap();
        let removal = &result.payload;

        let removed: HashSet<_> = removal.removed_anchors.iter().cloned().collect();
        assert_eq!(
            removed,
            HashSet::from([no_links.anchor_id.clone(), one_link.anchor_id.clone()])
        );
        assert_eq!(removal.removed_links, vec![single.link_id]);
        assert_eq!(removal.kept_anchors, vec![many_links.anchor_id.clone()]);
        assert!(f.store.find_anchor(&kept_by_editor.anchor_id).unwrap().is_some());
        assert!(f.store.find_anchor(&many_links.anchor_id).unwrap().is_some());
        assert_eq!(f.store.links_for_anchor(&many_links.anchor_id).unwrap().len(), 2);
        assert!(result.messages.iter().any(|m| m.content.contains("Kept 1")));
    }
}
