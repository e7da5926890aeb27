use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::model::{AnchorId, Link, LinkId, NodeId};
use crate::store::DataStore;
use tracing::{debug, info};

/// Connects two existing anchors. The node ids must be the nodes the anchors
/// actually sit on.
pub fn create<S: DataStore>(
    store: &mut S,
    anchor1_id: &AnchorId,
    anchor1_node_id: &NodeId,
    anchor2_id: &AnchorId,
    anchor2_node_id: &NodeId,
) -> Result<CmdResult<Link>> {
    if anchor1_id == anchor2_id {
        return Err(VaultError::Validation(
            "a link needs two different anchors".to_string(),
        ));
    }

    for (anchor_id, node_id) in [(anchor1_id, anchor1_node_id), (anchor2_id, anchor2_node_id)] {
        let anchor = store.get_anchor(anchor_id)?;
        if &anchor.node_id != node_id {
            return Err(VaultError::Validation(format!(
                "anchor '{}' is on node '{}', not '{}'",
                anchor_id, anchor.node_id, node_id
            )));
        }
    }

    let link = Link::new(
        anchor1_id.clone(),
        anchor1_node_id.clone(),
        anchor2_id.clone(),
        anchor2_node_id.clone(),
    );
    store.save_link(&link)?;
    info!(link_id = %link.link_id, "created link");
    Ok(CmdResult::new(link).with_message(CmdMessage::success("Link created")))
}

pub fn get<S: DataStore>(store: &S, id: &LinkId) -> Result<CmdResult<Link>> {
    Ok(CmdResult::new(store.get_link(id)?))
}

/// Links with `anchor_id` at either end.
pub fn get_by_anchor<S: DataStore>(store: &S, anchor_id: &AnchorId) -> Result<CmdResult<Vec<Link>>> {
    Ok(CmdResult::new(store.links_for_anchor(anchor_id)?))
}

/// Links with an end on `node_id`.
pub fn get_by_node<S: DataStore>(store: &S, node_id: &NodeId) -> Result<CmdResult<Vec<Link>>> {
    Ok(CmdResult::new(store.links_for_node(node_id)?))
}

/// Deletes every listed link that exists. Returns the ids actually removed;
/// unknown ids are skipped.
pub fn delete_links<S: DataStore>(store: &mut S, ids: &[LinkId]) -> Result<CmdResult<Vec<LinkId>>> {
    let mut removed = Vec::new();
    for id in ids {
        if store.delete_link(id)? {
            removed.push(id.clone());
        } else {
            debug!(link_id = %id, "link already gone");
        }
    }
    let message = CmdMessage::success(format!("Deleted {} link(s)", removed.len()));
    Ok(CmdResult::new(removed).with_message(message))
}

/// Removes every link touching `anchor_id`. Used by anchor deletion.
pub(crate) fn delete_for_anchor<S: DataStore>(
    store: &mut S,
    anchor_id: &AnchorId,
) -> Result<Vec<LinkId>> {
    let ids: Vec<LinkId> = store
        .links_for_anchor(anchor_id)?
        .into_iter()
        .map(|l| l.link_id)
        .collect();
    Ok(delete_links(store, &ids)?.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extent;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn create_and_lookup_from_both_ends() {
        let mut f = StoreFixture::new();
        let n1 = f.text("N1", "hello", None);
        let n2 = f.node(crate::model::NodeType::Image, "N2", None);
        let a1 = f.anchor(&n1, Some(Extent::text("hello", 0)));
        let a2 = f.anchor(
            &n2,
            Some(Extent::Image {
                left: 0.0,
                top: 0.0,
                width: 10.0,
                height: 10.0,
            }),
        );

        let link = create(&mut f.store, &a1.anchor_id, &n1.node_id, &a2.anchor_id, &n2.node_id)
            .unwrap()
            .payload;
        assert!(link.link_id.as_str().starts_with("link."));

        let from_a1 = get_by_anchor(&f.store, &a1.anchor_id).unwrap().payload;
        assert_eq!(from_a1.len(), 1);
        assert_eq!(
            from_a1[0].other_end(&a1.anchor_id).map(|(a, _)| a.clone()),
            Some(a2.anchor_id.clone())
        );
        assert_eq!(get_by_node(&f.store, &n2.node_id).unwrap().payload, vec![link.clone()]);
        assert_eq!(get(&f.store, &link.link_id).unwrap().payload, link);
    }

    #[test]
    fn create_requires_existing_anchors() {
        let mut f = StoreFixture::new();
        let n1 = f.text("N1", "", None);
        let a1 = f.anchor(&n1, None);
        let err = create(
            &mut f.store,
            &a1.anchor_id,
            &n1.node_id,
            &AnchorId::from("anchor.gone"),
            &n1.node_id,
        )
        .unwrap_err();
        assert!(err.is_not_found());
        assert!(f.store.list_links().unwrap().is_empty());
    }

    #[test]
    fn create_checks_node_ids() {
        let mut f = StoreFixture::new();
        let n1 = f.text("N1", "", None);
        let n2 = f.text("N2", "", None);
        let a1 = f.anchor(&n1, None);
        let a2 = f.anchor(&n2, None);
        let err = create(&mut f.store, &a1.anchor_id, &n2.node_id, &a2.anchor_id, &n2.node_id)
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[test]
    fn self_link_rejected() {
        let mut f = StoreFixture::new();
        let n1 = f.text("N1", "", None);
        let a1 = f.anchor(&n1, None);
        assert!(create(&mut f.store, &a1.anchor_id, &n1.node_id, &a1.anchor_id, &n1.node_id).is_err());
    }

    #[test]
    fn delete_links_is_idempotent() {
        let mut f = StoreFixture::new();
        let n1 = f.text("N1", "", None);
        let a1 = f.anchor(&n1, None);
        let a2 = f.anchor(&n1, None);
        let link = f.link(&a1, &a2);

        let ids = vec![link.link_id.clone(), LinkId::from("link.never")];
        let removed = delete_links(&mut f.store, &ids).unwrap().payload;
        assert_eq!(removed, vec![link.link_id.clone()]);
        let again = delete_links(&mut f.store, &ids).unwrap().payload;
        assert!(again.is_empty());
    }

    #[test]
    fn missing_link_is_not_found() {
        let f = StoreFixture::new();
        assert!(get(&f.store, &LinkId::from("link.x")).unwrap_err().is_not_found());
    }
}
