use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::model::{Comment, Node, NodeId};
use crate::store::DataStore;
use tracing::info;

/// Appends a timestamped comment to a node. Comments are never edited in
/// place; the list only grows.
pub fn add<S: DataStore>(
    store: &mut S,
    node_id: &NodeId,
    name: &str,
    comment: &str,
) -> Result<CmdResult<Node>> {
    let name = name.trim();
    let comment = comment.trim();
    if name.is_empty() {
        return Err(VaultError::Validation("a comment needs a name".to_string()));
    }
    if comment.is_empty() {
        return Err(VaultError::Validation("a comment cannot be empty".to_string()));
    }

    let mut node = store.get_node(node_id)?;
    node.comments.push(Comment::new(name, comment));
    store.save_node(&node)?;

    info!(node_id = %node_id, comments = node.comments.len(), "added comment");
    let message = CmdMessage::success(format!("Comment added to {}", node.title));
    Ok(CmdResult::new(node).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn appends_in_order() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        add(&mut f.store, &outfit.node_id, "ana", "love the colours").unwrap();
        let node = add(&mut f.store, &outfit.node_id, "ben", "agreed").unwrap().payload;

        assert_eq!(node.comments.len(), 2);
        assert_eq!(node.comments[0].name, "ana");
        assert_eq!(node.comments[1].comment, "agreed");
        assert!(node.comments[0].timestamp <= node.comments[1].timestamp);
        assert_eq!(f.store.get_node(&outfit.node_id).unwrap().comments, node.comments);
    }

    #[test]
    fn rejects_blank_input() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        assert!(add(&mut f.store, &outfit.node_id, " ", "hi").is_err());
        assert!(add(&mut f.store, &outfit.node_id, "ana", "").is_err());
        assert!(f.store.get_node(&outfit.node_id).unwrap().comments.is_empty());
    }

    #[test]
    fn missing_node() {
        let mut f = StoreFixture::new();
        let err = add(&mut f.store, &NodeId::from("outfit.none"), "ana", "hi").unwrap_err();
        assert!(err.is_not_found());
    }
}
