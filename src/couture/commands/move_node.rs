use crate::commands::helpers::Tree;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::model::{is_descendant_path, Node, NodeId, NodePath};
use crate::store::DataStore;
use std::str::FromStr;
use tracing::{debug, info};

/// Where a node should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// Make the node a root.
    Root,
    /// Place the node directly under this parent.
    Node(NodeId),
}

/// Sentinel accepted wherever a target is parsed from text.
pub const ROOT_SENTINEL: &str = "root";

impl FromStr for MoveTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s == ROOT_SENTINEL {
            MoveTarget::Root
        } else {
            MoveTarget::Node(NodeId::from(s))
        })
    }
}

/// Checks that `node` may be placed under `parent` (`None` for root).
pub(crate) fn check_target(node: &Node, parent: Option<&Node>) -> Result<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    if parent.node_id == node.node_id {
        return Err(VaultError::InvalidMove(format!(
            "cannot move '{}' into itself",
            node.node_id
        )));
    }
    if is_descendant_path(&parent.file_path, &node.node_id) {
        return Err(VaultError::InvalidMove(format!(
            "cannot move '{}' into its own descendant '{}'",
            node.node_id, parent.node_id
        )));
    }
    if let Some(reason) = node.node_type().nesting_violation(parent.node_type()) {
        return Err(VaultError::InvalidMove(reason.to_string()));
    }
    Ok(())
}

/// Writes `node` at its new place and re-homes its subtree.
///
/// `node` carries the path it had before the move; everything else on it is
/// saved as given. Order of writes: the node, its descendants level by level,
/// the old parent, the new parent. An interruption leaves descendants with a
/// stale prefix, which `doctor` re-homes under their parent's current path.
pub(crate) fn relocate<S: DataStore>(
    store: &mut S,
    mut node: Node,
    new_parent: Option<Node>,
    max_depth: usize,
) -> Result<Node> {
    let tree = Tree::load(store)?;
    let levels = tree.levels(&node.node_id, max_depth)?;

    let old_parent_id = node.parent_id().cloned();
    let old_len = node.file_path.path.len();
    let new_path: NodePath = match &new_parent {
        Some(parent) => parent.file_path.child(node.node_id.clone()),
        None => NodePath::root(node.node_id.clone()),
    };

    node.file_path.path = new_path.path.clone();
    store.save_node(&node)?;

    let mut rewritten = 0;
    for level in levels.iter().skip(1) {
        for id in level {
            let Some(descendant) = tree.get(id) else {
                continue;
            };
            let mut descendant = descendant.clone();
            descendant.file_path = descendant.file_path.rebase(old_len, &new_path.path);
            store.save_node(&descendant)?;
            rewritten += 1;
        }
    }
    debug!(node_id = %node.node_id, descendants = rewritten, "rewrote descendant paths");

    if let Some(old_parent_id) = old_parent_id {
        if let Some(mut old_parent) = store.find_node(&old_parent_id)? {
            if old_parent.file_path.remove_child(&node.node_id) {
                store.save_node(&old_parent)?;
            }
        }
    }
    if let Some(parent) = new_parent {
        let mut parent = store.get_node(&parent.node_id)?;
        if parent.file_path.add_child(&node.node_id) {
            store.save_node(&parent)?;
        }
    }

    store.get_node(&node.node_id)
}

/// Moves a node (and its subtree) under a new parent or to the root level.
pub fn run<S: DataStore>(
    store: &mut S,
    id: &NodeId,
    target: &MoveTarget,
    max_depth: usize,
) -> Result<CmdResult<Node>> {
    let node = store.get_node(id)?;

    let new_parent = match target {
        MoveTarget::Root => None,
        MoveTarget::Node(parent_id) if parent_id == id => {
            return Err(VaultError::InvalidMove(format!(
                "cannot move '{}' into itself",
                id
            )));
        }
        MoveTarget::Node(parent_id) => Some(store.get_node(parent_id)?),
    };
    check_target(&node, new_parent.as_ref())?;

    let current_parent = node.parent_id();
    let target_parent = new_parent.as_ref().map(|p| &p.node_id);
    let already_there = current_parent == target_parent
        && new_parent
            .as_ref()
            .map_or(true, |p| p.file_path.path.as_slice() == node.file_path.ancestors());
    if already_there {
        let message = CmdMessage::info(format!("{} is already there", node.title));
        return Ok(CmdResult::new(node).with_message(message));
    }

    let moved = relocate(store, node, new_parent, max_depth)?;
    info!(node_id = %id, depth = moved.file_path.depth(), "moved node");
    let message = CmdMessage::success(format!("Moved {}", moved.title));
    Ok(CmdResult::new(moved).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn move_child_to_root() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let note = f.text("Note", "", Some(&outfit));

        let moved = run(&mut f.store, &note.node_id, &MoveTarget::Root, 64)
            .unwrap()
            .payload;
        assert!(moved.is_root());
        assert!(f
            .store
            .get_node(&outfit.node_id)
            .unwrap()
            .file_path
            .children
            .is_empty());
    }

    #[test]
    fn move_rewrites_descendant_prefixes() {
        let mut f = StoreFixture::new();
        let look = f.outfit("Look");
        let other = f.outfit("Other");
        let shirt = f.clothing("Shirt", None, &look);
        let note = f.text("Note", "", Some(&shirt));
        let deeper = f.text("Deeper", "", Some(&note));

        run(
            &mut f.store,
            &shirt.node_id,
            &MoveTarget::Node(other.node_id.clone()),
            64,
        )
        .unwrap();

        let deeper = f.store.get_node(&deeper.node_id).unwrap();
        assert_eq!(
            deeper.file_path.path,
            vec![
                other.node_id.clone(),
                shirt.node_id.clone(),
                note.node_id.clone(),
                deeper.node_id.clone()
            ]
        );
        assert_eq!(
            f.store.get_node(&other.node_id).unwrap().file_path.children,
            vec![shirt.node_id.clone()]
        );
        assert!(f
            .store
            .get_node(&look.node_id)
            .unwrap()
            .file_path
            .children
            .is_empty());
        assert_eq!(
            f.store.get_node(&shirt.node_id).unwrap().file_path.children,
            vec![note.node_id]
        );
    }

    #[test]
    fn rejects_self_and_descendant() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let note = f.text("Note", "", Some(&outfit));
        let deep = f.text("Deep", "", Some(&note));

        let err = run(
            &mut f.store,
            &note.node_id,
            &MoveTarget::Node(note.node_id.clone()),
            64,
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::InvalidMove(_)));

        let err = run(
            &mut f.store,
            &outfit.node_id,
            &MoveTarget::Node(deep.node_id.clone()),
            64,
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::InvalidMove(_)));
        assert!(f.store.get_node(&outfit.node_id).unwrap().is_root());
    }

    #[test]
    fn rejects_nesting_violations() {
        let mut f = StoreFixture::new();
        let a = f.outfit("A");
        let b = f.outfit("B");
        let shirt = f.clothing("Shirt", None, &a);
        let loose = f.node(NodeType::ClothingItem, "Loose", None);

        for (id, target) in [
            (&b.node_id, &a.node_id),
            (&b.node_id, &shirt.node_id),
            (&loose.node_id, &shirt.node_id),
        ] {
            let err = run(&mut f.store, id, &MoveTarget::Node(target.clone()), 64).unwrap_err();
            assert!(matches!(err, VaultError::InvalidMove(_)));
        }
        assert!(f.store.get_node(&b.node_id).unwrap().is_root());
        assert!(f.store.get_node(&loose.node_id).unwrap().is_root());
    }

    #[test]
    fn missing_target_is_not_found() {
        let mut f = StoreFixture::new();
        let note = f.text("Note", "", None);
        let err = run(
            &mut f.store,
            &note.node_id,
            &MoveTarget::Node(NodeId::from("outfit.gone")),
            64,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn move_to_current_parent_is_noop() {
        let mut f = StoreFixture::new();
        let outfit = f.outfit("Look");
        let note = f.text("Note", "", Some(&outfit));
        let result = run(
            &mut f.store,
            &note.node_id,
            &MoveTarget::Node(outfit.node_id.clone()),
            64,
        )
        .unwrap();
        assert!(result.messages[0].content.contains("already there"));
    }

    #[test]
    fn parses_root_sentinel() {
        assert_eq!("root".parse::<MoveTarget>(), Ok(MoveTarget::Root));
        assert_eq!(
            "outfit.a".parse::<MoveTarget>(),
            Ok(MoveTarget::Node(NodeId::from("outfit.a")))
        );
    }
}
