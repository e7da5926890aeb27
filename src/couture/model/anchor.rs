use super::extent::Extent;
use super::id::{AnchorId, NodeId};
use serde::{Deserialize, Serialize};

/// A marker on one node's content. `extent` is `None` when the anchor covers
/// the node as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub anchor_id: AnchorId,
    pub node_id: NodeId,
    pub extent: Option<Extent>,
}

impl Anchor {
    pub fn new(node_id: NodeId, extent: Option<Extent>) -> Self {
        Self {
            anchor_id: AnchorId::generate(),
            node_id,
            extent,
        }
    }
}
