use super::id::{AnchorId, LinkId, NodeId};
use serde::{Deserialize, Serialize};

/// An undirected edge between two anchors. The node ids are copied from the
/// anchors at creation so callers can navigate without loading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub link_id: LinkId,
    pub anchor1_id: AnchorId,
    pub anchor1_node_id: NodeId,
    pub anchor2_id: AnchorId,
    pub anchor2_node_id: NodeId,
}

impl Link {
    pub fn new(
        anchor1_id: AnchorId,
        anchor1_node_id: NodeId,
        anchor2_id: AnchorId,
        anchor2_node_id: NodeId,
    ) -> Self {
        Self {
            link_id: LinkId::generate(),
            anchor1_id,
            anchor1_node_id,
            anchor2_id,
            anchor2_node_id,
        }
    }

    pub fn touches_anchor(&self, anchor_id: &AnchorId) -> bool {
        &self.anchor1_id == anchor_id || &self.anchor2_id == anchor_id
    }

    pub fn touches_node(&self, node_id: &NodeId) -> bool {
        &self.anchor1_node_id == node_id || &self.anchor2_node_id == node_id
    }

    /// The endpoint opposite `anchor_id`, as `(anchor, node)`.
    pub fn other_end(&self, anchor_id: &AnchorId) -> Option<(&AnchorId, &NodeId)> {
        if &self.anchor1_id == anchor_id {
            Some((&self.anchor2_id, &self.anchor2_node_id))
        } else if &self.anchor2_id == anchor_id {
            Some((&self.anchor1_id, &self.anchor1_node_id))
        } else {
            None
        }
    }
}
