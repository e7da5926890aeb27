//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every vault operation, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (raw JSON extents, move targets)
//! - **Shapes responses** into [`ServiceResponse`]: `{success, payload?, message?}`
//!
//! ## Expected Failures vs Faults
//!
//! A missing id, a bad field value or a rejected move is part of normal
//! operation. Those come back as `Ok(ServiceResponse { success: false, .. })`
//! with the error text as `message`, and never with a partial payload.
//! Infrastructure failures (I/O, corrupt documents, backend errors) are not
//! something a caller can act on per request, so they propagate as `Err`.
//!
//! ## Generic Over DataStore
//!
//! `VaultApi<S: DataStore>` is generic over the storage backend:
//! - Production: `VaultApi<FileStore>`
//! - Testing: `VaultApi<InMemoryStore>`
//!
//! ## Testing Strategy
//!
//! API tests verify dispatch and response shaping. Command logic is tested in
//! the command modules, storage behavior in the store modules.

use crate::commands::{self, CmdMessage, CmdResult};
use crate::commands::anchors::AnchorRemoval;
use crate::commands::delete::NodeDeletion;
use crate::commands::get::NodeTree;
use crate::commands::move_node::MoveTarget;
use crate::commands::search::SearchQuery;
use crate::error::Result;
use crate::fields::NodeProperty;
use crate::model::{Anchor, AnchorId, Extent, Link, LinkId, Node, NodeDraft, NodeId};
use crate::store::{DataStore, DoctorReport};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Traversal guard used when no configuration says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tagged result handed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The individual messages behind `message`, for clients that style them
    /// by level.
    #[serde(skip)]
    pub messages: Vec<CmdMessage>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(result: CmdResult<T>) -> Self {
        Self {
            success: true,
            message: result.summary(),
            payload: Some(result.payload),
            messages: result.messages,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            payload: None,
            messages: vec![CmdMessage::error(message.clone())],
            message: Some(message),
        }
    }
}

/// Turns a command outcome into a response. Expected errors become
/// unsuccessful responses; anything else is returned as `Err`.
pub fn respond<T>(outcome: Result<CmdResult<T>>) -> Result<ServiceResponse<T>> {
    match outcome {
        Ok(result) => Ok(ServiceResponse::ok(result)),
        Err(err) if err.is_expected() => {
            debug!(error = %err, "request failed");
            Ok(ServiceResponse::failure(err.to_string()))
        }
        Err(err) => Err(err),
    }
}

/// The main API facade for vault operations.
pub struct VaultApi<S: DataStore> {
    store: S,
    max_depth: usize,
}

impl<S: DataStore> VaultApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_max_depth(store, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(store: S, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // --- Nodes ---

    pub fn create_node(&mut self, node: Node) -> Result<ServiceResponse<Node>> {
        respond(commands::create::run(&mut self.store, node))
    }

    pub fn create_from_draft(&mut self, draft: NodeDraft) -> Result<ServiceResponse<Node>> {
        respond(commands::create::from_draft(&mut self.store, draft))
    }

    pub fn create_from_draft_with(
        &mut self,
        draft: NodeDraft,
        fields: &[NodeProperty],
    ) -> Result<ServiceResponse<Node>> {
        respond(commands::create::from_draft_with_fields(
            &mut self.store,
            draft,
            fields,
        ))
    }

    pub fn get_node(&self, id: &NodeId) -> Result<ServiceResponse<Node>> {
        respond(commands::get::get_node(&self.store, id))
    }

    pub fn get_nodes_by_id(&self, ids: &[NodeId]) -> Result<ServiceResponse<Vec<Node>>> {
        respond(commands::get::get_nodes_by_id(&self.store, ids))
    }

    pub fn update_node(
        &mut self,
        id: &NodeId,
        properties: &[NodeProperty],
    ) -> Result<ServiceResponse<Node>> {
        respond(commands::update::run(
            &mut self.store,
            id,
            properties,
            self.max_depth,
        ))
    }

    pub fn delete_node(&mut self, id: &NodeId) -> Result<ServiceResponse<NodeDeletion>> {
        respond(commands::delete::run(&mut self.store, id, self.max_depth))
    }

    pub fn move_node(&mut self, id: &NodeId, target: &MoveTarget) -> Result<ServiceResponse<Node>> {
        respond(commands::move_node::run(
            &mut self.store,
            id,
            target,
            self.max_depth,
        ))
    }

    pub fn find_roots(&self) -> Result<ServiceResponse<Vec<Node>>> {
        respond(commands::get::find_roots(&self.store))
    }

    /// Plain term search, ranked by relevance.
    pub fn search(&self, term: &str) -> Result<ServiceResponse<Vec<Node>>> {
        self.search_with(&SearchQuery::new(term))
    }

    pub fn search_with(&self, query: &SearchQuery) -> Result<ServiceResponse<Vec<Node>>> {
        respond(commands::search::run(&self.store, query))
    }

    pub fn get_tree(&self, id: &NodeId) -> Result<ServiceResponse<NodeTree>> {
        respond(commands::get::get_tree(&self.store, id, self.max_depth))
    }

    pub fn find_root_trees(&self) -> Result<ServiceResponse<Vec<NodeTree>>> {
        respond(commands::get::find_root_trees(&self.store, self.max_depth))
    }

    pub fn outfit_total(&self, id: &NodeId) -> Result<ServiceResponse<f64>> {
        respond(commands::get::outfit_total(&self.store, id))
    }

    pub fn add_comment(
        &mut self,
        node_id: &NodeId,
        name: &str,
        comment: &str,
    ) -> Result<ServiceResponse<Node>> {
        respond(commands::comments::add(&mut self.store, node_id, name, comment))
    }

    // --- Anchors ---

    /// `extent` is the raw JSON shape; `null` anchors the node as a whole.
    pub fn create_anchor(&mut self, node_id: &NodeId, extent: Value) -> Result<ServiceResponse<Anchor>> {
        respond(
            Extent::from_value(extent)
                .and_then(|extent| commands::anchors::create(&mut self.store, node_id, extent)),
        )
    }

    pub fn get_anchor(&self, id: &AnchorId) -> Result<ServiceResponse<Anchor>> {
        respond(commands::anchors::get(&self.store, id))
    }

    pub fn get_anchors_by_id(&self, ids: &[AnchorId]) -> Result<ServiceResponse<Vec<Anchor>>> {
        respond(commands::anchors::get_by_ids(&self.store, ids))
    }

    pub fn get_anchors_by_node_id(&self, node_id: &NodeId) -> Result<ServiceResponse<Vec<Anchor>>> {
        respond(commands::anchors::get_by_node(&self.store, node_id))
    }

    pub fn update_extent(&mut self, id: &AnchorId, extent: Value) -> Result<ServiceResponse<Anchor>> {
        respond(
            Extent::from_value(extent)
                .and_then(|extent| commands::anchors::update_extent(&mut self.store, id, extent)),
        )
    }

    pub fn delete_anchor(&mut self, id: &AnchorId) -> Result<ServiceResponse<AnchorRemoval>> {
        respond(commands::anchors::delete(&mut self.store, id))
    }

    pub fn delete_anchors_by_node_id(
        &mut self,
        node_id: &NodeId,
    ) -> Result<ServiceResponse<AnchorRemoval>> {
        respond(commands::anchors::delete_by_node(&mut self.store, node_id))
    }

    pub fn cleanup_orphan_anchors(
        &mut self,
        node_id: &NodeId,
        referenced: &[AnchorId],
    ) -> Result<ServiceResponse<AnchorRemoval>> {
        respond(commands::anchors::cleanup_orphans(
            &mut self.store,
            node_id,
            referenced,
        ))
    }

    // --- Links ---

    pub fn create_link(
        &mut self,
        anchor1_id: &AnchorId,
        anchor1_node_id: &NodeId,
        anchor2_id: &AnchorId,
        anchor2_node_id: &NodeId,
    ) -> Result<ServiceResponse<Link>> {
        respond(commands::links::create(
            &mut self.store,
            anchor1_id,
            anchor1_node_id,
            anchor2_id,
            anchor2_node_id,
        ))
    }

    pub fn get_link(&self, id: &LinkId) -> Result<ServiceResponse<Link>> {
        respond(commands::links::get(&self.store, id))
    }

    pub fn get_links_by_anchor_id(&self, anchor_id: &AnchorId) -> Result<ServiceResponse<Vec<Link>>> {
        respond(commands::links::get_by_anchor(&self.store, anchor_id))
    }

    pub fn get_links_by_node_id(&self, node_id: &NodeId) -> Result<ServiceResponse<Vec<Link>>> {
        respond(commands::links::get_by_node(&self.store, node_id))
    }

    pub fn delete_links(&mut self, ids: &[LinkId]) -> Result<ServiceResponse<Vec<LinkId>>> {
        respond(commands::links::delete_links(&mut self.store, ids))
    }

    // --- Maintenance ---

    pub fn doctor(&mut self) -> Result<ServiceResponse<DoctorReport>> {
        respond(commands::doctor::run(&mut self.store))
    }

    pub fn clear_all(&mut self) -> Result<ServiceResponse<()>> {
        respond(commands::clear::run(&mut self.store))
    }
}
