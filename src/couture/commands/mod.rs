//! # Command Layer
//!
//! This module contains the **core business logic** of the vault. Each
//! operation family lives in its own submodule and implements plain functions
//! generic over [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate input against the model's invariants (ids, paths, nesting, fields)
//! - Perform multi-document mutations as ordered single-document writes
//! - Run the cascades (node -> subtree -> anchors -> links)
//! - Return structured [`CmdResult`] values carrying a payload and messages
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Any I/O**: No stdout, stderr, file formatting, or terminal concerns
//! - **Argument parsing**: That's the CLI layer's job
//! - **Response shaping**: Turning errors into `{success: false}` is the API's job
//!
//! ## Cascades
//!
//! Deletes and moves touch many documents without a transaction. They walk the
//! subtree breadth-first over an id index, bounded by the configured maximum
//! depth, and each per-document step is idempotent: re-running an interrupted
//! cascade converges on the same end state. "Not found" inside a cascade means
//! "already done".
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.**
//!
//! Command tests should:
//! - Use `InMemoryStore` to avoid filesystem dependencies
//! - Test all logic branches and edge cases
//! - Verify that failed operations leave the store untouched
//!
//! ## Command Modules
//!
//! - [`create`]: Create nodes (from a full node or a draft)
//! - [`get`]: Node lookups, roots, trees, outfit totals
//! - [`update`]: Validated field updates
//! - [`delete`]: Cascading node delete
//! - [`move_node`]: Re-parent a node and its subtree
//! - [`search`]: Ranked free-text search
//! - [`comments`]: Append comments
//! - [`anchors`]: Anchor CRUD and orphan cleanup
//! - [`links`]: Link CRUD
//! - [`doctor`]: Verify and fix data consistency
//! - [`clear`]: Wipe the vault
//! - [`helpers`]: Shared validation and tree traversal

use serde::Serialize;

pub mod anchors;
pub mod clear;
pub mod comments;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod get;
pub mod helpers;
pub mod links;
pub mod move_node;
pub mod search;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command produced: the payload callers asked for, plus
/// human-readable messages describing what happened.
#[derive(Debug)]
pub struct CmdResult<T> {
    pub payload: T,
    pub messages: Vec<CmdMessage>,
}

impl<T> CmdResult<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// All message contents joined into one line, or `None` if there are none.
    pub fn summary(&self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }
        Some(
            self.messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
