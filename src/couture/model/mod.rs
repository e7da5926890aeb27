//! # Domain Model
//!
//! Plain data for the three kinds of documents the vault stores:
//!
//! - [`Node`]: an element of the tree (outfit, clothing item, text, image, ...)
//! - [`Anchor`]: a marked region ([`Extent`]) of one node's content
//! - [`Link`]: an edge between two anchors, possibly on different nodes
//!
//! Nodes own their position through [`NodePath`]. Anchors refer to a node by
//! id and links refer to two anchors by id; neither holds the referenced
//! document, and consistency between them is kept by the cascade rules in
//! `commands`.

pub mod anchor;
pub mod extent;
pub mod id;
pub mod link;
pub mod node;
pub mod path;

pub use anchor::Anchor;
pub use extent::Extent;
pub use id::{AnchorId, LinkId, NodeId};
pub use link::Link;
pub use node::{
    ClothingDetails, ClothingType, Comment, ImageDetails, Node, NodeDetails, NodeDraft, NodeType,
    OutfitDetails, ViewType, CLOTHING_TYPES, NODE_TYPES,
};
pub use path::{is_descendant_path, is_valid_path, make_path, NodePath};
