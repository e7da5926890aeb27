//! # Nodes
//!
//! A node is one element of the vault tree. Common fields (id, title, content,
//! path, creation date, comments) live on [`Node`]; everything that only makes
//! sense for one node type lives in the matching [`NodeDetails`] variant, so a
//! `price` can only ever exist on a clothing item and a `viewType` only on an
//! outfit.
//!
//! ## Serialized Shape
//!
//! Details are flattened into the node document with `type` as the tag:
//!
//! ```json
//! {
//!   "nodeId": "clothingitem.9f1c...",
//!   "type": "clothingitem",
//!   "title": "Linen shirt",
//!   "content": "",
//!   "filePath": { "path": ["outfit.2b7e...", "clothingitem.9f1c..."], "children": [] },
//!   "dateCreated": "2024-05-01T10:00:00Z",
//!   "comments": [],
//!   "clothingType": "shirt",
//!   "price": 49.0
//! }
//! ```
//!
//! ## Nesting Rules
//!
//! | Child | Parent | Allowed |
//! |-------|--------|---------|
//! | outfit | outfit | no |
//! | outfit | clothingitem | no |
//! | clothingitem | clothingitem | no |
//! | anything else | anything | yes |

use super::id::{generate_id, NodeId};
use super::path::NodePath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Text,
    Image,
    Outfit,
    Media,
    ClothingItem,
    Pdf,
}

pub const NODE_TYPES: &[NodeType] = &[
    NodeType::Text,
    NodeType::Image,
    NodeType::Outfit,
    NodeType::Media,
    NodeType::ClothingItem,
    NodeType::Pdf,
];

impl NodeType {
    /// The stable id prefix and serialized tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Outfit => "outfit",
            NodeType::Media => "media",
            NodeType::ClothingItem => "clothingitem",
            NodeType::Pdf => "pdf",
        }
    }

    /// Checks the nesting rules for placing a node of this type directly
    /// under a parent of type `parent`. Returns the reason on violation.
    pub fn nesting_violation(&self, parent: NodeType) -> Option<&'static str> {
        match (self, parent) {
            (NodeType::Outfit, NodeType::Outfit) => {
                Some("an outfit cannot be placed inside another outfit")
            }
            (NodeType::Outfit, NodeType::ClothingItem) => {
                Some("an outfit cannot be placed inside a clothing item")
            }
            (NodeType::ClothingItem, NodeType::ClothingItem) => {
                Some("a clothing item cannot be placed inside another clothing item")
            }
            _ => None,
        }
    }

    pub fn generate_id(&self) -> NodeId {
        NodeId::new(generate_id(self.as_str()))
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NODE_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    Shirt,
    Sweater,
    Coat,
    Hoodie,
    Top,
    Dress,
    Jeans,
    Pants,
    Skirt,
    Shorts,
    Shoes,
    Lingerie,
    Loungewear,
    Accessory,
}

pub const CLOTHING_TYPES: &[ClothingType] = &[
    ClothingType::Shirt,
    ClothingType::Sweater,
    ClothingType::Coat,
    ClothingType::Hoodie,
    ClothingType::Top,
    ClothingType::Dress,
    ClothingType::Jeans,
    ClothingType::Pants,
    ClothingType::Skirt,
    ClothingType::Shorts,
    ClothingType::Shoes,
    ClothingType::Lingerie,
    ClothingType::Loungewear,
    ClothingType::Accessory,
];

impl ClothingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Shirt => "shirt",
            ClothingType::Sweater => "sweater",
            ClothingType::Coat => "coat",
            ClothingType::Hoodie => "hoodie",
            ClothingType::Top => "top",
            ClothingType::Dress => "dress",
            ClothingType::Jeans => "jeans",
            ClothingType::Pants => "pants",
            ClothingType::Skirt => "skirt",
            ClothingType::Shorts => "shorts",
            ClothingType::Shoes => "shoes",
            ClothingType::Lingerie => "lingerie",
            ClothingType::Loungewear => "loungewear",
            ClothingType::Accessory => "accessory",
        }
    }
}

impl std::fmt::Display for ClothingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLOTHING_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown clothing type '{}'", s))
    }
}

/// How an outfit lists its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(ViewType::Grid),
            "list" => Ok(ViewType::List),
            other => Err(format!("unknown view type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutfitDetails {
    pub view_type: ViewType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClothingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing_type: Option<ClothingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Type-specific part of a node, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDetails {
    Text,
    Image(ImageDetails),
    Outfit(OutfitDetails),
    Media,
    #[serde(rename = "clothingitem")]
    ClothingItem(ClothingDetails),
    Pdf,
}

impl NodeDetails {
    /// Details with every optional field unset.
    pub fn empty(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Text => NodeDetails::Text,
            NodeType::Image => NodeDetails::Image(ImageDetails::default()),
            NodeType::Outfit => NodeDetails::Outfit(OutfitDetails::default()),
            NodeType::Media => NodeDetails::Media,
            NodeType::ClothingItem => NodeDetails::ClothingItem(ClothingDetails::default()),
            NodeType::Pdf => NodeDetails::Pdf,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeDetails::Text => NodeType::Text,
            NodeDetails::Image(_) => NodeType::Image,
            NodeDetails::Outfit(_) => NodeType::Outfit,
            NodeDetails::Media => NodeType::Media,
            NodeDetails::ClothingItem(_) => NodeType::ClothingItem,
            NodeDetails::Pdf => NodeType::Pdf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: NodeId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub file_path: NodePath,
    #[serde(default = "Utc::now")]
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub details: NodeDetails,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        self.details.node_type()
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.file_path.parent_id()
    }

    pub fn is_root(&self) -> bool {
        self.file_path.is_root()
    }

    /// Price of a clothing item; `None` for every other node type.
    pub fn price(&self) -> Option<f64> {
        match &self.details {
            NodeDetails::ClothingItem(details) => details.price,
            _ => None,
        }
    }
}

/// What a caller knows when creating a node through the UI: its type-specific
/// details, title, content and (optionally) the parent it goes under.
#[derive(Debug, Clone)]
pub struct NodeDraft {
    pub details: NodeDetails,
    pub title: String,
    pub content: String,
    pub parent: Option<NodeId>,
}

impl NodeDraft {
    pub fn new(node_type: NodeType, title: impl Into<String>) -> Self {
        Self {
            details: NodeDetails::empty(node_type),
            title: title.into(),
            content: String::new(),
            parent: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_details(mut self, details: NodeDetails) -> Self {
        self.details = details;
        self
    }

    pub fn under(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Materializes the draft with a fresh id. `parent_path` must be the
    /// path of `self.parent` when one is set.
    pub fn build(self, parent_path: Option<&NodePath>) -> Node {
        let node_id = self.details.node_type().generate_id();
        let file_path = match parent_path {
            Some(parent) => parent.child(node_id.clone()),
            None => NodePath::root(node_id.clone()),
        };
        Node {
            node_id,
            title: self.title,
            content: self.content,
            file_path,
            date_created: Utc::now(),
            comments: Vec::new(),
            details: self.details,
        }
    }
}
