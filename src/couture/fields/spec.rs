//! Field specifications and registry.
//!
//! Describes every node field that can be read or written by name: what kind
//! of value it holds, which node types carry it and whether `updateNode` may
//! touch it.

use crate::model::NodeType;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A prefixed entity id
    Id,

    /// A node type tag (`text`, `outfit`, ...)
    NodeType,

    /// Free text
    Text,

    /// Any finite number
    Number,

    /// A price, any finite number
    Price,

    /// One of the enumerated clothing types
    ClothingType,

    /// `grid` or `list`
    ViewType,

    /// A node path object (`{path, children}`)
    Path,

    /// The full, ordered comment list
    Comments,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Serialized field name (e.g. "title", "clothingType")
    pub name: &'static str,

    pub kind: FieldKind,

    /// Node types carrying this field. `None` means every node.
    pub only_for: Option<&'static [NodeType]>,

    /// Whether `updateNode` accepts this field
    pub updatable: bool,

    /// Whether `null` is accepted, clearing the field
    pub nullable: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            only_for: None,
            updatable: false,
            nullable: false,
        }
    }

    const fn updatable(mut self) -> Self {
        self.updatable = true;
        self
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    const fn only_for(mut self, types: &'static [NodeType]) -> Self {
        self.only_for = Some(types);
        self
    }

    pub fn applies_to(&self, node_type: NodeType) -> bool {
        match self.only_for {
            Some(types) => types.contains(&node_type),
            None => true,
        }
    }
}

const OUTFIT: &[NodeType] = &[NodeType::Outfit];
const IMAGE: &[NodeType] = &[NodeType::Image];
const CLOTHING: &[NodeType] = &[NodeType::ClothingItem];
const DESCRIBED: &[NodeType] = &[NodeType::Outfit, NodeType::ClothingItem];

/// Registry of all node fields. Adding a field means adding an entry here and
/// handling it in `Node::get_field` / `Node::set_field`.
pub const FIELDS: &[FieldSpec] = &[
    // Identity, fixed at creation
    FieldSpec::new("nodeId", FieldKind::Id),
    FieldSpec::new("type", FieldKind::NodeType),
    // Common
    FieldSpec::new("title", FieldKind::Text).updatable(),
    FieldSpec::new("content", FieldKind::Text).updatable(),
    FieldSpec::new("filePath", FieldKind::Path).updatable(),
    FieldSpec::new("comments", FieldKind::Comments).updatable(),
    // Outfit
    FieldSpec::new("viewType", FieldKind::ViewType)
        .updatable()
        .only_for(OUTFIT),
    FieldSpec::new("description", FieldKind::Text)
        .updatable()
        .nullable()
        .only_for(DESCRIBED),
    // Image
    FieldSpec::new("imageHeight", FieldKind::Number)
        .updatable()
        .nullable()
        .only_for(IMAGE),
    FieldSpec::new("imageWidth", FieldKind::Number)
        .updatable()
        .nullable()
        .only_for(IMAGE),
    FieldSpec::new("originalHeight", FieldKind::Number)
        .updatable()
        .nullable()
        .only_for(IMAGE),
    FieldSpec::new("originalWidth", FieldKind::Number)
        .updatable()
        .nullable()
        .only_for(IMAGE),
    // Clothing item
    FieldSpec::new("clothingType", FieldKind::ClothingType)
        .updatable()
        .nullable()
        .only_for(CLOTHING),
    FieldSpec::new("price", FieldKind::Price)
        .updatable()
        .nullable()
        .only_for(CLOTHING),
    FieldSpec::new("brand", FieldKind::Text)
        .updatable()
        .nullable()
        .only_for(CLOTHING),
    FieldSpec::new("color", FieldKind::Text)
        .updatable()
        .nullable()
        .only_for(CLOTHING),
];

pub fn get_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

/// Names `updateNode` accepts for a node of the given type.
pub fn updatable_fields(node_type: NodeType) -> impl Iterator<Item = &'static str> {
    FIELDS
        .iter()
        .filter(move |spec| spec.updatable && spec.applies_to(node_type))
        .map(|spec| spec.name)
}
