//! # Node Fields
//!
//! A unified way to read and write node fields by name, used by `updateNode`.
//! Instead of hand-checking each field at every call site, the field system
//! provides:
//!
//! - **Specifications**: what kind of value each field holds, which node types
//!   carry it, whether it may be updated or cleared ([`FIELDS`])
//! - **Unified access**: `Node::get_field()` / `Node::set_field()`
//! - **Properties**: the `{fieldName, value}` pairs callers send ([`NodeProperty`])
//!
//! ## Field Kinds
//!
//! | Kind | Examples | Accepted values |
//! |------|----------|-----------------|
//! | `Text` | `title`, `brand` | strings |
//! | `Number` | `imageHeight` | finite numbers |
//! | `Price` | `price` | finite numbers |
//! | `ClothingType` | `clothingType` | one of the 14 clothing types |
//! | `ViewType` | `viewType` | `grid`, `list` |
//! | `Path` | `filePath` | a valid path ending in the node's id |
//! | `Comments` | `comments` | a list of `{name, comment, timestamp}` |

mod property;
mod spec;

pub use property::NodeProperty;
pub use spec::{get_spec, updatable_fields, FieldKind, FieldSpec, FIELDS};
