//! Named field access on nodes.
//!
//! `updateNode` receives a list of [`NodeProperty`] values: a field name plus
//! an untyped JSON value. Each one is checked against its [`FieldSpec`] and
//! the node's type before anything is written.

use super::spec::{get_spec, FieldKind, FieldSpec};
use crate::error::{Result, VaultError};
use crate::model::{is_valid_path, Comment, Node, NodeDetails, NodePath};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub field_name: String,
    pub value: Value,
}

impl NodeProperty {
    pub fn new(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
        }
    }

    /// Parses a `field=value` assignment as typed on a command line.
    ///
    /// Text-like fields take the raw string; numbers, paths and comment lists
    /// are read as JSON. A bare `null` clears a nullable field.
    pub fn parse(assignment: &str) -> Result<Self> {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            VaultError::Validation(format!("expected field=value, got '{}'", assignment))
        })?;
        let name = name.trim();
        let spec = get_spec(name)
            .ok_or_else(|| VaultError::Validation(format!("unknown field '{}'", name)))?;

        let value = if raw == "null" && spec.nullable {
            Value::Null
        } else {
            match spec.kind {
                FieldKind::Id
                | FieldKind::Text
                | FieldKind::NodeType
                | FieldKind::ClothingType
                | FieldKind::ViewType => Value::String(raw.to_string()),
                FieldKind::Number | FieldKind::Price | FieldKind::Path | FieldKind::Comments => {
                    serde_json::from_str(raw).map_err(|e| {
                        VaultError::Validation(format!("field '{}': {}", name, e))
                    })?
                }
            }
        };
        Ok(Self::new(name, value))
    }
}

fn invalid(field: &str, expected: &str, value: &Value) -> VaultError {
    VaultError::Validation(format!(
        "field '{}' expects {}, got {}",
        field, expected, value
    ))
}

fn opt_json<T: Serialize>(value: &Option<T>) -> Value {
    value.as_ref().map(|v| json!(v)).unwrap_or(Value::Null)
}

/// Checks that `value` has the shape `spec` demands. Does not look at the node.
fn check_kind(spec: &FieldSpec, value: &Value) -> Result<()> {
    if value.is_null() {
        return if spec.nullable {
            Ok(())
        } else {
            Err(invalid(spec.name, "a value", value))
        };
    }
    let ok = match spec.kind {
        FieldKind::Id | FieldKind::Text => value.is_string(),
        FieldKind::NodeType => value
            .as_str()
            .is_some_and(|s| s.parse::<crate::model::NodeType>().is_ok()),
        FieldKind::Number | FieldKind::Price => value.as_f64().is_some_and(f64::is_finite),
        FieldKind::ClothingType => value
            .as_str()
            .is_some_and(|s| s.parse::<crate::model::ClothingType>().is_ok()),
        FieldKind::ViewType => value
            .as_str()
            .is_some_and(|s| s.parse::<crate::model::ViewType>().is_ok()),
        FieldKind::Path => serde_json::from_value::<NodePath>(value.clone())
            .map(|p| is_valid_path(&p))
            .unwrap_or(false),
        FieldKind::Comments => serde_json::from_value::<Vec<Comment>>(value.clone()).is_ok(),
    };
    if ok {
        Ok(())
    } else {
        let expected = match spec.kind {
            FieldKind::Id | FieldKind::Text => "a string",
            FieldKind::NodeType => "a node type",
            FieldKind::Number | FieldKind::Price => "a number",
            FieldKind::ClothingType => "a clothing type",
            FieldKind::ViewType => "\"grid\" or \"list\"",
            FieldKind::Path => "a valid path",
            FieldKind::Comments => "a list of comments",
        };
        Err(invalid(spec.name, expected, value))
    }
}

fn as_opt_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

impl Node {
    /// Reads a field by its serialized name. `None` for unknown names and for
    /// fields that do not exist on this node's type.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        let spec = get_spec(name)?;
        if !spec.applies_to(self.node_type()) {
            return None;
        }
        let value = match (name, &self.details) {
            ("nodeId", _) => json!(self.node_id),
            ("type", _) => json!(self.node_type()),
            ("title", _) => json!(self.title),
            ("content", _) => json!(self.content),
            ("filePath", _) => json!(self.file_path),
            ("comments", _) => json!(self.comments),
            ("viewType", NodeDetails::Outfit(d)) => json!(d.view_type),
            ("description", NodeDetails::Outfit(d)) => opt_json(&d.description),
            ("description", NodeDetails::ClothingItem(d)) => opt_json(&d.description),
            ("imageHeight", NodeDetails::Image(d)) => opt_json(&d.image_height),
            ("imageWidth", NodeDetails::Image(d)) => opt_json(&d.image_width),
            ("originalHeight", NodeDetails::Image(d)) => opt_json(&d.original_height),
            ("originalWidth", NodeDetails::Image(d)) => opt_json(&d.original_width),
            ("clothingType", NodeDetails::ClothingItem(d)) => opt_json(&d.clothing_type),
            ("price", NodeDetails::ClothingItem(d)) => opt_json(&d.price),
            ("brand", NodeDetails::ClothingItem(d)) => opt_json(&d.brand),
            ("color", NodeDetails::ClothingItem(d)) => opt_json(&d.color),
            _ => return None,
        };
        Some(value)
    }

    /// Validates and writes one property. On error the node is unchanged.
    pub fn set_field(&mut self, property: &NodeProperty) -> Result<()> {
        let name = property.field_name.as_str();
        let value = &property.value;

        let spec = get_spec(name)
            .ok_or_else(|| VaultError::Validation(format!("unknown field '{}'", name)))?;
        if !spec.updatable {
            return Err(VaultError::Validation(format!(
                "field '{}' cannot be updated",
                name
            )));
        }
        if !spec.applies_to(self.node_type()) {
            return Err(VaultError::Validation(format!(
                "field '{}' does not exist on {} nodes",
                name,
                self.node_type()
            )));
        }
        check_kind(spec, value)?;

        match (name, &mut self.details) {
            ("title", _) => self.title = as_opt_string(value).unwrap_or_default(),
            ("content", _) => self.content = as_opt_string(value).unwrap_or_default(),
            ("filePath", _) => {
                let path: NodePath = serde_json::from_value(value.clone())
                    .map_err(|e| VaultError::Validation(format!("malformed path: {}", e)))?;
                if path.node_id() != Some(&self.node_id) {
                    return Err(VaultError::Validation(format!(
                        "path must end with the node's own id '{}'",
                        self.node_id
                    )));
                }
                self.file_path = path;
            }
            ("comments", _) => {
                self.comments = serde_json::from_value(value.clone())
                    .map_err(|e| VaultError::Validation(format!("malformed comments: {}", e)))?;
            }
            ("viewType", NodeDetails::Outfit(d)) => {
                d.view_type = value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default();
            }
            ("description", NodeDetails::Outfit(d)) => d.description = as_opt_string(value),
            ("description", NodeDetails::ClothingItem(d)) => d.description = as_opt_string(value),
            ("imageHeight", NodeDetails::Image(d)) => d.image_height = value.as_f64(),
            ("imageWidth", NodeDetails::Image(d)) => d.image_width = value.as_f64(),
            ("originalHeight", NodeDetails::Image(d)) => d.original_height = value.as_f64(),
            ("originalWidth", NodeDetails::Image(d)) => d.original_width = value.as_f64(),
            ("clothingType", NodeDetails::ClothingItem(d)) => {
                d.clothing_type = value.as_str().and_then(|s| s.parse().ok());
            }
            ("price", NodeDetails::ClothingItem(d)) => d.price = value.as_f64(),
            ("brand", NodeDetails::ClothingItem(d)) => d.brand = as_opt_string(value),
            ("color", NodeDetails::ClothingItem(d)) => d.color = as_opt_string(value),
            _ => {
                return Err(VaultError::Validation(format!(
                    "field '{}' does not exist on {} nodes",
                    name,
                    self.node_type()
                )))
            }
        }
        Ok(())
    }
}
