//! # Extents
//!
//! An extent describes which part of a node's content an anchor points at.
//! The `type` tag decides the shape:
//!
//! | Tag | Fields | Meaning |
//! |-----|--------|---------|
//! | `text` | `startCharacter`, `endCharacter`, `text` | A character range and the text it covers |
//! | `image` | `left`, `top`, `width`, `height` | A rectangle on the image |
//! | `media` | `timestamp` | A point in time (seconds) |
//! | `clothingitem` | none | The whole clothing item |
//!
//! An anchor may also have no extent at all (`null`), which marks the whole node.
//!
//! Text ranges are measured in Unicode scalar values: a text extent is valid
//! iff `startCharacter <= endCharacter` and
//! `endCharacter - startCharacter == text.chars().count()`.
//!
//! The `is_*_extent` functions validate raw JSON as it arrives from callers,
//! before it is turned into an [`Extent`].

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Extent {
    #[serde(rename_all = "camelCase")]
    Text {
        start_character: usize,
        end_character: usize,
        text: String,
    },
    Image {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    Media {
        timestamp: f64,
    },
    #[serde(rename = "clothingitem")]
    ClothingItem,
}

impl Extent {
    pub fn text(text: impl Into<String>, start_character: usize) -> Self {
        let text = text.into();
        let end_character = start_character + text.chars().count();
        Extent::Text {
            start_character,
            end_character,
            text,
        }
    }

    /// Checks the invariants the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        match self {
            Extent::Text {
                start_character,
                end_character,
                text,
            } => check_text_range(*start_character, *end_character, text),
            Extent::Image {
                left,
                top,
                width,
                height,
            } => {
                if [left, top, width, height].iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(VaultError::Validation(
                        "image extent coordinates must be finite numbers".to_string(),
                    ))
                }
            }
            Extent::Media { timestamp } => {
                if timestamp.is_finite() && *timestamp >= 0.0 {
                    Ok(())
                } else {
                    Err(VaultError::Validation(
                        "media extent timestamp must be a non-negative number".to_string(),
                    ))
                }
            }
            Extent::ClothingItem => Ok(()),
        }
    }

    /// Parses caller-supplied JSON. `null` means "no extent".
    pub fn from_value(value: Value) -> Result<Option<Extent>> {
        if value.is_null() {
            return Ok(None);
        }
        if !is_extent(&value) {
            return Err(VaultError::Validation(format!(
                "not a valid extent: {}",
                value
            )));
        }
        let extent: Extent = serde_json::from_value(value)
            .map_err(|e| VaultError::Validation(format!("malformed extent: {}", e)))?;
        extent.validate()?;
        Ok(Some(extent))
    }
}

fn check_text_range(start: usize, end: usize, text: &str) -> Result<()> {
    if start > end {
        return Err(VaultError::Validation(format!(
            "text extent starts after it ends ({} > {})",
            start, end
        )));
    }
    let len = text.chars().count();
    if end - start != len {
        return Err(VaultError::Validation(format!(
            "text extent covers {} characters but text has {}",
            end - start,
            len
        )));
    }
    Ok(())
}

fn tag_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn is_number(value: &Value, field: &str) -> bool {
    value.get(field).is_some_and(Value::is_number)
}

/// `null` or any of the four extent shapes.
pub fn is_extent(value: &Value) -> bool {
    value.is_null()
        || is_text_extent(value)
        || is_image_extent(value)
        || is_media_extent(value)
        || is_clothing_extent(value)
}

pub fn is_text_extent(value: &Value) -> bool {
    if tag_of(value) != Some("text") {
        return false;
    }
    let start = value.get("startCharacter").and_then(Value::as_u64);
    let end = value.get("endCharacter").and_then(Value::as_u64);
    let text = value.get("text").and_then(Value::as_str);
    match (start, end, text) {
        (Some(start), Some(end), Some(text)) => {
            check_text_range(start as usize, end as usize, text).is_ok()
        }
        _ => false,
    }
}

pub fn is_image_extent(value: &Value) -> bool {
    tag_of(value) == Some("image")
        && ["left", "top", "width", "height"]
            .iter()
            .all(|field| is_number(value, field))
}

pub fn is_media_extent(value: &Value) -> bool {
    tag_of(value) == Some("media") && is_number(value, "timestamp")
}

pub fn is_clothing_extent(value: &Value) -> bool {
    tag_of(value) == Some("clothingitem")
}

/// Structural equality; two missing extents are the same.
pub fn is_same_extent(a: Option<&Extent>, b: Option<&Extent>) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_extent_natural_order_is_valid() {
        let value = json!({"type": "text", "startCharacter": 0, "endCharacter": 5, "text": "hello"});
        assert!(is_text_extent(&value));
        assert!(is_extent(&value));
    }

    #[test]
    fn empty_text_extent_is_valid() {
        let value = json!({"type": "text", "startCharacter": 3, "endCharacter": 3, "text": ""});
        assert!(is_text_extent(&value));
    }

    #[test]
    fn text_extent_rejects_backwards_range() {
        let value = json!({"type": "text", "startCharacter": 5, "endCharacter": 0, "text": "hello"});
        assert!(!is_text_extent(&value));
    }

    #[test]
    fn text_extent_rejects_length_mismatch() {
        let value = json!({"type": "text", "startCharacter": 0, "endCharacter": 4, "text": "hello"});
        assert!(!is_text_extent(&value));
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let extent = Extent::text("héllo", 2);
        assert!(extent.validate().is_ok());
        assert_eq!(
            extent,
            Extent::Text {
                start_character: 2,
                end_character: 7,
                text: "héllo".into()
            }
        );
    }

    #[test]
    fn tag_is_authoritative() {
        let image_shaped_but_media = json!({"type": "media", "left": 0, "top": 0, "width": 1, "height": 1});
        assert!(!is_image_extent(&image_shaped_but_media));
        assert!(!is_media_extent(&image_shaped_but_media));
        assert!(!is_extent(&image_shaped_but_media));
    }

    #[test]
    fn image_media_and_clothing_shapes() {
        assert!(is_image_extent(
            &json!({"type": "image", "left": 1, "top": 2.5, "width": 10, "height": 4})
        ));
        assert!(!is_image_extent(&json!({"type": "image", "left": 1, "top": 2})));
        assert!(is_media_extent(&json!({"type": "media", "timestamp": 12.5})));
        assert!(!is_media_extent(&json!({"type": "media", "timestamp": "12"})));
        assert!(is_clothing_extent(&json!({"type": "clothingitem"})));
    }

    #[test]
    fn from_value_handles_null_and_invalid() {
        assert_eq!(Extent::from_value(Value::Null).unwrap(), None);
        let err = Extent::from_value(json!({"type": "pdf"})).unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));

        let parsed = Extent::from_value(json!({"type": "media", "timestamp": 3})).unwrap();
        assert_eq!(parsed, Some(Extent::Media { timestamp: 3.0 }));
    }

    #[test]
    fn same_extent_compares_structure() {
        let a = Extent::text("hi", 0);
        let b = Extent::text("hi", 0);
        let c = Extent::text("hi", 1);
        assert!(is_same_extent(None, None));
        assert!(is_same_extent(Some(&a), Some(&b)));
        assert!(!is_same_extent(Some(&a), Some(&c)));
        assert!(!is_same_extent(Some(&a), None));
    }

    #[test]
    fn serialized_tags_match_shapes() {
        let value = serde_json::to_value(Extent::ClothingItem).unwrap();
        assert_eq!(value, json!({"type": "clothingitem"}));
        let text = serde_json::to_value(Extent::text("abc", 1)).unwrap();
        assert_eq!(text["endCharacter"], json!(4));
    }
}
