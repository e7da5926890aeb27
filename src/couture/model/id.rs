//! Prefixed identifiers.
//!
//! Every entity id is `<prefix>.<suffix>`: the prefix names the kind of entity
//! (`outfit`, `clothingitem`, `anchor`, `link`, ...) and the suffix is a random
//! v4 UUID in simple form. Callers rely on the prefix to tell what an id points
//! at without loading it, so it must never change for the lifetime of an id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ID_SEPARATOR: char = '.';

/// Generates `<prefix>.<uuid>`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}{}{}", prefix, ID_SEPARATOR, Uuid::new_v4().simple())
}

/// Returns the entity prefix of an id (`"outfit"` for `outfit.1a2b`).
pub fn id_prefix(id: &str) -> Option<&str> {
    id.split_once(ID_SEPARATOR).map(|(prefix, _)| prefix)
}

/// Ids end up as document keys and file names, so they are restricted to
/// ASCII alphanumerics plus `.`, `-` and `_`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn prefix(&self) -> Option<&str> {
                id_prefix(&self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

prefixed_id!(
    /// Id of a node. The prefix is the node type (`text.`, `outfit.`, ...).
    NodeId
);
prefixed_id!(
    /// Id of an anchor, always `anchor.`-prefixed when generated.
    AnchorId
);
prefixed_id!(
    /// Id of a link, always `link.`-prefixed when generated.
    LinkId
);

pub const ANCHOR_PREFIX: &str = "anchor";
pub const LINK_PREFIX: &str = "link";

impl AnchorId {
    pub fn generate() -> Self {
        Self(generate_id(ANCHOR_PREFIX))
    }
}

impl LinkId {
    pub fn generate() -> Self {
        Self(generate_id(LINK_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_their_prefix() {
        let id = AnchorId::generate();
        assert_eq!(id.prefix(), Some("anchor"));
        assert!(is_valid_id(id.as_str()));

        let link = LinkId::generate();
        assert!(link.as_str().starts_with("link."));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(LinkId::generate(), LinkId::generate());
    }

    #[test]
    fn prefix_of_unprefixed_id_is_none() {
        assert_eq!(id_prefix("plain"), None);
        assert_eq!(id_prefix("outfit.x.y"), Some("outfit"));
    }

    #[test]
    fn rejects_ids_unsafe_for_storage_keys() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("with space"));
        assert!(is_valid_id("clothingitem.4f2a-x_1"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NodeId::new("text.abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"text.abc\"");
    }
}
