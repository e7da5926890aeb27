use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Reserved for optimistic concurrency. Nothing produces it today:
    /// concurrent writers resolve as last-write-wins.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl VaultError {
    pub fn node_not_found(id: impl Into<String>) -> Self {
        VaultError::NotFound {
            kind: "Node",
            id: id.into(),
        }
    }

    pub fn anchor_not_found(id: impl Into<String>) -> Self {
        VaultError::NotFound {
            kind: "Anchor",
            id: id.into(),
        }
    }

    pub fn link_not_found(id: impl Into<String>) -> Self {
        VaultError::NotFound {
            kind: "Link",
            id: id.into(),
        }
    }

    /// Expected failures are reported to callers as unsuccessful responses.
    /// Everything else is an infrastructure fault and propagates.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            VaultError::Validation(_)
                | VaultError::NotFound { .. }
                | VaultError::InvalidMove(_)
                | VaultError::InvalidPath(_)
                | VaultError::Conflict(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_expected_failures() {
        assert!(VaultError::Validation("bad".into()).is_expected());
        assert!(VaultError::node_not_found("text.1").is_expected());
        assert!(VaultError::InvalidMove("cycle".into()).is_expected());
        assert!(VaultError::InvalidPath("empty".into()).is_expected());
        assert!(!VaultError::Store("disk gone".into()).is_expected());
        assert!(!VaultError::Io(std::io::Error::other("boom")).is_expected());
        assert!(!VaultError::Config("bad toml".into()).is_expected());
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = VaultError::anchor_not_found("anchor.abc");
        assert_eq!(err.to_string(), "Anchor not found: anchor.abc");
    }
}
