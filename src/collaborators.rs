//! Interfaces to the services an editor depends on
//!
//! URL generation, authorization and view rendering belong to the hosting
//! application. The editor only sees these traits and passes their errors
//! through untouched.

use std::error::Error as StdError;

use serde_json::Value;
use thiserror::Error;

/// Failure reported by a collaborator, surfaced to the caller unchanged
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Named route to URL resolution
pub trait UrlGenerator: Send + Sync {
    fn route(&self, name: &str) -> Result<String, CollaboratorError>;
}

/// Scope that permissions are evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionScope(String);

impl PermissionScope {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The scope an editor instance's permissions live under: `editor.<instance id>`
    pub fn for_instance(instance_id: &str) -> Self {
        Self(format!("editor.{}", instance_id))
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ability checks such as `html`, `tool` or `upload`
pub trait AuthorizationGate: Send + Sync {
    fn allows(&self, ability: &str, scope: &PermissionScope) -> Result<bool, CollaboratorError>;
}

/// Renders a named view (for example the attached-file list) with data
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, data: &Value) -> Result<String, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_passes_through() {
        let err = CollaboratorError::new("route [editor.mention] not defined");
        assert_eq!(err.to_string(), "route [editor.mention] not defined");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = CollaboratorError::with_source("view failed", io);
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk gone".to_string()));
    }

    #[test]
    fn test_permission_scope_for_instance() {
        assert_eq!(PermissionScope::for_instance("board-1").key(), "editor.board-1");
    }
}
