//! Error types for wiring and lookups

use thiserror::Error;

/// Errors that can occur while bootstrapping or querying a container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// A capability has several implementors and the request named none of them
    #[error("Multiple implementations of {type_name}: {candidates:?} (a qualifier is required)")]
    AmbiguousBinding {
        type_name: &'static str,
        candidates: Vec<&'static str>,
    },

    /// A constructor parameter or field target is not in the instance pool
    #[error("Unresolved dependency {dependency} required by {component}")]
    UnresolvedDependency {
        component: &'static str,
        dependency: &'static str,
    },

    /// A qualifier matched none of the implementors of a capability
    #[error("No implementation of {type_name} is named {qualifier}")]
    UnknownQualifier {
        type_name: &'static str,
        qualifier: String,
    },

    /// The component's constructor failed
    #[error("Failed to instantiate {component}: {reason}")]
    Instantiation {
        component: &'static str,
        reason: String,
    },

    /// An identifier was constructed twice
    #[error("Component already registered: {component}")]
    AlreadyRegistered { component: &'static str },

    /// A field slot was already filled
    #[error("Field {field} of {component} was already injected")]
    AlreadyInjected {
        component: &'static str,
        field: &'static str,
    },

    /// The pooled instance is not of the requested type
    #[error("Component {component} cannot be used as {expected}")]
    TypeMismatch {
        component: &'static str,
        expected: &'static str,
    },

    /// Lookup miss on a wired container
    #[error("Component not found: {type_name}")]
    NotFound { type_name: String },

    /// An `Inject<T>` slot was read before it was filled
    #[error("Field of type {type_name} has not been injected")]
    NotInjected { type_name: &'static str },

    /// An `Inject<T>` slot outlived the container owning its target
    #[error("Field of type {type_name} was injected by a container that has been dropped")]
    ContainerDropped { type_name: &'static str },

    /// A component without capabilities shares its identifier with a capability
    #[error("Identifier {identifier} names both a component and a capability")]
    IdentifierCollision { identifier: &'static str },

    /// Internal error
    #[error("Internal DI error: {0}")]
    Internal(String),
}

impl DiError {
    /// Create an UnresolvedDependency error
    #[inline]
    pub fn unresolved(component: &'static str, dependency: &'static str) -> Self {
        Self::UnresolvedDependency {
            component,
            dependency,
        }
    }

    /// Create a TypeMismatch error
    #[inline]
    pub fn mismatch(component: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            component,
            expected,
        }
    }

    /// Create a NotFound error
    #[inline]
    pub fn not_found(type_name: impl Into<String>) -> Self {
        Self::NotFound {
            type_name: type_name.into(),
        }
    }

    /// Whether the error comes from the selection rules rather than construction
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousBinding { .. }
                | Self::UnresolvedDependency { .. }
                | Self::UnknownQualifier { .. }
                | Self::NotFound { .. }
        )
    }
}

/// Result type alias for DI operations
pub type Result<T> = std::result::Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_names_type() {
        let err = DiError::AmbiguousBinding {
            type_name: "IServer",
            candidates: vec!["ServerA", "ServerB"],
        };
        let message = err.to_string();
        assert!(message.contains("IServer"));
        assert!(message.contains("ServerA"));
        assert!(err.is_resolution_error());
    }

    #[test]
    fn test_instantiation_is_not_resolution_error() {
        let err = DiError::Instantiation {
            component: "Database",
            reason: "connection refused".into(),
        };
        assert!(!err.is_resolution_error());
        assert_eq!(
            err.to_string(),
            "Failed to instantiate Database: connection refused"
        );
    }
}
