//! Bus error types

use crate::boundary::{StatusCode, SyscallKind};
use crate::param::ParamKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of entity a name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Service,
    Interface,
    Method,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Service => write!(f, "service"),
            EntityKind::Interface => write!(f, "interface"),
            EntityKind::Method => write!(f, "method"),
        }
    }
}

/// Errors that can occur when talking to the bus
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    /// The boundary primitive itself returned a negative status
    #[error("Boundary {kind} call failed with status {status}")]
    Transport { kind: SyscallKind, status: StatusCode },

    /// The pending parameter does not carry the expected tag
    #[error("Protocol mismatch: expected {expected} parameter, found {actual}")]
    ProtocolMismatch {
        expected: ParamKind,
        actual: ParamKind,
    },

    /// The receive buffer for an incoming array could not be allocated
    #[error("Failed to allocate {size} byte receive buffer")]
    AllocationFailure { size: usize },

    /// Resolution completed but the name did not match anything
    #[error("{entity} not found: {name}")]
    NotFound { entity: EntityKind, name: String },

    /// A popped array was expected to hold UTF-8 text
    #[error("Popped array is not valid UTF-8")]
    InvalidUtf8,
}

impl BusError {
    /// Builds a transport error for a failed boundary call.
    pub fn transport(kind: SyscallKind, status: StatusCode) -> Self {
        BusError::Transport { kind, status }
    }

    /// Whether this error means "no match" rather than a failed call.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BusError::NotFound { .. })
    }
}

/// Result type for bus operations
pub type Result<T> = core::result::Result<T, BusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BusError::transport(SyscallKind::Pop, -1).to_string(),
            "Boundary pop call failed with status -1"
        );
        assert_eq!(
            BusError::ProtocolMismatch {
                expected: ParamKind::Array,
                actual: ParamKind::Primitive,
            }
            .to_string(),
            "Protocol mismatch: expected array parameter, found primitive"
        );
        assert_eq!(
            BusError::NotFound {
                entity: EntityKind::Service,
                name: "vfs".to_string(),
            }
            .to_string(),
            "service not found: vfs"
        );
    }

    #[test]
    fn test_is_not_found() {
        let missing = BusError::NotFound {
            entity: EntityKind::Method,
            name: "read".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!BusError::transport(SyscallKind::Method, -1).is_not_found());
        assert!(!BusError::AllocationFailure { size: 8 }.is_not_found());
    }
}
