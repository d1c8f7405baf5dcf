//! Kernel-assigned identifiers for bus entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a service, interface or method
///
/// Handles are assigned by the kernel when a name is resolved. Any
/// negative value means "unresolved" or "not found"; no ordering or
/// arithmetic meaning attaches to the valid ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(i64);

impl Handle {
    /// The canonical "not resolved" handle.
    pub const UNRESOLVED: Handle = Handle(-1);

    /// Wraps a raw kernel value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Interprets a boundary status as a handle.
    pub const fn from_status(status: i64) -> Self {
        Self(status)
    }

    /// Returns the raw kernel value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whether this handle names an entity.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}

impl From<Handle> for i64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Handle({})", self.0)
        } else {
            write!(f, "Handle(unresolved)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_handles_are_unresolved() {
        assert!(!Handle::UNRESOLVED.is_valid());
        assert!(!Handle::new(-42).is_valid());
        assert!(Handle::new(0).is_valid());
        assert!(Handle::new(7).is_valid());
    }

    #[test]
    fn test_default_is_unresolved() {
        assert_eq!(Handle::default(), Handle::UNRESOLVED);
    }

    #[test]
    fn test_display() {
        assert_eq!(Handle::new(3).to_string(), "Handle(3)");
        assert_eq!(Handle::UNRESOLVED.to_string(), "Handle(unresolved)");
    }

    #[test]
    fn test_handle_serializes_as_raw_integer() {
        let json = serde_json::to_string(&Handle::new(12)).unwrap();
        assert_eq!(json, "12");
        let handle: Handle = serde_json::from_str("-1").unwrap();
        assert_eq!(handle, Handle::UNRESOLVED);
    }
}
