//! Core types for the state store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of member slot a descriptor refers to.
///
/// Properties are enumerated before fields when a snapshot is captured.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Property,
    Field,
}

impl fmt::Debug for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Property => write!(f, "Property"),
            MemberKind::Field => write!(f, "Field"),
        }
    }
}

/// Identifies a specific member slot on the owning type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberDescriptor {
    /// Member name as declared.
    pub name: &'static str,

    /// Name of the type that declares the member. A member contributed by a
    /// base type keeps the base type's name even when captured through a
    /// derived component.
    pub declared_by: &'static str,

    /// Field or property.
    pub kind: MemberKind,

    /// Whether the slot can be read. The registration surface
    /// ([`MemberAccessor::property`]/[`field`]) only produces read-write
    /// slots, so this is always `true` for macro-built tables; it is
    /// recorded so snapshot diagnostics describe the slot faithfully.
    ///
    /// [`MemberAccessor::property`]: crate::MemberAccessor::property
    /// [`field`]: crate::MemberAccessor::field
    pub readable: bool,

    /// Whether the slot can be written. Always `true` for macro-built
    /// tables, same as `readable`.
    pub writable: bool,
}

impl MemberDescriptor {
    /// Whether two descriptors refer to the same member slot, ignoring
    /// kind and capability (those are checked separately on restore).
    pub fn same_slot(&self, other: &MemberDescriptor) -> bool {
        self.name == other.name && self.declared_by == other.declared_by
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declared_by, self.name)
    }
}

/// One captured member value. The value is opaque to the store: it is never
/// interpreted, only copied back on restore.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateEntry {
    pub descriptor: MemberDescriptor,
    pub value: serde_json::Value,
}

/// Counts across the whole store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of snapshots currently held (one per instance key).
    pub snapshots: usize,

    /// Total captured entries across all snapshots.
    pub entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_slot_ignores_kind() {
        let a = MemberDescriptor {
            name: "count",
            declared_by: "Widget",
            kind: MemberKind::Property,
            readable: true,
            writable: true,
        };
        let mut b = a.clone();
        b.kind = MemberKind::Field;
        assert!(a.same_slot(&b));
    }

    #[test]
    fn test_same_slot_distinguishes_declaring_type() {
        let a = MemberDescriptor {
            name: "count",
            declared_by: "Widget",
            kind: MemberKind::Property,
            readable: true,
            writable: true,
        };
        let mut b = a.clone();
        b.declared_by = "BaseWidget";
        assert!(!a.same_slot(&b));
    }

    #[test]
    fn test_descriptor_display() {
        let d = MemberDescriptor {
            name: "label",
            declared_by: "Widget",
            kind: MemberKind::Field,
            readable: true,
            writable: true,
        };
        assert_eq!(d.to_string(), "Widget::label");
    }
}
