//! The state store: capture and reinstate preserved component state.

use crate::error::{Result, StateError};
use crate::members::PreserveState;
use crate::types::{MemberKind, StateEntry, StoreStats};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

/// In-memory mapping from instance key to a captured snapshot.
///
/// The hosting framework calls [`save_state_for_component`] immediately
/// before a component instance is destroyed and
/// [`restore_state_for_component`] right after its logical replacement is
/// created, passing the same caller-supplied key to both. The key is opaque
/// to the store; the framework is responsible for making it stable across
/// the destroy/recreate cycle (e.g. route plus component position).
///
/// Nothing survives the process: snapshots exist only for the lifetime of
/// the store.
///
/// [`save_state_for_component`]: StateStore::save_state_for_component
/// [`restore_state_for_component`]: StateStore::restore_state_for_component
#[derive(Default)]
pub struct StateStore {
    /// Guarded as a whole. Structural mutations (insert/replace/clear) are
    /// O(1) under the write lock; member getters and setters always run
    /// outside it, so lifecycle hooks on distinct keys never wait on each
    /// other's component code.
    states: RwLock<HashMap<String, Vec<StateEntry>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every preserved member of `component` whose value is
    /// non-null and store the snapshot under `instance_key`, fully
    /// replacing any prior snapshot for that key.
    ///
    /// Entries are ordered properties before fields, each group in
    /// declaration order, most-derived type first.
    pub fn save_state_for_component<C: PreserveState>(
        &self,
        instance_key: &str,
        component: &C,
    ) -> Result<()> {
        let members = C::preserved_members();

        let mut entries = Vec::new();
        for kind in [MemberKind::Property, MemberKind::Field] {
            for member in members.iter().filter(|m| m.descriptor().kind == kind) {
                if let Some(value) = member.capture(component)? {
                    entries.push(StateEntry {
                        descriptor: member.descriptor().clone(),
                        value,
                    });
                }
            }
        }

        debug!(instance_key, entries = entries.len(), "saved component state");
        self.states
            .write()
            .insert(instance_key.to_string(), entries);
        Ok(())
    }

    /// Write the snapshot stored under `instance_key` back onto
    /// `component`, in snapshot order.
    ///
    /// A missing snapshot is not an error: the first render of a new
    /// instance has nothing to restore, so the call is a no-op. A snapshot
    /// entry that matches no preserved member on `component` means the
    /// caller restored into an incompatible type; the store fails fast
    /// with [`StateError::UnknownMember`] rather than writing a partial,
    /// possibly-mismatched subset.
    pub fn restore_state_for_component<C: PreserveState>(
        &self,
        instance_key: &str,
        component: &mut C,
    ) -> Result<()> {
        // Clone the entries out so component setters run without the lock.
        let entries = match self.states.read().get(instance_key) {
            Some(entries) => entries.clone(),
            None => return Ok(()),
        };

        // Resolve every entry before writing anything, so a mismatched
        // restore target fails before any slot is touched.
        let members = C::preserved_members();
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let member = members
                .iter()
                .find(|m| m.descriptor().same_slot(&entry.descriptor))
                .ok_or_else(|| StateError::UnknownMember {
                    declared_by: entry.descriptor.declared_by.to_string(),
                    name: entry.descriptor.name.to_string(),
                })?;

            // Kind drift between a snapshot and the accessor table is a
            // capture-path defect, not a runtime condition.
            if member.descriptor().kind != entry.descriptor.kind {
                return Err(StateError::UnsupportedMemberKind {
                    declared_by: entry.descriptor.declared_by.to_string(),
                    name: entry.descriptor.name.to_string(),
                    snapshot: entry.descriptor.kind,
                    declared: member.descriptor().kind,
                });
            }

            resolved.push((member, entry.value));
        }

        for (member, value) in resolved {
            member.apply(component, value)?;
        }

        trace!(instance_key, "restored component state");
        Ok(())
    }

    /// Discard every stored snapshot.
    pub fn clear_component_states(&self) {
        let mut states = self.states.write();
        let dropped = states.len();
        states.clear();
        debug!(dropped, "cleared component states");
    }

    /// Whether a snapshot is currently held for `instance_key`.
    pub fn has_state_for(&self, instance_key: &str) -> bool {
        self.states.read().contains_key(instance_key)
    }

    /// Counts across the store.
    pub fn stats(&self) -> StoreStats {
        let states = self.states.read();
        StoreStats {
            snapshots: states.len(),
            entries: states.values().map(|entries| entries.len()).sum(),
        }
    }
}
