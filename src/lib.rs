//! # statekeep
//!
//! Per-component state preservation for UI component trees whose hosting
//! framework destroys and recreates component instances (navigation,
//! circuit reconnects, hot reconfiguration).
//!
//! ## Core Concepts
//!
//! - **Instance key**: opaque caller-supplied string correlating a
//!   destroyed component instance with its replacement
//! - **Preserved members**: properties/fields a component opts in via the
//!   [`preserve_state!`] macro (or a hand-built [`MemberAccessor`] table)
//! - **Snapshot**: the ordered captured (member, value) pairs for one key,
//!   held in memory until replaced or cleared
//!
//! ## Example
//!
//! ```
//! use statekeep::{preserve_state, StateStore};
//!
//! struct Counter {
//!     count: u64,
//!     label: Option<String>,
//! }
//!
//! preserve_state! {
//!     Counter {
//!         properties { count }
//!         fields { label }
//!     }
//! }
//!
//! # fn main() -> statekeep::Result<()> {
//! let store = StateStore::new();
//!
//! // Framework lifecycle hook, just before the instance is torn down.
//! let old = Counter { count: 5, label: Some("x".into()) };
//! store.save_state_for_component("counter-1", &old)?;
//!
//! // Just after the logical replacement is created.
//! let mut fresh = Counter { count: 0, label: None };
//! store.restore_state_for_component("counter-1", &mut fresh)?;
//! assert_eq!(fresh.count, 5);
//! assert_eq!(fresh.label.as_deref(), Some("x"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod members;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, StateError};
pub use members::{MemberAccessor, PreserveState};
pub use store::StateStore;
pub use types::{MemberDescriptor, MemberKind, StateEntry, StoreStats};
