//! # mtdrw Library
//!
//! Reversible write-unlock for MTD partitions the platform marked read-only.
//!
//! The unlock pass scans device indices in ascending order, sets the
//! writable attribute on every partition that lacks it, and records exactly
//! which indices it changed in an [`UnlockSession`]. Consuming the session
//! on shutdown reverts only those indices, so partitions that were already
//! writeable are never touched in either direction.
//!
//! # Module Structure
//!
//! - [`session`] - Unlock/restore passes and the owned session record
//! - [`unlocked_set`] - Membership set over device indices
//! - [`registry`] - `MtdRegistry` backends (sysfs, in-memory simulation)

#![deny(warnings)]
#![deny(missing_docs)]

pub mod registry;
pub mod session;
pub mod unlocked_set;

// Re-export key types for convenience
pub use crate::session::{FlagChange, FlagError, SessionState, UnlockError, UnlockSession};
pub use crate::unlocked_set::UnlockedSet;
