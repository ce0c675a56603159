//! MTD abstractions shared across the workspace.
//!
//! - [`flags`] - Per-device flag word
//! - [`registry`] - Lookup-by-index device registry contract

pub mod flags;
pub mod registry;
