//! mtdrw Common Library
//!
//! This crate provides the shared pieces of the mtdrw workspace: constants,
//! TOML configuration loading, the MTD per-device flag word, and the device
//! registry contract consumed by the unlock core.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Shared constants
//! - [`mtd`] - MTD flag word and registry contract

pub mod config;
pub mod consts;
pub mod mtd;
