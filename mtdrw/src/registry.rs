//! `MtdRegistry` backends.
//!
//! - [`sysfs`] - Production backend over `/sys/class/mtd`
//! - [`sim`] - In-memory backend for tests and `--simulate` runs

pub mod sim;
pub mod sysfs;
