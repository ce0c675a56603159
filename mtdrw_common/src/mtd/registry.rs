//! Device registry contract consumed by the unlock core.
//!
//! The registry resolves device indices into transient handles and exposes
//! the writable attribute behind each handle. Backends live in the `mtdrw`
//! crate (sysfs for production, an in-memory registry for tests and
//! simulation runs).

use thiserror::Error;

/// Errors surfaced by registry lookups and flag writes.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No device exists at the probed index. During an ascending scan this
    /// is the enumeration terminator, not a per-device failure.
    #[error("no such device")]
    NotFound,

    /// Any other lookup or flag-write failure.
    #[error("{0}")]
    Io(String),
}

/// Lookup-by-index registry of MTD devices.
///
/// # Contract
///
/// - The caller performs exactly one [`release`](MtdRegistry::release) per
///   successful [`lookup`](MtdRegistry::lookup), on every exit path.
/// - Handles are transient: never held across operations, never persisted.
/// - A flag written through [`set_writable`](MtdRegistry::set_writable) is
///   visible to every other consumer of the device immediately.
pub trait MtdRegistry {
    /// Transient reference to a resolved device.
    type Handle;

    /// Resolve a device index.
    ///
    /// # Errors
    /// `RegistryError::NotFound` if no device exists at this index,
    /// `RegistryError::Io` for any other failure.
    fn lookup(&mut self, index: usize) -> Result<Self::Handle, RegistryError>;

    /// Return a handle obtained from `lookup`.
    fn release(&mut self, handle: Self::Handle);

    /// Whether the device behind `handle` currently permits writes.
    fn is_writable(&self, handle: &Self::Handle) -> bool;

    /// Set or clear the writable attribute on the device behind `handle`.
    ///
    /// # Errors
    /// `RegistryError::Io` if the underlying write fails.
    fn set_writable(&mut self, handle: &Self::Handle, writable: bool)
    -> Result<(), RegistryError>;
}
