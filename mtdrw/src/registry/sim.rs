//! In-memory registry for tests and `--simulate` runs.
//!
//! Each slot models one device index. Besides plain devices a slot can be
//! `Faulty` (lookup fails transiently) or `Absent` (lookup reports
//! `NotFound`, the enumeration terminator). The registry counts lookups and
//! outstanding handles so tests can assert the one-release-per-lookup
//! contract and that the scan never probes past its terminator.

use mtdrw_common::mtd::registry::{MtdRegistry, RegistryError};

/// One registry slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimSlot {
    /// A present device with the given writable state.
    Device {
        /// Current writable attribute.
        writable: bool,
    },
    /// A slot whose lookup fails with a transient error.
    Faulty,
    /// An empty slot: lookup reports `NotFound`.
    Absent,
}

/// In-memory `MtdRegistry` with per-slot behavior and handle accounting.
///
/// Indices past the last slot behave like `Absent`.
#[derive(Debug, Default)]
pub struct SimRegistry {
    slots: Vec<SimSlot>,
    lookups: usize,
    outstanding: usize,
}

impl SimRegistry {
    /// Empty registry: every lookup reports `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose slots are devices with the given writable states.
    pub fn with_devices(writable: &[bool]) -> Self {
        Self {
            slots: writable
                .iter()
                .map(|&writable| SimSlot::Device { writable })
                .collect(),
            lookups: 0,
            outstanding: 0,
        }
    }

    /// Append a slot.
    pub fn push(&mut self, slot: SimSlot) {
        self.slots.push(slot);
    }

    /// Replace the slot at `index`.
    ///
    /// # Panics
    /// Panics if no slot exists at `index`.
    pub fn set_slot(&mut self, index: usize, slot: SimSlot) {
        self.slots[index] = slot;
    }

    /// Writable state of the device at `index`, if one is present.
    pub fn writable_state(&self, index: usize) -> Option<bool> {
        match self.slots.get(index) {
            Some(SimSlot::Device { writable }) => Some(*writable),
            _ => None,
        }
    }

    /// Total number of `lookup` calls, successful or not.
    pub fn lookup_count(&self) -> usize {
        self.lookups
    }

    /// Handles obtained from `lookup` and not yet released.
    pub fn outstanding_handles(&self) -> usize {
        self.outstanding
    }
}

impl MtdRegistry for SimRegistry {
    type Handle = usize;

    fn lookup(&mut self, index: usize) -> Result<usize, RegistryError> {
        self.lookups += 1;
        match self.slots.get(index) {
            Some(SimSlot::Device { .. }) => {
                self.outstanding += 1;
                Ok(index)
            }
            Some(SimSlot::Faulty) => Err(RegistryError::Io(format!(
                "simulated lookup fault at mtd{index}"
            ))),
            Some(SimSlot::Absent) | None => Err(RegistryError::NotFound),
        }
    }

    fn release(&mut self, _handle: usize) {
        self.outstanding -= 1;
    }

    fn is_writable(&self, handle: &usize) -> bool {
        matches!(
            self.slots.get(*handle),
            Some(SimSlot::Device { writable: true })
        )
    }

    fn set_writable(&mut self, handle: &usize, writable: bool) -> Result<(), RegistryError> {
        match self.slots.get_mut(*handle) {
            Some(SimSlot::Device { writable: state }) => {
                *state = writable;
                Ok(())
            }
            _ => Err(RegistryError::Io(format!(
                "simulated device mtd{handle} vanished"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_and_past_end_report_not_found() {
        let mut registry = SimRegistry::with_devices(&[false]);
        registry.push(SimSlot::Absent);

        assert!(matches!(registry.lookup(1), Err(RegistryError::NotFound)));
        assert!(matches!(registry.lookup(7), Err(RegistryError::NotFound)));
        assert_eq!(registry.lookup_count(), 2);
        assert_eq!(registry.outstanding_handles(), 0);
    }

    #[test]
    fn faulty_slot_reports_io() {
        let mut registry = SimRegistry::new();
        registry.push(SimSlot::Faulty);
        assert!(matches!(registry.lookup(0), Err(RegistryError::Io(_))));
    }

    #[test]
    fn handles_are_counted_until_release() {
        let mut registry = SimRegistry::with_devices(&[true]);
        let handle = registry.lookup(0).unwrap();
        assert_eq!(registry.outstanding_handles(), 1);
        assert!(registry.is_writable(&handle));

        registry.release(handle);
        assert_eq!(registry.outstanding_handles(), 0);
    }

    #[test]
    fn set_writable_updates_the_slot() {
        let mut registry = SimRegistry::with_devices(&[false]);
        let handle = registry.lookup(0).unwrap();
        registry.set_writable(&handle, true).unwrap();
        registry.release(handle);
        assert_eq!(registry.writable_state(0), Some(true));
    }
}
