//! Writability toggler: the unlock pass, the restore pass, and the owned
//! session record connecting them.
//!
//! [`UnlockSession::activate`] scans device indices in ascending order and
//! records every index whose writable attribute it actually set. The session
//! is then consumed by [`UnlockSession::deactivate`], which clears the
//! attribute only for recorded indices. Indices that were already writeable
//! are never recorded, so they are never reverted.

use mtdrw_common::config::UnlockConfig;
use mtdrw_common::mtd::registry::{MtdRegistry, RegistryError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::unlocked_set::UnlockedSet;

/// Why an activation attempt produced no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnlockError {
    /// The opt-in gate was not set; no device was probed.
    #[error("i_want_a_brick not specified; refusing to unlock")]
    RefusedUnsafeOperation,
}

/// Outcome of one successful flag toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    /// The attribute was flipped to the requested state.
    Changed,
    /// The attribute already had the requested state; nothing was written.
    AlreadyInState,
}

/// Failure of one flag toggle.
#[derive(Debug, Clone, Error)]
pub enum FlagError {
    /// No device at this index. During the scan this is the enumeration
    /// terminator, not a per-device failure.
    #[error("no such device")]
    NotFound,

    /// Lookup or flag write failed for any other reason.
    #[error("{0}")]
    Lookup(RegistryError),
}

/// Toggle the writable attribute of the device at `index` to `want_writable`.
///
/// Resolves the index, inspects the current attribute, writes only when the
/// state actually differs, and releases the handle on every exit path.
/// Transient failures are logged here, always with the device index;
/// `NotFound` is left to the caller to interpret.
pub fn set_writable_flag<R: MtdRegistry>(
    registry: &mut R,
    index: usize,
    want_writable: bool,
) -> Result<FlagChange, FlagError> {
    let handle = registry.lookup(index).map_err(|e| match e {
        RegistryError::NotFound => FlagError::NotFound,
        other => {
            error!("mtd{index}: lookup failed: {other}");
            FlagError::Lookup(other)
        }
    })?;

    let result = if registry.is_writable(&handle) == want_writable {
        Ok(FlagChange::AlreadyInState)
    } else {
        match registry.set_writable(&handle, want_writable) {
            Ok(()) => {
                if want_writable {
                    info!("mtd{index}: setting writeable flag");
                } else {
                    info!("mtd{index}: removing writeable flag");
                }
                Ok(FlagChange::Changed)
            }
            Err(e) => {
                error!("mtd{index}: flag write failed: {e}");
                Err(FlagError::Lookup(e))
            }
        }
    };

    registry.release(handle);
    result
}

/// Terminal state of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// At least one partition was unlocked; deactivation has real work.
    Active,
    /// The scan completed without changing anything. Informational, not a
    /// failure; deactivation is a no-op.
    NothingToDo,
}

/// Record of one unlock pass: which indices were changed and how far the
/// scan got. Created by [`activate`](Self::activate), consumed by
/// [`deactivate`](Self::deactivate).
#[derive(Debug)]
pub struct UnlockSession {
    unlocked: UnlockedSet,
    high_water: usize,
    changed: usize,
    state: SessionState,
}

impl UnlockSession {
    /// Run the unlock pass.
    ///
    /// Scans indices `0..config.max_devices` in ascending order. `NotFound`
    /// terminates the scan; any other per-index failure is logged and
    /// skipped so a transient fault on one slot cannot mask later slots.
    /// Devices that are already writeable are left alone and not recorded.
    ///
    /// # Errors
    /// `UnlockError::RefusedUnsafeOperation` if `config.i_want_a_brick` is
    /// false. No lookup is performed in that case.
    pub fn activate<R: MtdRegistry>(
        registry: &mut R,
        config: &UnlockConfig,
    ) -> Result<Self, UnlockError> {
        if !config.i_want_a_brick {
            error!("i_want_a_brick not specified; aborting");
            return Err(UnlockError::RefusedUnsafeOperation);
        }

        let max_devices = config.max_devices;
        let mut unlocked = UnlockedSet::new(max_devices);
        let mut changed = 0usize;
        let mut index = 0usize;

        while index < max_devices {
            match set_writable_flag(registry, index, true) {
                Ok(FlagChange::Changed) => {
                    unlocked.insert(index);
                    changed += 1;
                }
                Ok(FlagChange::AlreadyInState) => {
                    debug!("mtd{index}: already writeable");
                }
                // End of enumeration: no device here, none past it.
                Err(FlagError::NotFound) => break,
                // Logged in set_writable_flag; keep scanning.
                Err(FlagError::Lookup(_)) => {}
            }
            index += 1;
        }

        if index == max_devices {
            warn!(
                "scan stopped at the configured bound of {max_devices} devices; \
                 partitions past it are invisible to mtdrw"
            );
        }

        let state = if changed == 0 {
            warn!("no partitions to unlock");
            SessionState::NothingToDo
        } else {
            info!("unlocked {changed} partitions");
            SessionState::Active
        };

        Ok(Self {
            unlocked,
            high_water: index,
            changed,
            state,
        })
    }

    /// Run the restore pass, consuming the session.
    ///
    /// Clears the writable attribute for every recorded index below the
    /// high-water mark. Best effort: failures are logged and swallowed so
    /// one stubborn device never blocks the remaining restorations.
    pub fn deactivate<R: MtdRegistry>(self, registry: &mut R) {
        if self.state != SessionState::Active {
            debug!("no unlocked partitions recorded; nothing to restore");
            return;
        }

        for index in 0..self.high_water {
            if !self.unlocked.contains(index) {
                continue;
            }
            match set_writable_flag(registry, index, false) {
                Ok(FlagChange::Changed) => {}
                Ok(FlagChange::AlreadyInState) => {
                    debug!("mtd{index}: writeable flag already cleared");
                }
                Err(FlagError::NotFound) => {
                    error!("mtd{index}: cannot remove writeable flag: device gone");
                }
                // Logged in set_writable_flag; keep restoring.
                Err(FlagError::Lookup(_)) => {}
            }
        }
    }

    /// Terminal state of the activation.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of partitions the unlock pass changed.
    pub fn changed_count(&self) -> usize {
        self.changed
    }

    /// One past the last index that produced a valid lookup.
    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    /// Indices changed by the unlock pass.
    pub fn unlocked(&self) -> &UnlockedSet {
        &self.unlocked
    }
}
