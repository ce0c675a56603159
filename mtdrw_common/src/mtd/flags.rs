//! Per-device MTD flag word.
//!
//! Bit values match the kernel's `mtd-abi.h`. The flag word read from a
//! device may carry bits this crate does not name; backends use
//! `from_bits_retain` so a read-modify-write never clobbers them.

use bitflags::bitflags;

bitflags! {
    /// Flag word attached to every MTD device.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MtdFlags: u32 {
        /// Write operations are permitted.
        const WRITEABLE     = 0x0400;
        /// Single bits can be flipped.
        const BIT_WRITEABLE = 0x0800;
        /// No erase is necessary before writing.
        const NO_ERASE      = 0x1000;
        /// Device is locked at power-up.
        const POWERUP_LOCK  = 0x2000;
    }
}

impl MtdFlags {
    /// Whether the writable attribute is set.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.contains(Self::WRITEABLE)
    }

    /// Set or clear the writable attribute, leaving every other bit alone.
    #[inline]
    pub fn set_writable(&mut self, writable: bool) {
        self.set(Self::WRITEABLE, writable);
    }
}

impl Default for MtdFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writeable_bit_value() {
        assert_eq!(MtdFlags::WRITEABLE.bits(), 0x0400);
        assert_eq!(MtdFlags::BIT_WRITEABLE.bits(), 0x0800);
    }

    #[test]
    fn set_writable_toggles_only_one_bit() {
        let mut flags = MtdFlags::NO_ERASE;
        assert!(!flags.is_writable());

        flags.set_writable(true);
        assert!(flags.is_writable());
        assert!(flags.contains(MtdFlags::NO_ERASE));

        flags.set_writable(false);
        assert!(!flags.is_writable());
        assert!(flags.contains(MtdFlags::NO_ERASE));
    }

    #[test]
    fn unknown_bits_survive_retain_round_trip() {
        // 0x1 is not a named flag; it must survive set/clear of WRITEABLE.
        let mut flags = MtdFlags::from_bits_retain(0x0001);
        flags.set_writable(true);
        assert_eq!(flags.bits(), 0x0401);
        flags.set_writable(false);
        assert_eq!(flags.bits(), 0x0001);
    }
}
