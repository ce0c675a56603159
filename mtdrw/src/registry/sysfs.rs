//! Sysfs-backed MTD registry.
//!
//! Resolves device indices against `/sys/class/mtd/mtdN` and manipulates the
//! writable attribute through the per-device `flags` file. The root
//! directory is injectable so tests can run against a scratch tree.

use mtdrw_common::consts::SYSFS_MTD_ROOT;
use mtdrw_common::mtd::flags::MtdFlags;
use mtdrw_common::mtd::registry::{MtdRegistry, RegistryError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Registry over the kernel's sysfs MTD class directory.
pub struct SysfsRegistry {
    root: PathBuf,
}

/// Resolved sysfs device: the `flags` file path and the flag word cached at
/// lookup time. Nothing is held open, so release is a plain drop.
pub struct SysfsHandle {
    flags_path: PathBuf,
    flags: MtdFlags,
}

impl SysfsRegistry {
    /// Registry over the kernel's real sysfs tree.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(SYSFS_MTD_ROOT),
        }
    }

    /// Registry over an alternate root directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_flags(path: &Path) -> Result<MtdFlags, RegistryError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RegistryError::NotFound,
            _ => RegistryError::Io(format!("{}: {e}", path.display())),
        })?;

        let word = raw.trim();
        let hex = word.strip_prefix("0x").unwrap_or(word);
        let bits = u32::from_str_radix(hex, 16).map_err(|e| {
            RegistryError::Io(format!("{}: bad flag word {word:?}: {e}", path.display()))
        })?;

        // Unknown bits are kept so a read-modify-write never clobbers them.
        Ok(MtdFlags::from_bits_retain(bits))
    }
}

impl Default for SysfsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MtdRegistry for SysfsRegistry {
    type Handle = SysfsHandle;

    fn lookup(&mut self, index: usize) -> Result<SysfsHandle, RegistryError> {
        let flags_path = self.root.join(format!("mtd{index}")).join("flags");
        let flags = Self::read_flags(&flags_path)?;
        Ok(SysfsHandle { flags_path, flags })
    }

    fn release(&mut self, _handle: SysfsHandle) {
        // Nothing is held open between operations.
    }

    fn is_writable(&self, handle: &SysfsHandle) -> bool {
        handle.flags.is_writable()
    }

    fn set_writable(&mut self, handle: &SysfsHandle, writable: bool) -> Result<(), RegistryError> {
        let mut flags = handle.flags;
        flags.set_writable(writable);
        fs::write(&handle.flags_path, format!("0x{:x}\n", flags.bits()))
            .map_err(|e| RegistryError::Io(format!("{}: {e}", handle.flags_path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_device(root: &Path, index: usize, word: &str) {
        let dir = root.join(format!("mtd{index}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("flags"), word).unwrap();
    }

    #[test]
    fn missing_device_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut registry = SysfsRegistry::with_root(tmp.path());
        assert!(matches!(registry.lookup(0), Err(RegistryError::NotFound)));
    }

    #[test]
    fn flag_word_is_parsed_from_hex() {
        let tmp = TempDir::new().unwrap();
        write_device(tmp.path(), 0, "0xc00\n");

        let mut registry = SysfsRegistry::with_root(tmp.path());
        let handle = registry.lookup(0).unwrap();
        assert!(registry.is_writable(&handle));
        registry.release(handle);
    }

    #[test]
    fn garbage_flag_word_is_io_error() {
        let tmp = TempDir::new().unwrap();
        write_device(tmp.path(), 0, "not-a-number\n");

        let mut registry = SysfsRegistry::with_root(tmp.path());
        assert!(matches!(registry.lookup(0), Err(RegistryError::Io(_))));
    }

    #[test]
    fn set_writable_preserves_unknown_bits() {
        let tmp = TempDir::new().unwrap();
        write_device(tmp.path(), 0, "0x2001\n");

        let mut registry = SysfsRegistry::with_root(tmp.path());
        let handle = registry.lookup(0).unwrap();
        registry.set_writable(&handle, true).unwrap();
        registry.release(handle);

        let word = fs::read_to_string(tmp.path().join("mtd0/flags")).unwrap();
        assert_eq!(word.trim(), "0x2401");
    }
}
