//! Shared constants for the mtdrw workspace.

/// Canonical service name (used for logging).
pub const MTDRW_SERVICE_NAME: &str = "mtdrw";

/// Default bound on the ascending device scan. One bit per device in the
/// unlocked set, so this is also the default size of that set.
pub const DEFAULT_MAX_DEVICES: usize = 64;

/// Hard ceiling for the configurable device bound.
pub const MAX_DEVICES_CEILING: usize = 4096;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mtdrw/config.toml";

/// Sysfs directory under which the kernel exposes MTD devices.
pub const SYSFS_MTD_ROOT: &str = "/sys/class/mtd";
