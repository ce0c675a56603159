//! # mtdrw Binary
//!
//! Makes read-only MTD partitions writeable for the lifetime of the process
//! and puts the flags back on shutdown. Refuses to run unless the operator
//! explicitly opts in.
//!
//! # Usage
//!
//! ```bash
//! # Unlock for real (opt-in required)
//! mtdrw --i-want-a-brick
//!
//! # Opt in via config instead
//! mtdrw --config /etc/mtdrw/config.toml
//!
//! # Dry run against an in-memory registry
//! mtdrw --simulate --i-want-a-brick -v
//! ```

#![deny(warnings)]

use clap::Parser;
use mtdrw::registry::sim::SimRegistry;
use mtdrw::registry::sysfs::SysfsRegistry;
use mtdrw::session::UnlockSession;
use mtdrw_common::config::{ConfigError, ConfigLoader, MtdRwConfig};
use mtdrw_common::consts::DEFAULT_CONFIG_PATH;
use mtdrw_common::mtd::registry::MtdRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// mtdrw - reversible write-unlock for read-only MTD partitions
#[derive(Parser, Debug)]
#[command(name = "mtdrw")]
#[command(version)]
#[command(about = "Make read-only MTD partitions writeable until shutdown")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Opt in to the unsafe override (same as i_want_a_brick=true in config)
    #[arg(long)]
    i_want_a_brick: bool,

    /// Run against an in-memory registry instead of sysfs
    #[arg(short = 's', long)]
    simulate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("mtdrw failed: {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(&args);

    info!("mtdrw v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&args.config)?;
    if args.i_want_a_brick {
        config.unlock.i_want_a_brick = true;
    }
    config.validate()?;

    if args.simulate {
        info!("Simulation mode enabled");
        let mut registry = demo_registry();
        run_cycle(&mut registry, &config)?;
    } else {
        let mut registry = SysfsRegistry::new();
        run_cycle(&mut registry, &config)?;
    }

    info!("mtdrw shutdown complete");
    Ok(())
}

/// Unlock, park until a shutdown signal, then restore.
fn run_cycle<R: MtdRegistry>(
    registry: &mut R,
    config: &MtdRwConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = UnlockSession::activate(registry, &config.unlock)?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    session.deactivate(registry);
    Ok(())
}

/// Load the configuration file, falling back to defaults if it is absent.
fn load_config(path: &Path) -> Result<MtdRwConfig, ConfigError> {
    match MtdRwConfig::load(path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound) => {
            warn!("No configuration file at {}; using defaults", path.display());
            Ok(MtdRwConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Fixed layout for `--simulate` runs: three read-only partitions and one
/// that is already writeable.
fn demo_registry() -> SimRegistry {
    SimRegistry::with_devices(&[false, false, false, true])
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
