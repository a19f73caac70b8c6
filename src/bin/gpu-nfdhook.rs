//! gpu-nfdhook - node-feature-discovery hook labeling Intel GPUs.
//!
//! Prints one `name=value` label per line on stdout. Logs go to stderr.
//!
//! Usage:
//!   gpu-nfdhook              # scan the host
//!   gpu-nfdhook -vv          # with debug logging
//!   GPU_MEMORY_OVERRIDE=16000000000 gpu-nfdhook

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;

use gpu_nfdhook::collector::memory::MEMORY_OVERRIDE_ENV;
use gpu_nfdhook::collector::{Labeler, MemoryOverride, RealFs};
use gpu_nfdhook::config::{
    DEFAULT_DEBUGFS_DRI_DIR, DEFAULT_DEVFS_DIR, DEFAULT_SYSFS_DIR, LabelerConfig,
};

/// Intel GPU labeler for node-feature-discovery.
#[derive(Parser)]
#[command(name = "gpu-nfdhook", about = "Intel GPU node labeler", version)]
struct Args {
    /// Path to the DRM sysfs class directory.
    #[arg(long, env = "GPU_NFDHOOK_SYSFS_PATH", default_value = DEFAULT_SYSFS_DIR)]
    sysfs_path: String,

    /// Path to the DRM device node directory.
    #[arg(long, env = "GPU_NFDHOOK_DEVFS_PATH", default_value = DEFAULT_DEVFS_DIR)]
    devfs_path: String,

    /// Path to the DRI debugfs directory.
    #[arg(long, env = "GPU_NFDHOOK_DEBUGFS_PATH", default_value = DEFAULT_DEBUGFS_DRI_DIR)]
    debugfs_path: String,

    /// GPU local memory in bytes, applied to every card.
    /// Invalid values count as 0.
    #[arg(long, env = MEMORY_OVERRIDE_ENV, value_name = "BYTES")]
    memory_override: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn level.
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Builds the log filter. A valid non-empty RUST_LOG takes precedence over `-v`/`-q`.
fn log_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(format!("gpu_nfdhook={}", level));
    match rust_log.filter(|v| !v.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(level, rust_log.as_deref());

    // stdout belongs to the hook protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = LabelerConfig::default()
        .with_sysfs_dir(&args.sysfs_path)
        .with_devfs_dir(&args.devfs_path)
        .with_debugfs_dri_dir(&args.debugfs_path);
    let memory = MemoryOverride::from_value(args.memory_override.as_deref());

    let labeler = Labeler::new(RealFs::new(), &config, memory);
    let labels = match labeler.create_labels() {
        Ok(labels) => labels,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = labels.write_to(&mut stdout).and_then(|_| stdout.flush()) {
        error!("failed to print labels: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter_from_verbosity() {
        let filter = log_filter(Level::DEBUG, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Level::WARN, Some(""));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        let filter = log_filter(Level::WARN, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Level::WARN, Some("gpu_nfdhook=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }
}
