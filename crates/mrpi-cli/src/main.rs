//! mrpi: run whitelisted commands when GPIO buttons are pressed.
//!
//! # Usage
//!
//! ```text
//! mrpi [OPTIONS]
//!
//! Options:
//!   -g, --debug              Verbose logging
//!   -d, --delay <MS>         Poll interval in milliseconds [default: 500]
//!   -c, --config <PATH>      Pin mapping file [default: /etc/mrpi/conf]
//!   -w, --whitelist <PATH>   Allowed commands [default: /etc/mrpi/whitelist]
//!       --workdir <DIR>      Working directory for commands
//!       --check              Print the admitted mapping as JSON and exit
//!       --mock               Use a simulated GPIO header
//! ```
//!
//! `RUST_LOG` overrides the level picked by `--debug`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mrpi_core::constants::{DEFAULT_CONFIG_PATH, DEFAULT_POLL_DELAY_MS, DEFAULT_WHITELIST_PATH};
use mrpi_core::{ConfigStore, LoadSummary, PortEntry, Whitelist};
use mrpi_hardware::mock::MockGpio;
use mrpi_hardware::runner::ShellRunner;
use mrpi_hardware::traits::GpioDevice;
use mrpi_hardware::{AnyCommandRunner, AnyGpioDevice, PollConfig, Poller};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// GPIO button daemon.
///
/// Polls the input pins listed in the config file and runs the bound command
/// once per press, provided its program is on the whitelist.
#[derive(Debug, Parser)]
#[command(name = "mrpi", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short = 'g', long)]
    debug: bool,

    /// Poll interval in milliseconds.
    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_POLL_DELAY_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    delay: u64,

    /// Pin mapping file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "MRPI_CONFIG")]
    config: PathBuf,

    /// Whitelist of allowed programs.
    #[arg(short, long, default_value = DEFAULT_WHITELIST_PATH, env = "MRPI_WHITELIST")]
    whitelist: PathBuf,

    /// Working directory for spawned commands.
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Load both files, print the admitted entries as JSON and exit.
    #[arg(long)]
    check: bool,

    /// Drive a simulated header where every pin idles high.
    #[arg(long)]
    mock: bool,
}

/// Output of `--check`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    config: &'a Path,
    whitelist: &'a Path,
    has_config: bool,
    summary: LoadSummary,
    allowed: Vec<&'a str>,
    entries: &'a [PortEntry],
}

impl<'a> CheckReport<'a> {
    fn new(cli: &'a Cli, store: &'a ConfigStore) -> Self {
        Self {
            config: &cli.config,
            whitelist: &cli.whitelist,
            has_config: store.has_config(),
            summary: store.summary(),
            allowed: store.whitelist().iter().collect(),
            entries: store.entries(),
        }
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        // stdout carries the --check report
        .with_writer(std::io::stderr)
        .init();
}

fn load_store(cli: &Cli) -> ConfigStore {
    let whitelist = Whitelist::load_or_empty(&cli.whitelist);
    ConfigStore::load(&cli.config, whitelist)
}

fn open_gpio(mock: bool) -> anyhow::Result<AnyGpioDevice> {
    if mock {
        let (gpio, _handle) = MockGpio::new();
        return Ok(AnyGpioDevice::Mock(gpio));
    }

    #[cfg(feature = "hardware-rppal")]
    {
        let gpio = mrpi_hardware::rpi::RppalGpio::new().context("failed to open the GPIO header")?;
        return Ok(AnyGpioDevice::Rppal(gpio));
    }

    #[cfg(not(feature = "hardware-rppal"))]
    anyhow::bail!("mrpi was built without GPIO support; rerun with --mock")
}

fn command_runner(workdir: Option<&Path>) -> AnyCommandRunner {
    let runner = ShellRunner::new();
    AnyCommandRunner::Shell(match workdir {
        Some(dir) => runner.with_working_dir(dir),
        None => runner,
    })
}

/// Wait for `signal` to be delivered.
///
/// If the handler cannot be installed this never resolves, so the daemon
/// keeps running instead of shutting down right after start.
async fn until_signal<F>(signal: F, name: &str)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(signal = name, error = %e, "failed to listen for signal");
        std::future::pending::<()>().await;
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    () = until_signal(tokio::signal::ctrl_c(), "SIGINT") => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                until_signal(tokio::signal::ctrl_c(), "SIGINT").await;
            }
        }
    }

    #[cfg(not(unix))]
    until_signal(tokio::signal::ctrl_c(), "SIGINT").await;

    info!("shutdown signal received");
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let store = load_store(&cli);

    if cli.check {
        let report = CheckReport::new(&cli, &store);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize the mapping")?
        );
        return Ok(());
    }

    info!(version = mrpi_core::VERSION, delay_ms = cli.delay, "mrpi starting");

    let gpio = open_gpio(cli.mock)?;
    let device = gpio.get_info().await.context("failed to query the GPIO header")?;
    info!(name = %device.name, model = %device.model, "GPIO ready");

    let mut poller = Poller::new(
        store,
        gpio,
        command_runner(cli.workdir.as_deref()),
        PollConfig::from_millis(cli.delay),
    );
    poller.initialize().await;

    let stats = poller.run(shutdown_signal()).await;
    info!(
        ticks = stats.ticks,
        presses = stats.presses,
        commands_run = stats.commands_run,
        command_failures = stats.command_failures,
        "mrpi stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mrpi"]);

        assert!(!cli.debug);
        assert!(!cli.check);
        assert!(!cli.mock);
        assert_eq!(cli.delay, 500);
        assert_eq!(cli.workdir, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["mrpi", "-g", "-d", "50", "-c", "/tmp/conf", "-w", "/tmp/wl"]);

        assert!(cli.debug);
        assert_eq!(cli.delay, 50);
        assert_eq!(cli.config, PathBuf::from("/tmp/conf"));
        assert_eq!(cli.whitelist, PathBuf::from("/tmp/wl"));
    }

    #[test]
    fn test_cli_rejects_zero_delay() {
        assert!(Cli::try_parse_from(["mrpi", "-d", "0"]).is_err());
        assert!(Cli::try_parse_from(["mrpi", "-d", "soon"]).is_err());
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from(["mrpi", "--check", "--mock", "--workdir", "/srv"]);

        assert!(cli.check);
        assert!(cli.mock);
        assert_eq!(cli.workdir, Some(PathBuf::from("/srv")));
    }

    #[test]
    fn test_check_report_lists_admitted_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("conf");
        let whitelist = dir.path().join("whitelist");
        fs::write(&config, "07=IN<cmd:>button.sh\n11=IN<cmd:>rm -rf /\n").unwrap();
        fs::write(&whitelist, "button.sh\n").unwrap();

        let cli = Cli::parse_from([
            "mrpi",
            "--check",
            "-c",
            config.to_str().unwrap(),
            "-w",
            whitelist.to_str().unwrap(),
        ]);
        let store = load_store(&cli);
        let json = serde_json::to_value(CheckReport::new(&cli, &store)).unwrap();

        assert_eq!(json["has_config"], true);
        assert_eq!(json["allowed"], serde_json::json!(["button.sh"]));
        assert_eq!(json["entries"].as_array().unwrap().len(), 1);
        assert_eq!(json["entries"][0]["port"], 7);
        assert_eq!(json["entries"][0]["direction"], "IN");
        assert_eq!(json["summary"]["rejected_commands"], 1);
    }

    #[test]
    fn test_check_report_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "mrpi",
            "-c",
            dir.path().join("missing-conf").to_str().unwrap(),
            "-w",
            dir.path().join("missing-wl").to_str().unwrap(),
        ]);
        let store = load_store(&cli);
        let json = serde_json::to_value(CheckReport::new(&cli, &store)).unwrap();

        assert_eq!(json["has_config"], false);
        assert!(json["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_signal_handler_keeps_running() {
        let failing = async { Err(std::io::Error::other("signals unsupported")) };

        let waited =
            tokio::time::timeout(Duration::from_secs(3600), until_signal(failing, "SIGINT")).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_delivered_signal_resolves() {
        until_signal(async { Ok(()) }, "SIGINT").await;
    }

    #[tokio::test]
    async fn test_open_mock_gpio() {
        let gpio = open_gpio(true).unwrap();
        assert_eq!(gpio.get_info().await.unwrap().name, "Mock GPIO");
    }
}
