//! Button poll loop.
//!
//! The [`Poller`] owns the [`ConfigStore`], a GPIO device and a command
//! runner. Every tick it reads each configured input pin and turns level
//! changes into press and release edges:
//!
//! ```text
//!   level   pressed?   action
//!   -----   --------   -------------------------------------------
//!   Low     no         emit Pressed, run command, mark pressed
//!   Low     yes        nothing (one command per press)
//!   High    yes        emit Released, clear pressed
//!   High    no         nothing
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use mrpi_core::{ConfigStore, Whitelist};
//! use mrpi_hardware::mock::{MockGpio, MockRunner};
//! use mrpi_hardware::poller::{PollConfig, Poller};
//!
//! #[tokio::main]
//! async fn main() -> mrpi_hardware::Result<()> {
//!     let store = ConfigStore::build("07=IN<cmd:>button.sh\n", Whitelist::parse("button.sh\n"));
//!     let (gpio, _gpio_handle) = MockGpio::new();
//!     let (runner, _runner_handle) = MockRunner::new();
//!
//!     let mut poller = Poller::new(store, gpio, runner, PollConfig::default());
//!     poller.initialize().await;
//!
//!     let stats = poller.run(async { tokio::signal::ctrl_c().await.ok(); }).await;
//!     println!("{} presses", stats.presses);
//!     Ok(())
//! }
//! ```

use crate::traits::{CommandRunner, GpioDevice};
use chrono::{DateTime, Utc};
use mrpi_core::{ConfigStore, Direction, Port, constants::DEFAULT_POLL_DELAY_MS};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Poll loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two ticks.
    pub interval: Duration,
}

impl PollConfig {
    /// Config ticking every `millis` milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::default().with_interval(Duration::from_millis(millis))
    }

    /// Set the delay between two ticks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_DELAY_MS),
        }
    }
}

/// Edge seen on an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinEventKind {
    Pressed,
    Released,
}

/// A press or release observed during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinEvent {
    pub port: Port,
    pub kind: PinEventKind,
    pub timestamp: DateTime<Utc>,
}

impl PinEvent {
    fn now(port: Port, kind: PinEventKind) -> Self {
        Self {
            port,
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Counters accumulated since the poller was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub ticks: u64,
    pub presses: u64,
    pub releases: u64,
    pub commands_run: u64,
    /// Commands that failed to spawn or exited non-zero.
    pub command_failures: u64,
    pub read_errors: u64,
}

/// Drives the buttons described by a [`ConfigStore`].
pub struct Poller<G, R> {
    store: ConfigStore,
    gpio: G,
    runner: R,
    config: PollConfig,

    /// Input pins that were configured successfully, in config order.
    inputs: Vec<Port>,

    stats: PollStats,
    events_tx: Option<mpsc::Sender<PinEvent>>,
}

impl<G: GpioDevice, R: CommandRunner> Poller<G, R> {
    pub fn new(store: ConfigStore, gpio: G, runner: R, config: PollConfig) -> Self {
        Self {
            store,
            gpio,
            runner,
            config,
            inputs: Vec::new(),
            stats: PollStats::default(),
            events_tx: None,
        }
    }

    /// Forward every edge to `tx` as well as returning it from [`tick`](Self::tick).
    ///
    /// Events are dropped when the channel is full; the loop never waits on
    /// a slow consumer.
    pub fn with_events(mut self, tx: mpsc::Sender<PinEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Configure every usable port of the store.
    ///
    /// A pin the device refuses is logged and left out of polling. Returns
    /// the number of pins configured.
    pub async fn initialize(&mut self) -> usize {
        self.inputs.clear();
        let mut configured: Vec<Port> = Vec::new();

        for pin in self.store.all_ports() {
            let Ok(port) = Port::new(pin) else {
                continue;
            };
            if configured.contains(&port) {
                continue;
            }
            let Some(direction) = self.store.direction(pin) else {
                continue;
            };

            match self.gpio.configure_pin(port, direction).await {
                Ok(()) => {
                    debug!(%port, %direction, "Pin configured");
                    configured.push(port);
                    if direction == Direction::In {
                        self.inputs.push(port);
                    }
                }
                Err(e) => error!(%port, %direction, error = %e, "Failed to configure pin"),
            }
        }

        info!(
            configured = configured.len(),
            inputs = self.inputs.len(),
            "GPIO initialized"
        );
        configured.len()
    }

    /// Read every input pin once and act on the edges.
    pub async fn tick(&mut self) -> Vec<PinEvent> {
        self.stats.ticks += 1;
        let mut events = Vec::new();

        for i in 0..self.inputs.len() {
            let port = self.inputs[i];
            let pin = port.as_u8();

            let level = match self.gpio.read_level(port).await {
                Ok(level) => level,
                Err(e) => {
                    self.stats.read_errors += 1;
                    warn!(%port, error = %e, "Failed to read pin");
                    continue;
                }
            };

            let pressed = self.store.is_pressed(pin);
            if level.is_low() && !pressed {
                debug!(%port, "Button pressed");
                self.stats.presses += 1;
                events.push(PinEvent::now(port, PinEventKind::Pressed));
                self.store.set_pressed(pin, true);

                let command = self.store.command(pin).unwrap_or_default().to_owned();
                if !command.is_empty() {
                    self.run_command(port, &command).await;
                }
            } else if !level.is_low() && pressed {
                debug!(%port, "Button released");
                self.stats.releases += 1;
                events.push(PinEvent::now(port, PinEventKind::Released));
                self.store.set_pressed(pin, false);
            }
        }

        if let Some(tx) = &self.events_tx {
            for event in &events {
                if tx.try_send(event.clone()).is_err() {
                    debug!(port = %event.port, "Event channel full or closed, dropping event");
                }
            }
        }

        events
    }

    async fn run_command(&mut self, port: Port, command: &str) {
        self.stats.commands_run += 1;
        match self.runner.run(command).await {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => {
                self.stats.command_failures += 1;
                warn!(%port, command, exit_code = ?outcome.exit_code, "Command failed");
            }
            Err(e) => {
                self.stats.command_failures += 1;
                error!(%port, command, error = %e, "Command could not be started");
            }
        }
    }

    /// Tick until `shutdown` resolves and return the final counters.
    pub async fn run<F>(&mut self, shutdown: F) -> PollStats
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(interval_ms = self.config.interval.as_millis() as u64, "Polling started");
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }

        info!(
            ticks = self.stats.ticks,
            presses = self.stats.presses,
            commands_run = self.stats.commands_run,
            "Polling stopped"
        );
        self.stats
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Input pins being polled.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn into_store(self) -> ConfigStore {
        self.store
    }
}
