//! Hardware side of the mrpi button daemon.
//!
//! This crate reads the GPIO header and spawns the commands bound to its
//! buttons. Both concerns sit behind traits so the poll loop can run against
//! mocks in tests and against the real board in production.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: runtime backend selection goes through the
//!   [`devices`] wrappers instead of trait objects.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Capabilities
//!
//! ## GPIO Devices
//!
//! The [`GpioDevice`] trait configures and reads header pins:
//!
//! ```no_run
//! use mrpi_core::{Direction, Port};
//! use mrpi_hardware::traits::GpioDevice;
//! use mrpi_hardware::error::Result;
//!
//! async fn pressed<G: GpioDevice>(gpio: &G, port: Port) -> Result<bool> {
//!     Ok(gpio.read_level(port).await?.is_low())
//! }
//! ```
//!
//! ## Command Runners
//!
//! The [`CommandRunner`] trait runs a whitelisted command line to completion:
//!
//! ```no_run
//! use mrpi_hardware::runner::ShellRunner;
//! use mrpi_hardware::traits::CommandRunner;
//!
//! # async fn example() -> mrpi_hardware::Result<()> {
//! let mut runner = ShellRunner::new().with_working_dir("/tmp");
//! let outcome = runner.run("touch pressed").await?;
//! assert!(outcome.success());
//! # Ok(())
//! # }
//! ```
//!
//! # Poll Loop
//!
//! [`Poller`] ties a [`ConfigStore`](mrpi_core::ConfigStore) to one device of
//! each kind and turns pin levels into press and release edges.
//!
//! # Feature Flags
//!
//! - `hardware-rppal`: Raspberry Pi GPIO via `rppal` ([`rpi::RppalGpio`]).
//!
//! [`GpioDevice`]: traits::GpioDevice
//! [`CommandRunner`]: traits::CommandRunner

pub mod devices;
pub mod error;
pub mod mock;
pub mod poller;
#[cfg(feature = "hardware-rppal")]
pub mod rpi;
pub mod runner;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use types::{CommandOutcome, DeviceInfo, Level};

pub use devices::{AnyCommandRunner, AnyGpioDevice};
pub use poller::{PinEvent, PinEventKind, PollConfig, PollStats, Poller};
