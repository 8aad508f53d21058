//! Capability trait definitions.
//!
//! The poll loop talks to the outside world through two traits: a GPIO
//! device that configures and reads pins, and a command runner that spawns
//! the command bound to a pressed button. Both have a mock implementation
//! for tests and a real one for the board.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{CommandOutcome, DeviceInfo, Level};
use mrpi_core::{Direction, Port};

/// GPIO device abstraction.
///
/// Pins are addressed by physical header number; implementations map them
/// to whatever numbering their driver uses.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the
/// [`AnyGpioDevice`](crate::devices::AnyGpioDevice) enum wrapper when the
/// concrete device is picked at runtime.
///
/// # Examples
///
/// ```no_run
/// use mrpi_core::{Direction, Port};
/// use mrpi_hardware::traits::GpioDevice;
/// use mrpi_hardware::error::Result;
///
/// async fn is_held<G: GpioDevice>(gpio: &mut G, pin: u8) -> Result<bool> {
///     let port = Port::new(pin).map_err(|e| mrpi_hardware::HardwareError::other(e.to_string()))?;
///     gpio.configure_pin(port, Direction::In).await?;
///     Ok(gpio.read_level(port).await?.is_low())
/// }
/// ```
pub trait GpioDevice: Send + Sync {
    /// Configure a pin for the given direction.
    ///
    /// Input pins get the internal pull-up enabled, so an open button reads
    /// [`Level::High`] and a pressed one [`Level::Low`]. Output pins are
    /// configured but never driven.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The port is not a GPIO pin on this board
    /// - The driver refuses the pin (e.g. already in use)
    async fn configure_pin(&mut self, port: Port, direction: Direction) -> Result<()>;

    /// Read the current level of a configured pin.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin was not configured first or the driver
    /// fails to read it.
    async fn read_level(&self, port: Port) -> Result<Level>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Process-spawn abstraction.
///
/// Runs a command line that already passed the whitelist and waits for it
/// to finish.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion.
    ///
    /// A command that starts and exits non-zero is `Ok` with a failed
    /// [`CommandOutcome`].
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned at all.
    async fn run(&mut self, command: &str) -> Result<CommandOutcome>;
}
