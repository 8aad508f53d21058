//! Enum wrappers for device dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn GpioDevice>`
//! is off the table. The binary picks its GPIO backend at runtime (`--mock`
//! or the real header), and these enums give it one concrete type to hand
//! to the [`Poller`](crate::poller::Poller).
//!
//! # Examples
//!
//! ```
//! use mrpi_hardware::devices::{AnyCommandRunner, AnyGpioDevice};
//! use mrpi_hardware::mock::MockGpio;
//! use mrpi_hardware::runner::ShellRunner;
//!
//! let (gpio, _handle) = MockGpio::new();
//! let gpio = AnyGpioDevice::Mock(gpio);
//! let runner = AnyCommandRunner::Shell(ShellRunner::new());
//! ```

use crate::mock::{MockGpio, MockRunner};
#[cfg(feature = "hardware-rppal")]
use crate::rpi::RppalGpio;
use crate::runner::ShellRunner;
use crate::traits::{CommandRunner, GpioDevice};
use crate::{CommandOutcome, DeviceInfo, Level, Result};
use mrpi_core::{Direction, Port};

/// Enum wrapper for GPIO device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyGpioDevice {
    /// Mock header for development and testing.
    Mock(MockGpio),

    /// Raspberry Pi header.
    #[cfg(feature = "hardware-rppal")]
    Rppal(RppalGpio),
}

impl GpioDevice for AnyGpioDevice {
    async fn configure_pin(&mut self, port: Port, direction: Direction) -> Result<()> {
        match self {
            Self::Mock(device) => device.configure_pin(port, direction).await,
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(device) => device.configure_pin(port, direction).await,
        }
    }

    async fn read_level(&self, port: Port) -> Result<Level> {
        match self {
            Self::Mock(device) => device.read_level(port).await,
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(device) => device.read_level(port).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for command runner dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCommandRunner {
    /// Spawns through the system shell.
    Shell(ShellRunner),

    /// Records commands without running them.
    Mock(MockRunner),
}

impl CommandRunner for AnyCommandRunner {
    async fn run(&mut self, command: &str) -> Result<CommandOutcome> {
        match self {
            Self::Shell(runner) => runner.run(command).await,
            Self::Mock(runner) => runner.run(command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_gpio_device_mock() {
        let (gpio, handle) = MockGpio::new();
        let mut any_gpio = AnyGpioDevice::Mock(gpio);
        let port = Port::new(11).unwrap();

        any_gpio.configure_pin(port, Direction::In).await.unwrap();
        handle.press(port);

        assert_eq!(any_gpio.read_level(port).await.unwrap(), Level::Low);
        assert_eq!(any_gpio.get_info().await.unwrap().name, "Mock GPIO");
    }

    #[tokio::test]
    async fn test_any_command_runner_mock() {
        let (runner, handle) = MockRunner::new();
        let mut any_runner = AnyCommandRunner::Mock(runner);

        assert!(any_runner.run("a.sh").await.unwrap().success());
        assert_eq!(handle.executed(), vec!["a.sh"]);
    }
}
