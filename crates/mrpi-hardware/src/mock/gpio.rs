//! Mock GPIO implementation for testing and development.
//!
//! This module provides a simulated GPIO header whose pin levels are set
//! programmatically, so the poll loop can be driven without a board.

use crate::{
    HardwareError, Result,
    traits::GpioDevice,
    types::{DeviceInfo, Level},
};
use mrpi_core::{Direction, Port};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct PinBank {
    /// Levels forced by the handle; unset pins idle high (pull-up).
    levels: HashMap<Port, Level>,

    /// Pins configured by the device, with their direction.
    configured: HashMap<Port, Direction>,

    /// Pins whose reads fail.
    faulty: HashSet<Port>,

    /// Pins that refuse configuration.
    busy: HashSet<Port>,
}

fn lock(bank: &Mutex<PinBank>) -> MutexGuard<'_, PinBank> {
    bank.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock GPIO device for testing and development.
///
/// # Examples
///
/// ```
/// use mrpi_core::{Direction, Port};
/// use mrpi_hardware::mock::MockGpio;
/// use mrpi_hardware::traits::GpioDevice;
/// use mrpi_hardware::types::Level;
///
/// #[tokio::main]
/// async fn main() -> mrpi_hardware::Result<()> {
///     let (mut gpio, handle) = MockGpio::new();
///     let port = Port::new(7).unwrap();
///
///     gpio.configure_pin(port, Direction::In).await?;
///     assert_eq!(gpio.read_level(port).await?, Level::High);
///
///     handle.press(port);
///     assert_eq!(gpio.read_level(port).await?, Level::Low);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockGpio {
    bank: Arc<Mutex<PinBank>>,

    /// Device name
    name: String,
}

impl MockGpio {
    /// Create a new mock GPIO with the default name.
    ///
    /// Returns a tuple of (MockGpio, MockGpioHandle) where the handle
    /// controls the simulated pin levels.
    pub fn new() -> (Self, MockGpioHandle) {
        Self::with_name("Mock GPIO".to_string())
    }

    /// Create a new mock GPIO with a custom name.
    pub fn with_name(name: String) -> (Self, MockGpioHandle) {
        let bank = Arc::new(Mutex::new(PinBank::default()));

        let gpio = Self {
            bank: Arc::clone(&bank),
            name,
        };

        (gpio, MockGpioHandle { bank })
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new().0
    }
}

impl GpioDevice for MockGpio {
    async fn configure_pin(&mut self, port: Port, direction: Direction) -> Result<()> {
        if !port.is_usable() {
            return Err(HardwareError::invalid_pin(port.as_u8()));
        }

        let mut bank = lock(&self.bank);
        if bank.busy.contains(&port) {
            return Err(HardwareError::gpio(port.as_u8(), "Pin is busy"));
        }
        bank.configured.insert(port, direction);
        Ok(())
    }

    async fn read_level(&self, port: Port) -> Result<Level> {
        let bank = lock(&self.bank);
        if !bank.configured.contains_key(&port) {
            return Err(HardwareError::not_configured(port.as_u8()));
        }
        if bank.faulty.contains(&port) {
            return Err(HardwareError::gpio(port.as_u8(), "Simulated read failure"));
        }
        Ok(bank.levels.get(&port).copied().unwrap_or(Level::High))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock GPIO v1.0"))
    }
}

/// Handle for controlling a mock GPIO.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockGpioHandle {
    bank: Arc<Mutex<PinBank>>,
}

impl MockGpioHandle {
    /// Force the level of a pin.
    pub fn set_level(&self, port: Port, level: Level) {
        lock(&self.bank).levels.insert(port, level);
    }

    /// Simulate pressing a button (pin pulled low).
    pub fn press(&self, port: Port) {
        self.set_level(port, Level::Low);
    }

    /// Simulate releasing a button (pin back to the pull-up level).
    pub fn release(&self, port: Port) {
        self.set_level(port, Level::High);
    }

    /// Make reads of `port` fail (or succeed again).
    pub fn set_faulty(&self, port: Port, faulty: bool) {
        let mut bank = lock(&self.bank);
        if faulty {
            bank.faulty.insert(port);
        } else {
            bank.faulty.remove(&port);
        }
    }

    /// Make configuration of `port` fail.
    pub fn set_busy(&self, port: Port) {
        lock(&self.bank).busy.insert(port);
    }

    /// Direction a pin was configured with, if any.
    pub fn configured_direction(&self, port: Port) -> Option<Direction> {
        lock(&self.bank).configured.get(&port).copied()
    }

    /// Number of configured pins.
    pub fn configured_count(&self) -> usize {
        lock(&self.bank).configured.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(pin: u8) -> Port {
        Port::new(pin).unwrap()
    }

    #[tokio::test]
    async fn test_mock_gpio_idle_high() {
        let (mut gpio, _handle) = MockGpio::new();

        gpio.configure_pin(port(7), Direction::In).await.unwrap();
        assert_eq!(gpio.read_level(port(7)).await.unwrap(), Level::High);
    }

    #[tokio::test]
    async fn test_mock_gpio_press_release() {
        let (mut gpio, handle) = MockGpio::new();
        gpio.configure_pin(port(7), Direction::In).await.unwrap();

        handle.press(port(7));
        assert_eq!(gpio.read_level(port(7)).await.unwrap(), Level::Low);

        handle.release(port(7));
        assert_eq!(gpio.read_level(port(7)).await.unwrap(), Level::High);
    }

    #[tokio::test]
    async fn test_mock_gpio_unconfigured_read_fails() {
        let (gpio, _handle) = MockGpio::new();

        let result = gpio.read_level(port(7)).await;
        assert!(matches!(result, Err(HardwareError::PinNotConfigured { pin: 7 })));
    }

    #[tokio::test]
    async fn test_mock_gpio_rejects_sentinel() {
        let (mut gpio, _handle) = MockGpio::new();

        let result = gpio.configure_pin(Port::UNUSABLE, Direction::In).await;
        assert!(matches!(result, Err(HardwareError::InvalidPin { pin: 0 })));
    }

    #[tokio::test]
    async fn test_mock_gpio_busy_pin() {
        let (mut gpio, handle) = MockGpio::new();
        handle.set_busy(port(8));

        assert!(gpio.configure_pin(port(8), Direction::Out).await.is_err());
        assert_eq!(handle.configured_direction(port(8)), None);
    }

    #[tokio::test]
    async fn test_mock_gpio_faulty_pin() {
        let (mut gpio, handle) = MockGpio::new();
        gpio.configure_pin(port(7), Direction::In).await.unwrap();

        handle.set_faulty(port(7), true);
        assert!(gpio.read_level(port(7)).await.is_err());

        handle.set_faulty(port(7), false);
        assert!(gpio.read_level(port(7)).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_gpio_records_direction() {
        let (mut gpio, handle) = MockGpio::new();
        gpio.configure_pin(port(7), Direction::In).await.unwrap();
        gpio.configure_pin(port(26), Direction::Out).await.unwrap();

        assert_eq!(handle.configured_direction(port(7)), Some(Direction::In));
        assert_eq!(handle.configured_direction(port(26)), Some(Direction::Out));
        assert_eq!(handle.configured_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_gpio_get_info() {
        let (gpio, _handle) = MockGpio::with_name("Test Header".to_string());

        let info = gpio.get_info().await.unwrap();
        assert_eq!(info.name, "Test Header");
        assert_eq!(info.model, "Mock GPIO v1.0");
    }
}
