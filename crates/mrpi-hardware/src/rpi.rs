//! Raspberry Pi GPIO through `rppal`.
//!
//! Pins are addressed by physical header number and translated to BCM lines
//! before reaching the driver.

use crate::{
    HardwareError, Result,
    traits::GpioDevice,
    types::{DeviceInfo, Level},
};
use mrpi_core::{Direction, Port};
use rppal::gpio::{self, Gpio, InputPin, OutputPin};
use std::collections::HashMap;
use tracing::debug;

/// GPIO header of the board the daemon runs on.
#[derive(Debug)]
pub struct RppalGpio {
    gpio: Gpio,
    inputs: HashMap<Port, InputPin>,
    // Held so the pins stay claimed; never driven.
    outputs: HashMap<Port, OutputPin>,
}

impl RppalGpio {
    /// Open the GPIO peripheral.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Unavailable`] when `/dev/gpiomem` cannot be
    /// opened, which is the case on anything but a Raspberry Pi.
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HardwareError::unavailable(e.to_string()))?;
        Ok(Self {
            gpio,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        })
    }
}

impl GpioDevice for RppalGpio {
    async fn configure_pin(&mut self, port: Port, direction: Direction) -> Result<()> {
        let line = port
            .bcm_line()
            .ok_or_else(|| HardwareError::invalid_pin(port.as_u8()))?;
        let pin = self
            .gpio
            .get(line)
            .map_err(|e| HardwareError::gpio(port.as_u8(), e.to_string()))?;

        debug!(%port, line, %direction, "Configuring pin");
        match direction {
            Direction::In => {
                self.outputs.remove(&port);
                self.inputs.insert(port, pin.into_input_pullup());
            }
            Direction::Out => {
                self.inputs.remove(&port);
                self.outputs.insert(port, pin.into_output());
            }
        }
        Ok(())
    }

    async fn read_level(&self, port: Port) -> Result<Level> {
        let pin = self
            .inputs
            .get(&port)
            .ok_or_else(|| HardwareError::not_configured(port.as_u8()))?;

        Ok(match pin.read() {
            gpio::Level::Low => Level::Low,
            gpio::Level::High => Level::High,
        })
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        let model = rppal::system::DeviceInfo::new()
            .map(|info| info.model().to_string())
            .map_err(|e| HardwareError::other(e.to_string()))?;
        Ok(DeviceInfo::new("rppal", model))
    }
}
