//! Error types for hardware operations.
//!
//! This module defines error types for the two capabilities the poll loop
//! depends on: reading and configuring GPIO pins, and spawning the commands
//! bound to them.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The GPIO peripheral could not be opened.
    #[error("GPIO unavailable: {message}")]
    Unavailable { message: String },

    /// The pin number does not exist on the board.
    #[error("Invalid pin: {pin}")]
    InvalidPin { pin: u8 },

    /// The pin was read before being configured.
    #[error("Pin {pin} is not configured")]
    PinNotConfigured { pin: u8 },

    /// The GPIO driver rejected an operation.
    #[error("GPIO error on pin {pin}: {message}")]
    Gpio { pin: u8, message: String },

    /// A command could not be spawned.
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new invalid pin error.
    pub fn invalid_pin(pin: u8) -> Self {
        Self::InvalidPin { pin }
    }

    /// Create a new pin not configured error.
    pub fn not_configured(pin: u8) -> Self {
        Self::PinNotConfigured { pin }
    }

    /// Create a new GPIO driver error.
    pub fn gpio(pin: u8, message: impl Into<String>) -> Self {
        Self::Gpio {
            pin,
            message: message.into(),
        }
    }

    /// Create a new command failure error.
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error() {
        let error = HardwareError::unavailable("/dev/gpiomem: permission denied");
        assert!(matches!(error, HardwareError::Unavailable { .. }));
        assert_eq!(
            error.to_string(),
            "GPIO unavailable: /dev/gpiomem: permission denied"
        );
    }

    #[test]
    fn test_pin_errors() {
        assert_eq!(HardwareError::invalid_pin(4).to_string(), "Invalid pin: 4");
        assert_eq!(
            HardwareError::not_configured(7).to_string(),
            "Pin 7 is not configured"
        );
        assert_eq!(
            HardwareError::gpio(7, "busy").to_string(),
            "GPIO error on pin 7: busy"
        );
    }

    #[test]
    fn test_command_failed_error() {
        let error = HardwareError::command_failed("button.sh", "No such file or directory");
        assert!(matches!(error, HardwareError::CommandFailed { .. }));
        assert_eq!(
            error.to_string(),
            "Command 'button.sh' failed: No such file or directory"
        );
    }

    #[test]
    fn test_io_conversion() {
        let error: HardwareError = std::io::Error::other("boom").into();
        assert!(matches!(error, HardwareError::Io(_)));
    }
}
