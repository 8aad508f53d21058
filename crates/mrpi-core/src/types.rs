use crate::{
    Result,
    constants::{BCM_LINES, DIRECTION_IN, DIRECTION_OUT, VALID_PORTS},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical header pin number.
///
/// A `Port` is either one of [`VALID_PORTS`] or the [`Port::UNUSABLE`]
/// sentinel produced when a config line names something that is not a GPIO
/// pin. Lookups in the store never match the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u8);

impl Port {
    /// Sentinel for a port token that could not be resolved to a GPIO pin.
    pub const UNUSABLE: Port = Port(0);

    /// Create a port with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPort` if `pin` is not a GPIO pin on the header.
    pub fn new(pin: u8) -> Result<Self> {
        if VALID_PORTS.contains(&pin) {
            Ok(Port(pin))
        } else {
            Err(Error::invalid_port(pin.to_string()))
        }
    }

    /// Resolve a config token leniently.
    ///
    /// Surrounding whitespace is ignored and leading zeros are accepted
    /// (`"07"` is pin 7). Anything that does not name a GPIO pin becomes
    /// [`Port::UNUSABLE`] instead of an error, so one bad token never aborts
    /// loading.
    ///
    /// # Examples
    ///
    /// ```
    /// use mrpi_core::Port;
    ///
    /// assert_eq!(Port::from_token("07").as_u8(), 7);
    /// assert_eq!(Port::from_token("abc"), Port::UNUSABLE);
    /// assert_eq!(Port::from_token("4"), Port::UNUSABLE); // 5V pin
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|pin| Port::new(pin).ok())
            .unwrap_or(Port::UNUSABLE)
    }

    /// Get the raw pin number (0 for the sentinel).
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether this port refers to a real GPIO pin.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        *self != Port::UNUSABLE
    }

    /// BCM GPIO line driven by this header pin, `None` for the sentinel.
    #[must_use]
    pub fn bcm_line(&self) -> Option<u8> {
        VALID_PORTS
            .iter()
            .position(|&p| p == self.0)
            .map(|idx| BCM_LINES[idx])
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl std::str::FromStr for Port {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pin: u8 = s.trim().parse().map_err(|_| Error::invalid_port(s))?;
        Port::new(pin)
    }
}

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Input pin with a button to ground.
    #[serde(rename = "IN")]
    In,
    /// Output pin (LED and the like). Configured, never driven.
    #[serde(rename = "OUT")]
    Out,
}

impl Direction {
    /// Text form used in the config file.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => DIRECTION_IN,
            Self::Out => DIRECTION_OUT,
        }
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::In)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    /// Parse `IN` or `OUT`. Case matters; surrounding whitespace does not.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            DIRECTION_IN => Ok(Self::In),
            DIRECTION_OUT => Ok(Self::Out),
            other => Err(Error::invalid_direction(s, other)),
        }
    }
}
