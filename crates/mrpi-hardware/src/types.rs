//! Common types shared across hardware implementations.

use serde::{Deserialize, Serialize};

/// Logic level read from a pin.
///
/// Buttons pull their pin to ground, so [`Level::Low`] means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_low(&self) -> bool {
        matches!(self, Self::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "rppal", "Mock GPIO").
    pub name: String,

    /// Device model identifier.
    pub model: String,
}

impl DeviceInfo {
    /// Create a new DeviceInfo.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// How a spawned command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
