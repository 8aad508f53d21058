//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without requiring a board or spawning processes.

pub mod gpio;
pub mod runner;

// Re-export commonly used types
pub use gpio::{MockGpio, MockGpioHandle};
pub use runner::{MockRunner, MockRunnerHandle};
