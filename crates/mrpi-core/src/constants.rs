//! Core constants for the mrpi button daemon.
//!
//! This module defines the board layout, file locations, and config file
//! syntax used throughout the workspace. Everything board-specific lives
//! here so that supporting another header layout means touching one file.
//!
//! # Config File Syntax
//!
//! ```text
//! PORT=DIRECTION<cmd:>COMMAND
//! ```
//!
//! | Token | Constant | Purpose |
//! |-------|----------|---------|
//! | `=` | [`PORT_SEPARATOR`] | Separates the port number from the rest of the line |
//! | `<cmd:>` | [`COMMAND_DELIMITER`] | Separates the direction from the command |
//! | `#` | [`COMMENT_MARKER`] | Marks a full-line comment when first on a line |
//!
//! # Usage
//!
//! ```
//! use mrpi_core::constants::*;
//!
//! let line = "07=IN<cmd:>button.sh";
//! let (port, rest) = line.split_once(PORT_SEPARATOR).unwrap();
//! let segments: Vec<&str> = rest.split(COMMAND_DELIMITER).collect();
//!
//! assert_eq!(port, "07");
//! assert_eq!(segments, vec!["IN", "button.sh"]);
//! ```

// ============================================================================
// Board Layout
// ============================================================================

/// Physical header pins usable as GPIO on a Raspberry Pi revision 2 (P1 header).
///
/// Power and ground pins are absent: a config line naming pin 1, 2, 4, 6,
/// 9, 14, 17, 20 or 25 resolves to the unusable port sentinel.
pub const VALID_PORTS: [u8; 17] = [
    3, 5, 7, 8, 10, 11, 12, 13, 15, 16, 18, 19, 21, 22, 23, 24, 26,
];

/// BCM GPIO line number for each entry of [`VALID_PORTS`], index for index.
///
/// # Examples
///
/// ```
/// use mrpi_core::constants::{BCM_LINES, VALID_PORTS};
///
/// let idx = VALID_PORTS.iter().position(|&p| p == 7).unwrap();
/// assert_eq!(BCM_LINES[idx], 4);
/// ```
pub const BCM_LINES: [u8; 17] = [2, 3, 4, 14, 15, 17, 18, 27, 22, 23, 24, 10, 9, 25, 11, 8, 7];

/// Upper bound on how many pins the board exposes.
///
/// [`ConfigStore::all_ports`](crate::store::ConfigStore::all_ports) never
/// returns more entries than this, no matter how long the config file is.
pub const MAX_GPIO_PORTS: usize = VALID_PORTS.len();

// ============================================================================
// File Locations
// ============================================================================

/// Default location of the pin-to-command mapping.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mrpi/conf";

/// Default location of the command whitelist.
///
/// This file is the security boundary for the whole daemon and must only be
/// writable by root.
pub const DEFAULT_WHITELIST_PATH: &str = "/etc/mrpi/whitelist";

// ============================================================================
// Config File Syntax
// ============================================================================

/// Separator between the port token and the rest of a config line.
pub const PORT_SEPARATOR: char = '=';

/// Literal sequence separating the direction from the command.
///
/// A multi-character sentinel is used instead of a comma so that commands
/// may carry arguments containing commas.
pub const COMMAND_DELIMITER: &str = "<cmd:>";

/// First byte of a full-line comment in both the config and the whitelist
/// file.
pub const COMMENT_MARKER: u8 = b'#';

/// Bytes that terminate a logical line of the config file.
///
/// `\r\n` therefore yields an empty logical line between two real ones,
/// which the parser skips.
pub const CONFIG_LINE_TERMINATORS: [u8; 3] = [b'\n', b'\r', b'\0'];

/// Bytes that terminate a logical line of the whitelist file.
///
/// NUL is not among them: it stays part of the entry, which then matches no
/// command.
pub const WHITELIST_LINE_TERMINATORS: [u8; 2] = [b'\n', b'\r'];

/// Text form of [`Direction::In`](crate::types::Direction::In).
pub const DIRECTION_IN: &str = "IN";

/// Text form of [`Direction::Out`](crate::types::Direction::Out).
pub const DIRECTION_OUT: &str = "OUT";

// ============================================================================
// Polling
// ============================================================================

/// Default delay between two GPIO polls, in milliseconds.
///
/// # Examples
///
/// ```
/// use mrpi_core::constants::DEFAULT_POLL_DELAY_MS;
/// use std::time::Duration;
///
/// let interval = Duration::from_millis(DEFAULT_POLL_DELAY_MS);
/// assert_eq!(interval.as_millis(), 500);
/// ```
pub const DEFAULT_POLL_DELAY_MS: u64 = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_tables_line_up() {
        assert_eq!(VALID_PORTS.len(), BCM_LINES.len());
        assert_eq!(MAX_GPIO_PORTS, 17);
    }

    #[test]
    fn test_bcm_lines_are_unique() {
        let mut lines = BCM_LINES.to_vec();
        lines.sort_unstable();
        lines.dedup();
        assert_eq!(lines.len(), BCM_LINES.len());
    }

    #[test]
    fn test_whitelist_terminators_are_config_subset() {
        assert!(
            WHITELIST_LINE_TERMINATORS
                .iter()
                .all(|b| CONFIG_LINE_TERMINATORS.contains(b))
        );
        assert!(!WHITELIST_LINE_TERMINATORS.contains(&b'\0'));
    }

    #[test]
    fn test_valid_ports_sorted() {
        assert!(VALID_PORTS.windows(2).all(|w| w[0] < w[1]));
    }
}
