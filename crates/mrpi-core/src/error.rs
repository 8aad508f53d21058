//! Error types for configuration loading.
//!
//! None of these errors is fatal to the daemon: every variant is logged by
//! the loader that produced it and the offending file or line is skipped.
//! They are still returned as values so callers and tests can tell the
//! failure modes apart.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The config or whitelist file could not be opened.
    #[error("Cannot open {path}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config line does not follow `PORT=DIRECTION<cmd:>COMMAND`.
    #[error("Invalid configuration line ({reason}): {line}")]
    MalformedLine { line: String, reason: String },

    /// The direction token is neither `IN` nor `OUT`.
    #[error("Invalid direction '{value}' in line: {line}")]
    InvalidDirection { line: String, value: String },

    /// The command's base name is not in the whitelist.
    #[error("The command in configuration is not allowed to run: {command}")]
    CommandNotWhitelisted { command: String },

    /// The port token is not a usable physical pin.
    #[error("Invalid port: {token}")]
    InvalidPort { token: String },
}

impl Error {
    /// Create a missing file error.
    pub fn missing_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingFile {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed line error.
    pub fn malformed(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid direction error.
    pub fn invalid_direction(line: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDirection {
            line: line.into(),
            value: value.into(),
        }
    }

    /// Create a command rejection error.
    pub fn not_whitelisted(command: impl Into<String>) -> Self {
        Self::CommandNotWhitelisted {
            command: command.into(),
        }
    }

    /// Create an invalid port error.
    pub fn invalid_port(token: impl Into<String>) -> Self {
        Self::InvalidPort {
            token: token.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_file_error() {
        let error = Error::missing_file(
            "/etc/mrpi/conf",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(matches!(error, Error::MissingFile { .. }));
        assert_eq!(error.to_string(), "Cannot open /etc/mrpi/conf: not found");
    }

    #[test]
    fn test_malformed_line_error() {
        let error = Error::malformed("07IN", "missing '='");
        assert_eq!(
            error.to_string(),
            "Invalid configuration line (missing '='): 07IN"
        );
    }

    #[test]
    fn test_not_whitelisted_error() {
        let error = Error::not_whitelisted("rm -rf /");
        assert!(matches!(error, Error::CommandNotWhitelisted { .. }));
        assert_eq!(
            error.to_string(),
            "The command in configuration is not allowed to run: rm -rf /"
        );
    }

    #[test]
    fn test_invalid_direction_error() {
        let error = Error::invalid_direction("07=UP<cmd:>a.sh", "UP");
        assert_eq!(
            error.to_string(),
            "Invalid direction 'UP' in line: 07=UP<cmd:>a.sh"
        );
    }

    #[test]
    fn test_missing_file_exposes_source() {
        use std::error::Error as _;
        let error = Error::missing_file("x", io::Error::other("boom"));
        assert!(error.source().is_some());
    }
}
