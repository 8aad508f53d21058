//! Command whitelist.
//!
//! The whitelist is the single security boundary of the daemon: a config
//! file can only bind a pin to a command whose first token is listed here.
//! If the whitelist file is missing or empty, no command ever runs.
//!
//! # File Format
//!
//! ```text
//! # commands buttons may run
//! /home/pi/shutdown.sh
//! mpc
//! ```
//!
//! Each non-comment line is stored verbatim, so `mpc ` (trailing space) and
//! `mpc` are different entries. A line that is not valid UTF-8 is ignored
//! and logged; it never matches anything. Keep the file owned by root with mode 600:
//! the daemon runs as root and does not check permissions itself.

use crate::constants::WHITELIST_LINE_TERMINATORS;
use crate::error::{Error, Result};
use crate::lines::logical_lines;
use std::path::Path;
use tracing::{debug, error, warn};

/// Immutable set of command base names permitted to execute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<String>,
}

impl Whitelist {
    /// An empty whitelist. Rejects every command.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a whitelist from file contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use mrpi_core::Whitelist;
    ///
    /// let whitelist = Whitelist::parse("# allowed\nls\nbutton.sh\n");
    /// assert_eq!(whitelist.len(), 2);
    /// assert!(whitelist.cmd_allowed("ls -la"));
    /// assert!(!whitelist.cmd_allowed("rm -rf /"));
    /// ```
    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    /// Build a whitelist from raw file bytes.
    ///
    /// Lines are compared byte for byte later, so a line that is not UTF-8
    /// is dropped rather than decoded lossily.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        let mut entries = Vec::new();
        for line in logical_lines(bytes, &WHITELIST_LINE_TERMINATORS) {
            match line {
                Ok("") => {}
                Ok(entry) => entries.push(entry.to_owned()),
                Err(raw) => warn!(
                    line = %String::from_utf8_lossy(raw),
                    "Ignoring whitelist entry that is not valid UTF-8"
                ),
            }
        }
        Self { entries }
    }

    /// Load the whitelist from `path`.
    ///
    /// # Errors
    /// Returns `Error::MissingFile` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::missing_file(path, e))?;
        let whitelist = Self::parse_bytes(&bytes);
        debug!(path = %path.display(), entries = whitelist.len(), "Loaded whitelist");
        Ok(whitelist)
    }

    /// Load the whitelist, falling back to the fail-closed empty whitelist.
    ///
    /// The daemon still starts without a whitelist, it just never runs
    /// anything.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(whitelist) => whitelist,
            Err(e) => {
                error!(error = %e, "Could not load the whitelist file! No button will work!");
                Self::empty()
            }
        }
    }

    /// Check whether `command` may be executed.
    ///
    /// Only the first whitespace-delimited token is compared, byte for byte,
    /// against the entries; arguments are not inspected. An empty or
    /// whitespace-only command is never allowed.
    pub fn cmd_allowed(&self, command: &str) -> bool {
        let Some(pure_cmd) = command.split_whitespace().next() else {
            return false;
        };
        self.entries.iter().any(|entry| entry == pure_cmd)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the raw entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
