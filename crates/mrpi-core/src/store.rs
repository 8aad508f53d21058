//! Admitted pin configuration and press-state tracking.
//!
//! The [`ConfigStore`] is built once at startup and then owned by the poll
//! loop, which queries it every tick. It never fails to build: a missing
//! config file gives an empty store, bad lines are skipped, and commands
//! outside the whitelist are dropped together with their pin.
//!
//! # Lookup Semantics
//!
//! Lookups scan the entries in file order and return the first match. The
//! daemon handles a few dozen pins at most, so a scan is as fast as a map
//! and keeps the first-match rule obvious when a port appears twice.
//!
//! # Examples
//!
//! ```
//! use mrpi_core::{ConfigStore, Direction, Whitelist};
//!
//! let whitelist = Whitelist::parse("button.sh\n");
//! let mut store = ConfigStore::build("07=IN<cmd:>button.sh\n", whitelist);
//!
//! assert_eq!(store.config_count(), 1);
//! assert_eq!(store.direction(7), Some(Direction::In));
//! assert_eq!(store.command(7), Some("button.sh"));
//!
//! store.set_pressed(7, true);
//! assert!(store.is_pressed(7));
//! assert!(!store.is_pressed(8));
//! ```

use crate::constants::MAX_GPIO_PORTS;
use crate::error::Error;
use crate::parser::{ConfigParser, ParseOutcome, ParsedLine};
use crate::types::{Direction, Port};
use crate::whitelist::Whitelist;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, warn};

/// One admitted pin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    port: Port,
    direction: Direction,
    command: String,
    #[serde(skip)]
    pressed: bool,
}

impl PortEntry {
    fn new(line: ParsedLine) -> Self {
        Self {
            port: line.port,
            direction: line.direction,
            command: line.command,
            pressed: false,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Command to run on press; empty if the pin has no action.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the command already fired for the current hold.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn matches(&self, port: u8) -> bool {
        self.port.is_usable() && self.port.as_u8() == port
    }
}

/// Counters collected while building a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Entries admitted into the store.
    pub admitted: usize,
    /// Lines rejected by the parser.
    pub malformed: usize,
    /// Lines dropped because their command is not whitelisted.
    pub rejected_commands: usize,
    /// Admitted entries whose port can never match.
    pub invalid_ports: usize,
    /// Admitted entries shadowed by an earlier entry for the same port.
    pub duplicate_ports: usize,
}

/// Owns the admitted [`PortEntry`] values and the [`Whitelist`].
///
/// Every entry with a non-empty command passed [`Whitelist::cmd_allowed`].
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    entries: Vec<PortEntry>,
    whitelist: Whitelist,
    has_config: bool,
    summary: LoadSummary,
}

impl ConfigStore {
    /// Build a store from config file text.
    pub fn build(config_text: &str, whitelist: Whitelist) -> Self {
        Self::admit(ConfigParser::parse(config_text), whitelist)
    }

    fn admit(outcome: ParseOutcome, whitelist: Whitelist) -> Self {
        let mut store = Self {
            entries: Vec::with_capacity(outcome.lines.len()),
            whitelist,
            has_config: true,
            summary: LoadSummary {
                malformed: outcome.malformed,
                ..LoadSummary::default()
            },
        };

        let mut seen = HashSet::new();
        for line in outcome.lines {
            if !line.command.is_empty() && !store.whitelist.cmd_allowed(&line.command) {
                warn!(
                    port = %line.port,
                    error = %Error::not_whitelisted(line.command.as_str()),
                    "Pin will not be configured"
                );
                store.summary.rejected_commands += 1;
                continue;
            }

            if !line.port.is_usable() {
                store.summary.invalid_ports += 1;
            } else if !seen.insert(line.port) {
                warn!(port = %line.port, "Port configured more than once, the first entry wins");
                store.summary.duplicate_ports += 1;
            }

            store.entries.push(PortEntry::new(line));
        }

        store.summary.admitted = store.entries.len();
        store
    }

    /// Load the config file at `path`.
    ///
    /// A missing file is logged and yields an empty store for which
    /// [`has_config`](Self::has_config) is `false`.
    pub fn load(path: impl AsRef<Path>, whitelist: Whitelist) -> Self {
        let path = path.as_ref();
        let store = match std::fs::read(path) {
            Ok(bytes) => Self::admit(ConfigParser::parse_bytes(&bytes), whitelist),
            Err(e) => {
                error!(error = %Error::missing_file(path, e), "Could not find the config file!");
                Self {
                    whitelist,
                    ..Self::default()
                }
            }
        };

        let summary = store.summary;
        info!(
            path = %path.display(),
            admitted = summary.admitted,
            malformed = summary.malformed,
            rejected = summary.rejected_commands,
            invalid_ports = summary.invalid_ports,
            "Configuration loaded"
        );
        store
    }

    /// Whether a config file was read.
    pub fn has_config(&self) -> bool {
        self.has_config
    }

    pub fn summary(&self) -> LoadSummary {
        self.summary
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Whether `command` passes the whitelist.
    pub fn cmd_allowed(&self, command: &str) -> bool {
        self.whitelist.cmd_allowed(command)
    }

    /// All admitted entries in file order.
    pub fn entries(&self) -> &[PortEntry] {
        &self.entries
    }

    /// Number of admitted entries.
    pub fn config_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of GPIO pins the board exposes.
    pub fn max_ports(&self) -> usize {
        MAX_GPIO_PORTS
    }

    /// Port numbers of the admitted entries, in file order.
    ///
    /// At most [`max_ports`](Self::max_ports) values are returned. An entry
    /// with an unusable port leaves a `0` in its slot rather than being
    /// removed, so positions line up with [`entries`](Self::entries).
    pub fn all_ports(&self) -> Vec<u8> {
        self.entries
            .iter()
            .take(MAX_GPIO_PORTS)
            .map(|entry| entry.port.as_u8())
            .collect()
    }

    /// First entry configured for `port`.
    pub fn entry(&self, port: u8) -> Option<&PortEntry> {
        self.entries.iter().find(|entry| entry.matches(port))
    }

    pub fn direction(&self, port: u8) -> Option<Direction> {
        self.entry(port).map(PortEntry::direction)
    }

    pub fn command(&self, port: u8) -> Option<&str> {
        self.entry(port).map(PortEntry::command)
    }

    /// Set the press-state of the first entry for `port`. No-op if unknown.
    pub fn set_pressed(&mut self, port: u8, pressed: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.matches(port)) {
            entry.pressed = pressed;
        }
    }

    /// Press-state of the first entry for `port`; `false` if unknown.
    pub fn is_pressed(&self, port: u8) -> bool {
        self.entry(port).is_some_and(PortEntry::is_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;

    #[fixture]
    fn whitelist() -> Whitelist {
        Whitelist::parse("button.sh\nls\n")
    }

    #[rstest]
    fn test_round_trip(whitelist: Whitelist) {
        let store = ConfigStore::build("07=IN<cmd:>button.sh", whitelist);

        assert_eq!(store.config_count(), 1);
        assert_eq!(store.all_ports(), vec![7]);
        assert_eq!(store.direction(7), Some(Direction::In));
        assert_eq!(store.command(7), Some("button.sh"));
        assert!(!store.is_pressed(7));
    }

    #[rstest]
    fn test_non_whitelisted_command_is_dropped(whitelist: Whitelist) {
        let store = ConfigStore::build("07=IN<cmd:>rm -rf /\n08=IN<cmd:>ls -la\n", whitelist);

        assert_eq!(store.config_count(), 1);
        assert_eq!(store.command(7), None);
        assert_eq!(store.command(8), Some("ls -la"));
        assert_eq!(store.summary().rejected_commands, 1);
    }

    #[rstest]
    fn test_empty_command_is_admitted(whitelist: Whitelist) {
        let store = ConfigStore::build("26=OUT<cmd:>\n", whitelist);

        assert_eq!(store.config_count(), 1);
        assert_eq!(store.direction(26), Some(Direction::Out));
        assert_eq!(store.command(26), Some(""));
    }

    #[test]
    fn test_empty_whitelist_fails_closed() {
        let text = "07=IN<cmd:>button.sh\n08=IN<cmd:>ls\n26=OUT<cmd:>\n";
        let store = ConfigStore::build(text, Whitelist::empty());

        assert!(!store.cmd_allowed("button.sh"));
        assert!(store.entries().iter().all(|e| e.command().is_empty()));
        assert_eq!(store.config_count(), 1);
    }

    #[rstest]
    fn test_duplicate_ports_first_match_wins(whitelist: Whitelist) {
        let mut store = ConfigStore::build("07=IN<cmd:>button.sh\n07=OUT<cmd:>ls\n", whitelist);

        assert_eq!(store.config_count(), 2);
        assert_eq!(store.summary().duplicate_ports, 1);
        assert_eq!(store.direction(7), Some(Direction::In));
        assert_eq!(store.command(7), Some("button.sh"));

        store.set_pressed(7, true);
        assert!(store.entries()[0].is_pressed());
        assert!(!store.entries()[1].is_pressed());
    }

    #[rstest]
    fn test_press_idempotence(whitelist: Whitelist) {
        let mut store = ConfigStore::build("07=IN<cmd:>button.sh", whitelist);

        store.set_pressed(7, true);
        store.set_pressed(7, true);
        assert!(store.is_pressed(7));

        store.set_pressed(7, false);
        assert!(!store.is_pressed(7));
    }

    #[rstest]
    fn test_unknown_port_is_never_pressed(whitelist: Whitelist) {
        let mut store = ConfigStore::build("07=IN<cmd:>button.sh", whitelist);

        store.set_pressed(8, true);
        assert!(!store.is_pressed(8));
        assert!(!store.is_pressed(7));
        assert_eq!(store.direction(8), None);
    }

    #[rstest]
    fn test_unusable_port_leaves_hole(whitelist: Whitelist) {
        let mut store = ConfigStore::build(
            "07=IN<cmd:>ls\nabc=IN<cmd:>ls\n08=IN<cmd:>ls\n",
            whitelist,
        );

        assert_eq!(store.config_count(), 3);
        assert_eq!(store.all_ports(), vec![7, 0, 8]);
        assert_eq!(store.summary().invalid_ports, 1);

        // the sentinel never matches
        assert_eq!(store.direction(0), None);
        store.set_pressed(0, true);
        assert!(!store.is_pressed(0));
    }

    #[rstest]
    fn test_all_ports_capped(whitelist: Whitelist) {
        let text: String = (0..40).map(|_| "07=IN<cmd:>ls\n").collect();
        let store = ConfigStore::build(&text, whitelist);

        assert_eq!(store.config_count(), 40);
        assert_eq!(store.all_ports().len(), store.max_ports());
    }

    #[rstest]
    fn test_load_from_file(whitelist: Whitelist) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# mrpi").unwrap();
        writeln!(file, "07=IN<cmd:>button.sh").unwrap();
        writeln!(file, "bad line").unwrap();

        let store = ConfigStore::load(file.path(), whitelist);
        assert!(store.has_config());
        assert_eq!(store.config_count(), 1);
        assert_eq!(store.summary().malformed, 1);
    }

    #[rstest]
    fn test_load_missing_file(whitelist: Whitelist) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("conf"), whitelist);

        assert!(!store.has_config());
        assert_eq!(store.config_count(), 0);
        assert!(store.all_ports().is_empty());
        assert!(store.cmd_allowed("ls"));
    }

    #[rstest]
    fn test_entry_serialization_skips_press_state(whitelist: Whitelist) {
        let mut store = ConfigStore::build("07=IN<cmd:>button.sh", whitelist);
        store.set_pressed(7, true);

        let json = serde_json::to_value(store.entries()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "port": 7, "direction": "IN", "command": "button.sh" }])
        );
    }
}
