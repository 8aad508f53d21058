//! Config file parser.
//!
//! Turns the text of the pin mapping file into [`ParsedLine`] values. Each
//! line has the form
//!
//! ```text
//! PORT=DIRECTION<cmd:>COMMAND
//! ```
//!
//! where `PORT` is a physical header pin, `DIRECTION` is `IN` or `OUT`, and
//! `COMMAND` is a shell command line (possibly empty). Whitelist admission
//! is not decided here; see [`ConfigStore`](crate::store::ConfigStore).
//!
//! # Partial Failure
//!
//! A bad line is logged with its exact content and skipped. A line that is
//! not valid UTF-8 counts as malformed; it is never decoded lossily, since
//! its command would then reach the whitelist altered. Parsing always
//! continues with the next line, so a single typo never disables the other
//! buttons.
//!
//! # Examples
//!
//! ```
//! use mrpi_core::{ConfigParser, Direction};
//!
//! let line = ConfigParser::parse_line("07=IN<cmd:>button.sh").unwrap();
//! assert_eq!(line.port.as_u8(), 7);
//! assert_eq!(line.direction, Direction::In);
//! assert_eq!(line.command, "button.sh");
//!
//! // Missing delimiter
//! assert!(ConfigParser::parse_line("07=IN,button.sh").is_err());
//! ```

use crate::constants::{COMMAND_DELIMITER, CONFIG_LINE_TERMINATORS, PORT_SEPARATOR};
use crate::error::{Error, Result};
use crate::lines::logical_lines;
use crate::types::{Direction, Port};
use tracing::{debug, warn};

/// One syntactically valid config line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Resolved port, [`Port::UNUSABLE`] if the token was not a GPIO pin.
    pub port: Port,
    pub direction: Direction,
    /// Command text between the first and second delimiter, verbatim.
    pub command: String,
}

/// Result of parsing a whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Valid lines in file order.
    pub lines: Vec<ParsedLine>,
    /// Lines rejected as malformed or with a bad direction.
    pub malformed: usize,
    /// Valid lines whose port token resolved to the sentinel.
    pub invalid_ports: usize,
}

/// Parser for the pin mapping file.
pub struct ConfigParser;

impl ConfigParser {
    /// Parse one config line.
    ///
    /// The line is split on the first `=`; both halves must be non-empty.
    /// The right half is split on every `<cmd:>`: the first segment is the
    /// direction and the second is the command. Any further segments are
    /// ignored, so `echo a<cmd:>b` binds `echo a`. The port token is
    /// resolved leniently (see [`Port::from_token`]), so an unusable port
    /// does not fail the line.
    ///
    /// # Errors
    ///
    /// - `Error::MalformedLine` if `=` or `<cmd:>` is missing, or a side of
    ///   the `=` is empty
    /// - `Error::InvalidDirection` if the direction is not `IN` or `OUT`
    pub fn parse_line(raw: &str) -> Result<ParsedLine> {
        let Some((port_token, rest)) = raw.split_once(PORT_SEPARATOR) else {
            return Err(Error::malformed(raw, "splitting by the = sign"));
        };
        if port_token.is_empty() || rest.is_empty() {
            return Err(Error::malformed(raw, "splitting by the = sign"));
        }

        let mut segments = rest.split(COMMAND_DELIMITER);
        let direction = segments.next().unwrap_or_default();
        let Some(command) = segments.next() else {
            return Err(Error::malformed(raw, "splitting by the <cmd:> tag"));
        };

        let direction = direction
            .parse::<Direction>()
            .map_err(|_| Error::invalid_direction(raw, direction))?;

        Ok(ParsedLine {
            port: Port::from_token(port_token),
            direction,
            command: command.to_owned(),
        })
    }

    /// Parse a whole config file, logging and skipping bad lines.
    pub fn parse(text: &str) -> ParseOutcome {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse raw config file bytes, logging and skipping bad lines.
    pub fn parse_bytes(bytes: &[u8]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for line in logical_lines(bytes, &CONFIG_LINE_TERMINATORS) {
            let raw = match line {
                Ok(raw) => raw,
                Err(bad) => {
                    let error = Error::malformed(String::from_utf8_lossy(bad), "decoding as UTF-8");
                    warn!(error = %error, "Skipping configuration line");
                    outcome.malformed += 1;
                    continue;
                }
            };
            if raw.trim().is_empty() {
                if !raw.is_empty() {
                    debug!(line = raw, "Skipping blank configuration line");
                }
                continue;
            }

            match Self::parse_line(raw) {
                Ok(line) => {
                    if !line.port.is_usable() {
                        let token = raw.split_once(PORT_SEPARATOR).map_or(raw, |(t, _)| t);
                        warn!(line = raw, error = %Error::invalid_port(token), "Port will never be polled");
                        outcome.invalid_ports += 1;
                    }
                    outcome.lines.push(line);
                }
                Err(e) => {
                    warn!(error = %e, "Skipping configuration line");
                    outcome.malformed += 1;
                }
            }
        }

        outcome
    }
}
