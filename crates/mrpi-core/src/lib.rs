//! Configuration model and lookup engine for the mrpi button daemon.
//!
//! The daemon maps GPIO header pins to shell commands. This crate loads the
//! pin mapping, checks every command against a root-owned whitelist, and
//! answers the poll loop's per-tick questions: which pins exist, in which
//! direction, with which command, and whether the command already fired for
//! the current press.
//!
//! ```
//! use mrpi_core::{ConfigStore, Whitelist};
//!
//! let whitelist = Whitelist::parse("shutdown.sh\n");
//! let store = ConfigStore::build(
//!     "# power button\n05=IN<cmd:>shutdown.sh -h now\n07=IN<cmd:>rm -rf /\n",
//!     whitelist,
//! );
//!
//! assert_eq!(store.all_ports(), vec![5]);
//! ```

pub mod constants;
pub mod error;
pub mod lines;
pub mod parser;
pub mod store;
pub mod types;
pub mod whitelist;

pub use error::{Error, Result};
pub use parser::{ConfigParser, ParseOutcome, ParsedLine};
pub use store::{ConfigStore, LoadSummary, PortEntry};
pub use types::*;
pub use whitelist::Whitelist;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
