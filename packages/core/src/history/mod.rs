//! Connection history module
//!
//! Tracks when and how often each host (or ad-hoc `user@host:port`
//! connection) is used, in a JSON document next to the settings file.

mod error;
pub mod manual;
mod migrate;
mod schema;
mod store;

// Public exports
pub use error::HistoryError;
pub use manual::{
    DecodedIdentifier, MANUAL_PREFIX, ManualConnection, decode, encode, is_manual,
    is_manual_ssh_command, parse_ssh_args, promote,
};
pub use migrate::{MigrationOutcome, migrate_legacy_file};
pub use schema::{ConnectionHistory, ConnectionInfo, ForwardType, PortForwardConfig};
pub use store::{Clock, HistoryStore, SystemClock};
