//! Host management module
//!
//! Provides functionality for managing hosts in an SSH client config file:
//! - Host record schema
//! - Block parsing with multi-host declarations
//! - Atomic block rewrites (update, regroup, delete, append)

mod error;
mod options;
mod parser;
mod schema;
mod ssh_config;
mod validate;
mod write;

// Public exports
pub use error::ConfigError;
pub use options::{format_ssh_options, parse_ssh_options};
pub use schema::{DEFAULT_SSH_PORT, HostRecord, REQUEST_TTY_VALUES, SshOption};
pub use ssh_config::{
    add_host, delete_host, get_host, get_ssh_config_path, host_exists,
    is_part_of_multi_host_declaration, parse_all, update_host, update_multi_host_block,
};
pub use validate::{validate_host, validate_host_name, validate_host_names};
