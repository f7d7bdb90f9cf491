//! octolink CLI library.
//!
//! Commands, configuration, device flow polling and exit code handling
//! shared by the `octolink` binary.

pub mod commands;
pub mod config;
pub mod device;
pub mod env;
pub mod exit_codes;
