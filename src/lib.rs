//! sshc: manages an OpenSSH client config file as a structured document
// (c) 2024 Ross Younger
//!
//! The file is read into groups of hosts and wildcard patterns, each host learns which
//! parameter values it inherits and from where, and the whole document can be changed
//! and written back out deterministically.
//!
//! Most of the interesting work is in [`ssh`]. The `sshc` binary is a thin command line
//! over it, see `sshc --help`.

mod cli;
pub use cli::cli;
pub mod config;
/// OS abstraction layer
pub mod os;
pub mod render;
pub mod ssh;
/// Utilities
pub mod util;

#[doc(hidden)]
pub use derive_deftly;
