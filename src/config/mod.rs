// (c) 2024 Ross Younger
//! # Tool settings
//!
//! These are the settings of `sshc` itself, not the ssh config file it manages
//! (that is [`crate::ssh`]). They are obtained from the following sources, in order:
//! 1. Command-line options
//! 1. Environment variables prefixed `SSHC_`, e.g. `SSHC_HOST_STYLE=table`
//! 1. The user's settings file (`~/.sshc.toml` on Unix)
//! 1. Hard-wired defaults
//!
//! Each option may appear in multiple places; the first match is used.
//!
//! ## File format
//!
//! The settings file is TOML. Keys are the field names of [Configuration]:
//!
//! ```text
//! sshconfig = "~/work/ssh_config"
//! host_style = "table"
//! diff = true
//! ```
//!
//! `sshc --show-config` outputs the current value of every setting and where it came from.
//!
//! Per-file preferences (such as the default host style) can also be saved in the ssh config
//! file itself with `sshc config set`; those take precedence over the settings here.

mod structure;
pub use structure::Configuration;
pub(crate) use structure::Configuration_Optional;

mod manager;
pub use manager::{DisplayAdapter, Manager};
