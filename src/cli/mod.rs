//! Command Line Interface for sshc
// (c) 2024 Ross Younger
mod args;
mod cli_main;
mod commands;
pub(crate) mod styles;
mod ui;
pub use cli_main::cli;
