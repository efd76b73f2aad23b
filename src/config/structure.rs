//! Configuration structure
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::ArgAction;
use derive_deftly::Deftly;
use serde::{Deserialize, Serialize};
use struct_field_names_as_array::FieldNamesAsSlice;

use crate::{
    os::{AbstractPlatform as _, Platform},
    render::HostStyle,
    ssh::OutputMode,
    util::derive_deftly_template_Optionalify,
};

/// Used if the home directory cannot be determined
const FALLBACK_SSH_CONFIG: &str = "~/.ssh/config";

/// The set of configurable options supported by sshc.
///
/// **Note:** The implementation of `default()` for this struct returns sshc's hard-wired configuration defaults.
///
/// The [Optionalify](derive_deftly_template_Optionalify) template derives `Configuration_Optional`,
/// the same struct with every member wrapped in `Option`. The command line fills in that version, so only the
/// options the user actually typed override what came from the environment, the settings file and the defaults.
///
// Maintainer note: None of the members of this struct should be Option<anything>. That leads to sunspots in the CLI and strange warts (Some(Some(foo))).
#[derive(Deftly)]
#[derive_deftly(Optionalify)]
#[deftly(visibility = "pub(crate)")]
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Deserialize, Serialize, FieldNamesAsSlice)]
pub struct Configuration {
    /// The ssh client config file to manage [default: ~/.ssh/config]
    ///
    /// A leading `~` is expanded.
    #[arg(long, value_name("FILE"), help_heading("Configuration"))]
    pub sshconfig: String,

    /// Prints the regenerated file to stdout instead of writing it back
    #[arg(
        long,
        action(ArgAction::Set),
        num_args(0..=1),
        default_missing_value("true"),
        require_equals(true),
        value_name("BOOL"),
        help_heading("Output")
    )]
    pub stdout: bool,

    /// Prints a unified diff of the pending change instead of writing the file.
    /// Takes precedence over `--stdout`.
    #[arg(
        long,
        action(ArgAction::Set),
        num_args(0..=1),
        default_missing_value("true"),
        require_equals(true),
        value_name("BOOL"),
        help_heading("Output")
    )]
    pub diff: bool,

    /// Default style for `host show` [default: simple]
    ///
    /// A `host-style` option saved in the ssh config file takes precedence.
    #[arg(long, value_enum, value_name("STYLE"), help_heading("Output"))]
    pub host_style: HostStyle,
}

impl Configuration {
    /// The ssh config path with any leading `~` expanded
    pub fn sshconfig_path(&self) -> anyhow::Result<PathBuf> {
        Ok(expanduser::expanduser(&self.sshconfig)?)
    }

    /// Where regenerated text goes
    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        if self.diff {
            OutputMode::Diff
        } else if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::Overwrite
        }
    }
}

impl Default for Configuration {
    /// **(Unusual!)**
    /// Returns sshc's hard-wired configuration defaults.
    fn default() -> Self {
        let sshconfig = Platform::user_ssh_config().map_or_else(
            |_| FALLBACK_SSH_CONFIG.to_owned(),
            |p| p.to_string_lossy().into_owned(),
        );
        Self {
            sshconfig,
            stdout: false,
            diff: false,
            host_style: HostStyle::Simple,
        }
    }
}
