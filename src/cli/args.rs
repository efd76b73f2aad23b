// sshc top-level command-line arguments
// (c) 2024 Ross Younger

use clap::{Args, Parser, Subcommand};

use crate::{config::Configuration_Optional, render::HostStyle, ssh::DEFAULT_GROUP_NAME};

/// Parses `KEYWORD=VALUE`
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("`{arg}` is not in KEYWORD=VALUE form"))
}

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "Manages an OpenSSH client config file as groups of hosts and patterns.\n\n\
        Files written by sshc remain ordinary ssh config files; the extra structure lives in `#@` comments.\n\
        Back up hand-written files before letting sshc rewrite them.",
    infer_long_args(true),
    arg_required_else_help(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    /// Enables detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sshc=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, conflicts_with("quiet"), help_heading("Debug"))]
    pub(crate) debug: bool,

    /// Reports only errors
    #[arg(short, long, action, help_heading("Debug"))]
    pub(crate) quiet: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, help_heading("Debug"), value_name("FILE"))]
    pub(crate) log_file: Option<String>,

    /// Outputs the settings in effect, and where each came from, then exits
    #[arg(long, action, help_heading("Configuration"))]
    pub(crate) show_config: bool,

    /// Outputs the settings files for the current user and platform, then exits
    #[arg(long, action, help_heading("Configuration"))]
    pub(crate) config_files: bool,

    #[command(flatten)]
    pub(crate) config: Configuration_Optional,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum Command {
    /// Manages hosts
    #[command(subcommand)]
    Host(HostCmd),
    /// Manages groups
    #[command(subcommand)]
    Group(GroupCmd),
    /// Manages options saved in the ssh config file
    #[command(subcommand)]
    Config(ConfigCmd),
    /// Lists hosts (same as `host list`)
    Hosts(HostListArgs),
    /// Lists groups (same as `group list`)
    Groups,
}

#[derive(Debug, Args, Clone, Default)]
pub(crate) struct HostListArgs {
    /// Only hosts in groups whose name matches this regex
    #[arg(short, long, value_name("REGEX"))]
    pub(crate) group: Option<String>,
    /// Only hosts whose name matches this regex
    #[arg(short, long, value_name("REGEX"))]
    pub(crate) name: Option<String>,
    /// Shows every applied parameter, not only `hostname` and `user`
    #[arg(short, long, action)]
    pub(crate) verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum HostCmd {
    /// Lists hosts, with inherited values and where they came from
    List(HostListArgs),
    /// Shows one host in detail
    Show {
        /// Host name
        name: String,
        /// Rendering style [default: the `host-style` config option, else --host-style]
        #[arg(long, value_enum)]
        style: Option<HostStyle>,
    },
    /// Creates a host or pattern
    Create {
        /// Host name; a name containing `*` or `?` creates a pattern
        name: String,
        /// Group to create it in
        #[arg(short, long, default_value(DEFAULT_GROUP_NAME))]
        group: String,
        /// Alternate name, may be repeated
        #[arg(short, long("alias"), value_name("NAME"))]
        alt_names: Vec<String>,
        /// Info line, may be repeated
        #[arg(short, long)]
        info: Vec<String>,
        /// Parameter, may be repeated
        #[arg(short, long("parameter"), value_name("KEYWORD=VALUE"), value_parser(parse_key_value))]
        parameters: Vec<(String, String)>,
        /// Creates the group if it does not exist
        #[arg(short, long, action)]
        force: bool,
    },
    /// Deletes hosts
    ///
    /// A name of the form `r:<regex>` selects every host whose name matches.
    Delete {
        /// Host names
        #[arg(required(true))]
        names: Vec<String>,
        /// Does not ask for confirmation
        #[arg(long, action)]
        yes: bool,
    },
    /// Renames a host
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },
    /// Changes hosts
    ///
    /// A name of the form `r:<regex>` selects every host whose name matches.
    /// e.g. `sshc host set -g lab r:^test_` moves every host whose name starts with `test_` to the `lab` group.
    Set {
        /// Host names
        #[arg(required(true))]
        names: Vec<String>,
        /// Appends an info line; may be repeated. An empty first line clears the info.
        #[arg(short, long)]
        info: Vec<String>,
        /// Sets a parameter. An empty value removes it, e.g. `-p user ''`.
        #[arg(short, long("parameter"), num_args(2), value_names(["KEYWORD", "VALUE"]))]
        parameters: Vec<String>,
        /// Moves the hosts to this group
        #[arg(short, long)]
        group: Option<String>,
        /// Creates the target group if it does not exist
        #[arg(short, long, action)]
        force: bool,
        /// Does not ask for confirmation
        #[arg(long, action)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum GroupCmd {
    /// Lists groups
    List,
    /// Shows one group in detail
    Show {
        /// Group name
        name: String,
    },
    /// Creates an empty group
    Create {
        /// Group name
        name: String,
        /// Short description
        #[arg(short, long)]
        desc: Option<String>,
        /// Info line, may be repeated
        #[arg(short, long)]
        info: Vec<String>,
    },
    /// Deletes groups, along with their hosts
    ///
    /// A name of the form `r:<regex>` selects every group whose name matches.
    Delete {
        /// Group names
        #[arg(required(true))]
        names: Vec<String>,
        /// Does not ask for confirmation
        #[arg(long, action)]
        yes: bool,
    },
    /// Renames a group
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },
    /// Changes a group's description or info
    Set {
        /// Group name
        name: String,
        /// Short description
        #[arg(short, long)]
        desc: Option<String>,
        /// Appends an info line; may be repeated. An empty first line clears the info.
        #[arg(short, long)]
        info: Vec<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum ConfigCmd {
    /// Shows the options saved in the ssh config file
    Show,
    /// Saves an option in the ssh config file
    Set {
        /// Default style for `host show`
        #[arg(long, value_enum)]
        host_style: Option<HostStyle>,
    },
    /// Removes an option from the ssh config file
    Del {
        /// Removes the saved host style
        #[arg(long, action)]
        host_style: bool,
    },
}
