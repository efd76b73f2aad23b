//! Engine error types
// (c) 2024 Ross Younger

use thiserror::Error;

/// Errors from the configuration engine which callers may want to act on
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No host with this name
    #[error("host `{0}` not found in the SSH configuration")]
    HostNotFound(String),

    /// No group with this name
    #[error("group `{0}` not found in the SSH configuration")]
    GroupNotFound(String),

    /// A host with this name already exists
    #[error("host `{0}` already exists")]
    HostExists(String),

    /// A group with this name already exists
    #[error("group `{0}` already exists")]
    GroupExists(String),

    /// The default group cannot be renamed or removed
    #[error("the default group cannot be renamed or removed")]
    DefaultGroup,

    /// A rename would turn a normal host into a pattern, or the reverse
    #[error("cannot rename `{from}` to `{to}`: the host type would change")]
    HostTypeChange {
        /// old name
        from: String,
        /// requested name
        to: String,
    },

    /// Strict parsing only: a parameter appeared before any `Host` line
    #[error("parameter `{keyword}` without a Host definition at line {line}")]
    ParamWithoutHost {
        /// 1-based line number
        line: usize,
        /// the offending keyword
        keyword: String,
    },

    /// A filter expression did not compile
    #[error("invalid filter expression: {0}")]
    InvalidFilter(#[from] regex::Error),
}
