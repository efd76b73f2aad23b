//! OS abstraction layer
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use anyhow::Result;

/// General platform abstraction trait.
/// The active implementation is pulled into this module as `Platform`.
///
/// Usage:
/// ```
///    use sshc::os::Platform;
///    use sshc::os::AbstractPlatform as _;
///    println!("{:?}", Platform::user_ssh_config());
/// ```
pub trait AbstractPlatform {
    /// Path to the user ssh config file, the one we manage by default.
    /// On most platforms this will be `${HOME}/.ssh/config`
    /// # Note
    /// This is a _theoretical_ path construction; it does not guarantee that the path actually exists.
    /// # Errors
    /// If the current user's home directory could not be determined
    fn user_ssh_config() -> Result<PathBuf>;

    /// The directory to store user configuration files in.
    ///
    /// On Unix platforms this is the traditional home directory.
    fn user_config_dir() -> Option<PathBuf>;

    /// The absolute path to the user configuration file for this tool, if one is defined on this platform.
    fn user_config_path() -> Option<PathBuf>;

    /// Makes a file readable and writable by its owner only.
    ///
    /// ssh refuses to use a config file that others can write to.
    fn restrict_permissions(path: &Path) -> Result<()>;
}

#[cfg(any(unix, doc))]
mod unix;

#[cfg(any(unix, doc))]
pub use unix::*;

static_assertions::assert_cfg!(unix, "This OS is not yet supported");
