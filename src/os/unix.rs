// OS abstraction layer for sshc - Unix implementation
// (c) 2024 Ross Younger

use std::{
    fs::Permissions,
    os::unix::fs::PermissionsExt as _,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use super::AbstractPlatform;

/// File name of our own settings, in the user's home directory
const USER_CONFIG_FILENAME: &str = ".sshc.toml";

/// Mode for the managed ssh config file
const PRIVATE_FILE_MODE: u32 = 0o600;

#[derive(Debug, Clone, Copy)]
/// Concretion of [`AbstractPlatform`] for Unix-like platforms
pub struct Platform {}

impl AbstractPlatform for Platform {
    fn user_ssh_config() -> Result<PathBuf> {
        let Some(mut pb) = dirs::home_dir() else {
            anyhow::bail!("could not determine home directory");
        };
        pb.push(".ssh");
        pb.push("config");
        Ok(pb)
    }

    fn user_config_dir() -> Option<PathBuf> {
        let d = dirs::home_dir();
        if d.is_none() {
            warn!("could not determine home directory");
        }
        d
    }

    fn user_config_path() -> Option<PathBuf> {
        let mut d = Self::user_config_dir()?;
        d.push(USER_CONFIG_FILENAME);
        Some(d)
    }

    fn restrict_permissions(path: &Path) -> Result<()> {
        debug!("setting mode {PRIVATE_FILE_MODE:o} on {}", path.display());
        std::fs::set_permissions(path, Permissions::from_mode(PRIVATE_FILE_MODE))
            .with_context(|| format!("could not set permissions on {}", path.display()))
    }
}

#[cfg(test)]
mod test {
    use std::os::unix::fs::PermissionsExt as _;

    use super::{AbstractPlatform as _, Platform};
    use crate::util::make_test_tempfile;

    #[test]
    fn config_paths() {
        let ssh = Platform::user_ssh_config().unwrap();
        assert!(ssh.ends_with(".ssh/config"));
        let ours = Platform::user_config_path().unwrap();
        assert!(ours.ends_with(".sshc.toml"));
    }

    #[test]
    fn permissions() {
        let (path, _tempdir) = make_test_tempfile("", "config");
        Platform::restrict_permissions(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
