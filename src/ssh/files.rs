//! Loading and saving the managed ssh config file
// (c) 2024 Ross Younger

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use similar::TextDiff;
use tracing::{debug, info};

use super::{
    model::SshConfig,
    parser::{Parser, ParserOptions},
    writer::{generate, SIGNATURE_LINE},
};
use crate::os::{AbstractPlatform as _, Platform};

/// Where [`ConfigFile::commit`] sends the regenerated text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Replace the file on disk
    #[default]
    Overwrite,
    /// Write the new text to the given writer, leave the file alone
    Stdout,
    /// Write a unified diff against the loaded text, leave the file alone
    Diff,
}

/// An ssh config file together with its parsed document
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    /// Raw lines as loaded, each with its newline
    original: Vec<String>,
    /// The document. Mutate this, then [`commit`](ConfigFile::commit).
    pub config: SshConfig,
}

/// Splits text into lines, keeping each line's newline
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(ToOwned::to_owned).collect()
}

impl ConfigFile {
    /// Reads and parses the file at `path`.
    ///
    /// If the file does not exist, `confirm_create` is asked whether to create it.
    /// On yes an empty, signed file readable only by its owner is created; on no this is an error.
    pub fn open<F>(path: &Path, options: ParserOptions, confirm_create: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> bool,
    {
        let original = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            split_lines(&text)
        } else {
            if !confirm_create(path) {
                anyhow::bail!("SSH config file {} does not exist", path.display());
            }
            Self::create(path)?;
            vec![SIGNATURE_LINE.to_owned()]
        };
        debug!("read {} lines from {}", original.len(), path.display());
        let config = Parser::new(options)
            .parse(original.as_slice())
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self {
            path: path.to_owned(),
            original,
            config,
        })
    }

    fn create(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        std::fs::write(path, SIGNATURE_LINE)
            .with_context(|| format!("creating {}", path.display()))?;
        Platform::restrict_permissions(path)?;
        info!("created {}", path.display());
        Ok(())
    }

    /// The file this was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lines as loaded
    #[must_use]
    pub fn original(&self) -> &[String] {
        &self.original
    }

    /// Regenerates the file text from the current document
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        generate(&self.config)
    }

    /// Unified diff from the loaded text to the regenerated text.
    /// Empty if nothing would change.
    #[must_use]
    pub fn diff(&self) -> String {
        let old = self.original.concat();
        let new = self.render().concat();
        TextDiff::from_lines(&old, &new)
            .unified_diff()
            .header("original", "modified")
            .to_string()
    }

    /// Emits the regenerated text according to `mode`.
    ///
    /// Only [`OutputMode::Overwrite`] touches the file; the other modes write to `out`.
    pub fn commit<W: Write>(&mut self, mode: OutputMode, out: &mut W) -> Result<()> {
        match mode {
            OutputMode::Overwrite => {
                let lines = self.render();
                std::fs::write(&self.path, lines.concat())
                    .with_context(|| format!("writing {}", self.path.display()))?;
                info!("updated {}", self.path.display());
                self.original = lines;
            }
            OutputMode::Stdout => out.write_all(self.render().concat().as_bytes())?,
            OutputMode::Diff => out.write_all(self.diff().as_bytes())?,
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::os::unix::fs::PermissionsExt as _;

    use assertables::{assert_contains, assert_starts_with};

    use super::{ConfigFile, OutputMode};
    use crate::{
        ssh::{model::Host, parser::ParserOptions, writer::SIGNATURE_LINE},
        util::make_test_tempfile,
    };

    const CONTENT: &str = "Host a\n    user me\n";

    fn open(path: &std::path::Path) -> ConfigFile {
        ConfigFile::open(path, ParserOptions::default(), |_| panic!("unexpected prompt")).unwrap()
    }

    #[test]
    fn load_existing() {
        let (path, _tempdir) = make_test_tempfile(CONTENT, "config");
        let file = open(&path);
        assert_eq!(file.original(), &["Host a\n", "    user me\n"]);
        assert!(file.config.check_host_by_name("a"));
        assert_eq!(file.path(), path);
    }

    #[test]
    fn missing_file_declined() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nope");
        let err = ConfigFile::open(&path, ParserOptions::default(), |_| false).unwrap_err();
        assert_contains!(err.to_string(), "does not exist");
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_created() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(".ssh").join("config");
        let mut asked = false;
        let file = ConfigFile::open(&path, ParserOptions::default(), |_| {
            asked = true;
            true
        })
        .unwrap();
        assert!(asked);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SIGNATURE_LINE);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(file.config.groups().len(), 1);
    }

    #[test]
    fn stdout_and_diff_leave_file_alone() {
        let (path, _tempdir) = make_test_tempfile(CONTENT, "config");
        let mut file = open(&path);
        assert!(file.config.add_host(Host::new("b", "default")));

        let mut out = Vec::new();
        file.commit(OutputMode::Stdout, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_starts_with!(text, SIGNATURE_LINE);
        assert_contains!(text, "Host b\n");

        let mut out = Vec::new();
        file.commit(OutputMode::Diff, &mut out).unwrap();
        let diff = String::from_utf8(out).unwrap();
        assert_contains!(diff, "--- original");
        assert_contains!(diff, "+++ modified");
        assert_contains!(diff, "+Host b");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn overwrite() {
        let (path, _tempdir) = make_test_tempfile(CONTENT, "config");
        let mut file = open(&path);
        file.config.host_mut("a").unwrap().params.push("Port", "2222");
        file.commit(OutputMode::Overwrite, &mut std::io::sink()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            format!("{SIGNATURE_LINE}\nHost a\n    port 2222\n    user me\n\n")
        );
        // nothing left to change
        assert!(file.diff().is_empty());
        let reread = open(&path);
        assert_eq!(reread.config, file.config);
    }
}
