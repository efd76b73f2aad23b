// Terminal interaction for the command handlers
// (c) 2024 Ross Younger

use std::{io::Write as _, path::Path};

use dialoguer::Confirm;

/// Everything a command handler needs from the user's terminal
pub(crate) trait Ui {
    /// Writes command output (listings, views) to stdout
    fn print(&mut self, text: &str) -> anyhow::Result<()>;
    /// Reports what was done, e.g. `Deleted host: foo`. Goes to stderr so it never mixes with `--stdout` output.
    fn status(&mut self, message: &str);
    /// Asks a yes/no question
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

/// The real terminal
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Terminal {
    pub(crate) quiet: bool,
}

impl Ui for Terminal {
    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        let mut out = anstream::stdout().lock();
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn status(&mut self, message: &str) {
        if !self.quiet {
            anstream::eprintln!("{message}");
        }
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }
}

/// Asks whether a missing ssh config file should be created.
///
/// Without a terminal to ask on, the answer is no.
pub(crate) fn confirm_create(path: &Path) -> bool {
    Confirm::new()
        .with_prompt(format!("{} does not exist. Create it?", path.display()))
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Records output and answers every question the same way
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) answer: bool,
    pub(crate) output: String,
    pub(crate) statuses: Vec<String>,
    pub(crate) prompts: Vec<String>,
}

#[cfg(test)]
impl Ui for Recorder {
    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn status(&mut self, message: &str) {
        self.statuses.push(message.to_owned());
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        self.prompts.push(prompt.to_owned());
        Ok(self.answer)
    }
}
