// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use super::{
    args::{CliArgs, Command},
    commands::{self, Outcome},
    ui::{self, Terminal, Ui as _},
};

use crate::{
    config::{Configuration, Manager},
    render,
    ssh::{ConfigFile, OutputMode, ParserOptions},
    util::setup_tracing,
};
use anyhow::Context as _;
use clap::{CommandFactory as _, Parser as _};
use tracing::{debug, error_span};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let trace_level = if args.debug {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    setup_tracing(trace_level, args.log_file.as_deref()).inspect_err(|e| eprintln!("{e:?}"))?;

    if args.config_files {
        println!("{:?}", Manager::config_files());
        return Ok(ExitCode::SUCCESS);
    }

    let mut manager = Manager::new();
    manager.merge_provider(args.config.clone());
    if args.show_config {
        println!("{}", manager.to_display_adapter::<Configuration>(true));
        return Ok(ExitCode::SUCCESS);
    }
    let settings: Configuration = manager.get().context("invalid settings")?;

    let Some(command) = &args.command else {
        CliArgs::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };
    let mut ui = Terminal { quiet: args.quiet };
    run(command, &settings, &mut ui)
        .inspect_err(|e| tracing::error!("{e:#}"))
        .or_else(|_| Ok(false))
        .map(|success| {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        })
}

fn run(command: &Command, settings: &Configuration, ui: &mut Terminal) -> anyhow::Result<bool> {
    let path = settings.sshconfig_path()?;
    let _span = error_span!("sshconfig", path = %path.display()).entered();
    let mut file = ConfigFile::open(&path, ParserOptions::default(), ui::confirm_create)?;

    if commands::run(command, &mut file.config, settings, ui)? == Outcome::Unchanged {
        debug!("nothing to write");
        return Ok(true);
    }
    match settings.output_mode() {
        OutputMode::Diff => {
            let diff = file.diff();
            if diff.is_empty() {
                ui.status("No changes");
            } else {
                anstream::print!("{}", render::diff(&diff));
            }
        }
        mode => file.commit(mode, &mut anstream::stdout())?,
    }
    Ok(true)
}
