// Command handlers
// (c) 2024 Ross Younger

use std::str::FromStr as _;

use anyhow::{bail, Context as _, Result};
use tracing::{debug, warn};

use super::{
    args::{Command, ConfigCmd, GroupCmd, HostCmd, HostListArgs},
    ui::Ui,
};
use crate::{
    config::Configuration,
    render::{self, HostStyle, HOST_STYLE_OPTION},
    ssh::{params, ConfigError, Group, Host, Params, SshConfig},
};

/// Whether a command changed the document (and so the file needs writing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Unchanged,
    Modified,
}

/// Runs one command against the document.
///
/// Inheritance is re-resolved after any change.
pub(crate) fn run<U: Ui>(
    command: &Command,
    config: &mut SshConfig,
    settings: &Configuration,
    ui: &mut U,
) -> Result<Outcome> {
    let outcome = match command {
        Command::Host(cmd) => host(cmd, config, settings, ui)?,
        Command::Group(cmd) => group(cmd, config, ui)?,
        Command::Config(cmd) => options(cmd, config, ui)?,
        Command::Hosts(args) => host_list(args, config, ui)?,
        Command::Groups => {
            ui.print(&render::group_list(config.groups()))?;
            Outcome::Unchanged
        }
    };
    if outcome == Outcome::Modified {
        config.resolve();
    }
    Ok(outcome)
}

/// Warns about keywords ssh will not understand. Values are never rejected.
fn check_param(keyword: &str, value: &str) {
    if !params::is_known(keyword) {
        warn!("`{keyword}` is not a known ssh option");
        return;
    }
    if let Some(allowed) = params::allowed_values(keyword) {
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
            let name = params::canonical_name(keyword).unwrap_or(keyword);
            warn!("{name} expects one of {}, not `{value}`", allowed.join(", "));
        }
    }
}

/// Asks before acting on more than one item
fn confirm_many<U: Ui>(ui: &mut U, what: &str, names: &[String], yes: bool) -> Result<()> {
    if yes || names.len() <= 1 {
        return Ok(());
    }
    let mut listing = format!("These {what} are selected:\n");
    for name in names {
        listing.push_str(&format!(" - {name}\n"));
    }
    ui.print(&listing)?;
    if !ui.confirm("Are you sure?")? {
        bail!("cancelled");
    }
    Ok(())
}

/// Finds a group, creating it if allowed
fn ensure_group(config: &mut SshConfig, name: &str, force: bool) -> Result<()> {
    if config.check_group_by_name(name) {
        return Ok(());
    }
    if !force {
        return Err(ConfigError::GroupNotFound(name.to_owned()))
            .context("create the group first, or use --force");
    }
    debug!("creating group {name}");
    let _ = config.add_group(Group::new(name));
    Ok(())
}

/// Applies `-i` lines: an empty first line clears, anything else appends
fn update_info(info: &mut Vec<String>, lines: &[String]) {
    match lines.first() {
        None => (),
        Some(first) if first.trim().is_empty() => info.clear(),
        Some(_) => info.extend(lines.iter().filter(|l| !l.trim().is_empty()).cloned()),
    }
}

// HOSTS ///////////////////////////////////////////////////////////////////////////////////////

fn host<U: Ui>(
    cmd: &HostCmd,
    config: &mut SshConfig,
    settings: &Configuration,
    ui: &mut U,
) -> Result<Outcome> {
    match cmd {
        HostCmd::List(args) => host_list(args, config, ui),
        HostCmd::Show { name, style } => {
            let host = config.get_host_by_name(name)?;
            let style = style.unwrap_or_else(|| saved_style(config, settings));
            ui.print(&render::host(host, style)?)?;
            Ok(Outcome::Unchanged)
        }
        HostCmd::Create {
            name,
            group,
            alt_names,
            info,
            parameters,
            force,
        } => {
            if config.check_host_by_name(name) {
                return Err(ConfigError::HostExists(name.clone()).into());
            }
            ensure_group(config, group, *force)?;
            let mut params = Params::default();
            for (keyword, value) in parameters {
                check_param(keyword, value);
                params.push(keyword, value);
            }
            let host = Host::new(name, group)
                .with_alt_names(alt_names.iter().cloned())
                .with_info(info.iter().cloned())
                .with_params(params);
            if !config.add_host(host) {
                return Err(ConfigError::GroupNotFound(group.clone()).into());
            }
            ui.status(&format!("Created host: {name}"));
            Ok(Outcome::Modified)
        }
        HostCmd::Delete { names, yes } => {
            let names = config.expand_host_names(names)?;
            confirm_many(ui, "hosts", &names, *yes)?;
            let mut outcome = Outcome::Unchanged;
            for name in &names {
                match config.remove_host(name) {
                    Ok(_) => {
                        ui.status(&format!("Deleted host: {name}"));
                        outcome = Outcome::Modified;
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            Ok(outcome)
        }
        HostCmd::Rename { name, new_name } => {
            config.rename_host(name, new_name)?;
            ui.status(&format!("Renamed host: {name} -> {new_name}"));
            Ok(Outcome::Modified)
        }
        HostCmd::Set {
            names,
            info,
            parameters,
            group,
            force,
            yes,
        } => {
            if group.is_none() && parameters.is_empty() && info.is_empty() {
                bail!("nothing to set; see `sshc host set --help`");
            }
            let names = config.expand_host_names(names)?;
            confirm_many(ui, "hosts", &names, *yes)?;
            for name in &names {
                let current_group = config.get_host_by_name(name)?.group().to_owned();
                if let Some(target) = group {
                    ensure_group(config, target, *force)?;
                    config.move_host_to_group(name, &current_group, target)?;
                }
                let host = config.host_mut(name)?;
                update_info(&mut host.info, info);
                for pair in parameters.chunks(2) {
                    let [keyword, value] = pair else {
                        bail!("parameters come in KEYWORD VALUE pairs");
                    };
                    if value.is_empty() {
                        if host.params.unset(keyword).is_none() {
                            warn!("{name} has no {keyword} to remove");
                        }
                        continue;
                    }
                    check_param(keyword, value);
                    if !host.params.set(keyword, value) {
                        warn!("{name} already has {keyword} {value}");
                    }
                }
                ui.status(&format!("Modified host: {name}"));
            }
            Ok(Outcome::Modified)
        }
    }
}

fn host_list<U: Ui>(args: &HostListArgs, config: &SshConfig, ui: &mut U) -> Result<Outcome> {
    let hosts = config.filter_hosts(
        args.group.as_deref().unwrap_or_default(),
        args.name.as_deref().unwrap_or_default(),
    )?;
    if hosts.is_empty() {
        bail!("no host matches the given filters");
    }
    ui.print(&render::host_list(&hosts, args.verbose))?;
    Ok(Outcome::Unchanged)
}

/// The style saved in the file, else the configured one
fn saved_style(config: &SshConfig, settings: &Configuration) -> HostStyle {
    let Some(saved) = config.opts.get(HOST_STYLE_OPTION) else {
        return settings.host_style;
    };
    HostStyle::from_str(saved).unwrap_or_else(|_| {
        warn!("ignoring unknown {HOST_STYLE_OPTION} `{saved}` saved in the ssh config file");
        settings.host_style
    })
}

// GROUPS //////////////////////////////////////////////////////////////////////////////////////

fn group<U: Ui>(cmd: &GroupCmd, config: &mut SshConfig, ui: &mut U) -> Result<Outcome> {
    match cmd {
        GroupCmd::List => {
            ui.print(&render::group_list(config.groups()))?;
            Ok(Outcome::Unchanged)
        }
        GroupCmd::Show { name } => {
            ui.print(&render::group(config.get_group_by_name(name)?))?;
            Ok(Outcome::Unchanged)
        }
        GroupCmd::Create { name, desc, info } => {
            let mut group = Group::new(name).with_info(info.iter().cloned());
            if let Some(desc) = desc {
                group = group.with_desc(desc.trim());
            }
            if !config.add_group(group) {
                return Err(ConfigError::GroupExists(name.clone()).into());
            }
            ui.status(&format!("Created group: {name}"));
            Ok(Outcome::Modified)
        }
        GroupCmd::Delete { names, yes } => {
            let names = config.expand_group_names(names)?;
            if !*yes {
                ui.print(&format!(
                    "These groups and everything in them will be deleted: {}\n",
                    names.join(", ")
                ))?;
                if !ui.confirm("Are you sure?")? {
                    bail!("cancelled");
                }
            }
            let mut outcome = Outcome::Unchanged;
            for name in &names {
                match config.remove_group(name) {
                    Ok(_) => {
                        ui.status(&format!("Deleted group: {name}"));
                        outcome = Outcome::Modified;
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            Ok(outcome)
        }
        GroupCmd::Rename { name, new_name } => {
            config.rename_group(name, new_name)?;
            ui.status(&format!("Renamed group: {name} -> {new_name}"));
            Ok(Outcome::Modified)
        }
        GroupCmd::Set { name, desc, info } => {
            if desc.is_none() && info.is_empty() {
                bail!("nothing to set; see `sshc group set --help`");
            }
            let group = config.group_mut(name)?;
            if let Some(desc) = desc {
                desc.trim().clone_into(&mut group.desc);
            }
            update_info(&mut group.info, info);
            ui.status(&format!("Modified group: {name}"));
            Ok(Outcome::Modified)
        }
    }
}

// SAVED OPTIONS ///////////////////////////////////////////////////////////////////////////////

fn options<U: Ui>(cmd: &ConfigCmd, config: &mut SshConfig, ui: &mut U) -> Result<Outcome> {
    match cmd {
        ConfigCmd::Show => {
            ui.print(&render::options(&config.opts))?;
            Ok(Outcome::Unchanged)
        }
        ConfigCmd::Set { host_style } => {
            let Some(style) = host_style else {
                bail!("no option given; see `sshc config set --help`");
            };
            let _ = config
                .opts
                .insert(HOST_STYLE_OPTION.to_owned(), style.to_string());
            Ok(Outcome::Modified)
        }
        ConfigCmd::Del { host_style } => {
            if !host_style {
                bail!("no option given; see `sshc config del --help`");
            }
            if config.opts.remove(HOST_STYLE_OPTION).is_none() {
                warn!("{HOST_STYLE_OPTION} is not set");
                return Ok(Outcome::Unchanged);
            }
            Ok(Outcome::Modified)
        }
    }
}
