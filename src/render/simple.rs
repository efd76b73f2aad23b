// (c) 2024 Ross Younger
//! Plain text style

use std::fmt::Write as _;

use anstyle::Style;

use super::applied_params;
use crate::{
    cli::styles::{DIFF_ADDED, DIFF_HUNK, DIFF_REMOVED, GLOBAL, HEADING, INHERITED},
    ssh::{Group, Host, Source},
};

fn heading(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{HEADING}{label:<10}{HEADING:#} {value}");
}

pub(super) fn host(host: &Host) -> String {
    let mut out = String::new();
    heading(&mut out, "name", &host.name);
    if !host.alt_names.is_empty() {
        heading(&mut out, "aliases", &host.alt_names.join(" "));
    }
    heading(&mut out, "group", host.group());
    heading(&mut out, "type", &host.host_type().to_string());
    for line in &host.info {
        heading(&mut out, "info", line);
    }

    let params = applied_params(host);
    if params.is_empty() {
        return out;
    }
    let width = params.iter().map(|p| p.keyword.len()).max().unwrap_or_default();
    let _ = writeln!(out, "{HEADING}parameters{HEADING:#}");
    for p in params {
        let (style, suffix) = match &p.source {
            Source::Local => (Style::new(), String::new()),
            Source::Global => (GLOBAL, "  (global)".to_owned()),
            Source::Pattern(name) => (INHERITED, format!("  ({name})")),
        };
        for value in p.value.iter() {
            let _ = writeln!(
                out,
                "    {keyword:<width$}  {style}{value}{suffix}{style:#}",
                keyword = p.keyword
            );
        }
    }
    out
}

pub(super) fn group(group: &Group) -> String {
    let mut out = String::new();
    heading(&mut out, "group", &group.name);
    if !group.desc.is_empty() {
        heading(&mut out, "desc", &group.desc);
    }
    for line in &group.info {
        heading(&mut out, "info", line);
    }
    let names = |hosts: &[Host]| {
        hosts
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    heading(&mut out, "hosts", &names(group.hosts()));
    heading(&mut out, "patterns", &names(group.patterns()));
    out
}

pub(super) fn diff(text: &str) -> String {
    let mut out = String::new();
    for line in text.split_inclusive('\n') {
        let style = if line.starts_with("+++") || line.starts_with("---") {
            HEADING
        } else if line.starts_with('+') {
            DIFF_ADDED
        } else if line.starts_with('-') {
            DIFF_REMOVED
        } else if line.starts_with("@@") {
            DIFF_HUNK
        } else {
            Style::new()
        };
        let (body, newline) = line
            .strip_suffix('\n')
            .map_or((line, ""), |body| (body, "\n"));
        let _ = write!(out, "{style}{body}{style:#}{newline}");
    }
    out
}
