// (c) 2024 Ross Younger
//! Tabular style, and the list views

use std::collections::BTreeMap;

use tabled::{builder::Builder, settings::Style, Table, Tabled};

use super::applied_params;
use crate::ssh::{Group, Host, Source};

/// Parameters shown in every host list
const LIST_PARAMS: &[&str] = &["hostname", "user"];

#[derive(Tabled)]
struct Row {
    parameter: String,
    value: String,
    source: String,
}

impl Row {
    fn new(parameter: &str, value: &str, source: &str) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            source: source.into(),
        }
    }
}

pub(super) fn host(host: &Host) -> String {
    let mut rows = vec![
        Row::new("name", &host.name, ""),
        Row::new("group", host.group(), ""),
        Row::new("type", &host.host_type().to_string(), ""),
    ];
    if !host.alt_names.is_empty() {
        rows.push(Row::new("aliases", &host.alt_names.join(" "), ""));
    }
    if !host.info.is_empty() {
        rows.push(Row::new("info", &host.info.join("\n"), ""));
    }
    for p in applied_params(host) {
        let values: Vec<&str> = p.value.iter().collect();
        rows.push(Row::new(
            &format!("param:{}", p.keyword),
            &values.join("\n"),
            &p.source.to_string(),
        ));
    }
    Table::new(rows).with(Style::sharp()).to_string()
}

/// Formats an applied value for a list cell: inherited values name their source
fn cell(host: &Host, keyword: &str) -> String {
    match host.applied_param(keyword) {
        None => String::new(),
        Some((value, Source::Local)) => value.iter().collect::<Vec<_>>().join("\n"),
        Some((value, source)) => value
            .iter()
            .map(|v| format!("{v} ({source})"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Tabulates hosts, one per row.
///
/// Shows `hostname` and `user`; with `verbose`, every parameter that applies to any listed host.
#[must_use]
pub fn host_list(hosts: &[&Host], verbose: bool) -> String {
    let mut params: Vec<&str> = LIST_PARAMS.to_vec();
    if verbose {
        for host in hosts {
            for name in host.all_param_names() {
                if !params.contains(&name) {
                    params.push(name);
                }
            }
        }
    }

    let mut builder = Builder::default();
    let mut header = vec!["name".to_owned(), "group".to_owned(), "type".to_owned()];
    header.extend(params.iter().map(|p| format!("param:{p}")));
    builder.push_record(header);

    for host in hosts {
        let name = if host.alt_names.is_empty() {
            host.name.clone()
        } else {
            format!("{} ({})", host.name, host.alt_names.join(","))
        };
        let mut record = vec![name, host.group().to_owned(), host.host_type().to_string()];
        record.extend(params.iter().map(|p| cell(host, p)));
        builder.push_record(record);
    }
    builder.build().with(Style::sharp()).to_string()
}

#[derive(Tabled)]
struct GroupRow {
    name: String,
    hosts: usize,
    patterns: usize,
    desc: String,
    info: String,
}

/// Tabulates groups, one per row
#[must_use]
pub fn group_list(groups: &[Group]) -> String {
    let rows = groups.iter().map(|g| GroupRow {
        name: g.name.clone(),
        hosts: g.hosts().len(),
        patterns: g.patterns().len(),
        desc: g.desc.clone(),
        info: g.info.join("\n"),
    });
    Table::new(rows).with(Style::sharp()).to_string()
}

/// Tabulates the options saved in the ssh config file
#[must_use]
pub fn options(opts: &BTreeMap<String, String>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["option", "value"]);
    for (key, value) in opts {
        builder.push_record([key.as_str(), value.as_str()]);
    }
    builder.build().with(Style::sharp()).to_string()
}
