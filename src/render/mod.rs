// (c) 2024 Ross Younger
//! Human- and machine-readable views of hosts and groups
//!
//! Host detail views come in a fixed set of styles, chosen by [`HostStyle`].
//! Every style shows where each applied parameter came from: the host itself,
//! the global parameters, or a named pattern.

use serde::{Deserialize, Serialize};

use crate::ssh::{Group, Host, ParamValue, Source};

mod json;
mod simple;
mod table;

pub use table::{group_list, host_list, options};

/// How `host show` presents a host
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HostStyle {
    /// Indented plain text
    #[default]
    Simple,
    /// A three-column table of parameter, value and source
    Table,
    /// JSON, for scripts
    Json,
}

/// Key under which a persisted style is stored in the ssh config file's `#@config:` lines
pub const HOST_STYLE_OPTION: &str = "host-style";

/// One applied parameter of a host, with its provenance
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AppliedParam<'a> {
    pub(crate) keyword: &'a str,
    pub(crate) value: &'a ParamValue,
    pub(crate) source: Source,
}

/// Every parameter that applies to a host, in keyword order
pub(crate) fn applied_params(host: &Host) -> Vec<AppliedParam<'_>> {
    host.all_param_names()
        .into_iter()
        .filter_map(|keyword| {
            host.applied_param(keyword).map(|(value, source)| AppliedParam {
                keyword,
                value,
                source,
            })
        })
        .collect()
}

/// Renders a single host in the given style
pub fn host(host: &Host, style: HostStyle) -> anyhow::Result<String> {
    Ok(match style {
        HostStyle::Simple => simple::host(host),
        HostStyle::Table => table::host(host),
        HostStyle::Json => json::host(host)?,
    })
}

/// Renders a group with its metadata and members
#[must_use]
pub fn group(group: &Group) -> String {
    simple::group(group)
}

/// Colours a unified diff for the terminal
#[must_use]
pub fn diff(text: &str) -> String {
    simple::diff(text)
}
