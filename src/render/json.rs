// (c) 2024 Ross Younger
//! JSON style

use serde::Serialize;

use super::{applied_params, AppliedParam};
use crate::ssh::{Host, HostType};

#[derive(Serialize)]
struct HostView<'a> {
    name: &'a str,
    alt_names: &'a [String],
    group: &'a str,
    #[serde(rename = "type")]
    host_type: HostType,
    info: &'a [String],
    params: Vec<AppliedParam<'a>>,
}

pub(super) fn host(host: &Host) -> anyhow::Result<String> {
    let view = HostView {
        name: &host.name,
        alt_names: &host.alt_names,
        group: host.group(),
        host_type: host.host_type(),
        info: &host.info,
        params: applied_params(host),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
