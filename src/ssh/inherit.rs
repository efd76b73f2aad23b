//! Parameter inheritance
// (c) 2024 Ross Younger
//!
//! For every normal host we work out which parameters it picks up from global
//! parameters and from matching pattern hosts, and where each one came from.
//!
//! ## Precedence
//!
//! For a host `H`, walking the whole document in declaration order:
//!
//! 1. Each global parameter not set locally on `H` is recorded with source `global`.
//! 2. A matching pattern declared _before_ `H` contributes every parameter not already
//!    recorded. It does **not** look at `H`'s local parameters, so it can shadow a local
//!    value when combined with [`Host::applied_param`], which consults inherited values first.
//! 3. A matching pattern declared _after_ `H` contributes only parameters which are neither
//!    set locally nor already recorded.
//!
//! Within each of 2 and 3, the earliest matching pattern wins.
//!
//! Rule 2 is relied on by existing files; tests pin it.

use std::collections::BTreeMap;

use super::{
    matching::pattern_matches,
    model::{Host, ParamValue, Params, SshConfig, Source},
};

type Matched = BTreeMap<String, (ParamValue, Source)>;

/// Computes the inherited parameters of one host.
///
/// `all` is every host in declaration order, `host` included.
fn inherited_for(host: &Host, all: &[&Host], globals: &Params) -> Matched {
    let mut matched = Matched::new();

    for (key, value) in globals.iter() {
        if !host.params.contains(key) {
            let _ = matched.insert(key.clone(), (value.clone(), Source::Global));
        }
    }

    let mut before = true;
    for candidate in all {
        if candidate.position == host.position {
            before = false;
            continue;
        }
        if !candidate.is_pattern() || !pattern_matches(&candidate.name, &host.name) {
            continue;
        }
        for (key, value) in candidate.params.iter() {
            if matched.contains_key(key) || (!before && host.params.contains(key)) {
                continue;
            }
            let _ = matched.insert(
                key.clone(),
                (value.clone(), Source::Pattern(candidate.name.clone())),
            );
        }
    }
    matched
}

impl SshConfig {
    /// (Re)computes the inherited parameters of every normal host.
    ///
    /// The parser calls this before returning; call it again after changing the document
    /// if you need [`Host::applied_param`] to reflect the changes.
    pub fn resolve(&mut self) {
        let mut results: BTreeMap<usize, Matched> = {
            let all = self.all_hosts();
            all.iter()
                .filter(|h| !h.is_pattern())
                .map(|h| (h.position, inherited_for(h, &all, &self.globals)))
                .collect()
        };
        for group in &mut self.groups {
            for host in &mut group.hosts {
                host.matched_params = results.remove(&host.position).unwrap_or_default();
            }
            for pattern in &mut group.patterns {
                pattern.matched_params.clear();
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////
