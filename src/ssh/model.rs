//! Groups, hosts and their parameters
// (c) 2024 Ross Younger

use std::{collections::BTreeMap, fmt::Display};

use indexmap::IndexMap;

use serde::Serialize;

use super::params::is_multi_valued;

/// Name of the group that collects everything declared before the first `#@group:` line.
pub const DEFAULT_GROUP_NAME: &str = "default";
/// Description given to the default group
pub const DEFAULT_GROUP_DESC: &str = "Default group";

/// Whether a host is a concrete destination or a wildcard template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HostType {
    /// A concrete, connectable entry
    Normal,
    /// A wildcard template which only supplies inherited parameters
    Pattern,
}

impl HostType {
    /// Decides the type from a host's primary name
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        if name.contains('*') {
            HostType::Pattern
        } else {
            HostType::Normal
        }
    }
}

/// The value of a single parameter.
///
/// Keywords registered as multi-valued (see [`is_multi_valued`]) hold a list, in file order.
/// Everything else holds a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A last-write-wins value
    Single(String),
    /// A repeatable directive, e.g. `LocalForward`
    Multi(Vec<String>),
}

impl ParamValue {
    /// Iterates over the individual values. A `Single` yields exactly once.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            ParamValue::Single(s) => std::slice::from_ref(s),
            ParamValue::Multi(v) => v.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Single(s) => f.write_str(s),
            ParamValue::Multi(v) => f.write_str(&v.join(", ")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_owned())
    }
}

/// A parameter table. Keys are lowercase keywords.
///
/// Keys are kept in the order they were first recorded, so a file keeps its layout
/// when it is written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Records a value as the parser does: multi-valued keywords accumulate, others overwrite.
    pub fn push(&mut self, keyword: &str, value: &str) {
        let keyword = keyword.to_lowercase();
        if is_multi_valued(&keyword) {
            match self.0.get_mut(&keyword) {
                Some(ParamValue::Multi(v)) => v.push(value.to_owned()),
                _ => {
                    let _ = self
                        .0
                        .insert(keyword, ParamValue::Multi(vec![value.to_owned()]));
                }
            }
        } else {
            let _ = self.0.insert(keyword, ParamValue::Single(value.to_owned()));
        }
    }

    /// Like [`Params::push`], but refuses to add an exact duplicate to a multi-valued keyword.
    ///
    /// Returns whether anything changed.
    pub fn set(&mut self, keyword: &str, value: &str) -> bool {
        let keyword = keyword.to_lowercase();
        if let Some(ParamValue::Multi(v)) = self.0.get(&keyword) {
            if v.iter().any(|existing| existing == value) {
                return false;
            }
        }
        self.push(&keyword, value);
        true
    }

    /// Removes a keyword entirely, returning what it held
    pub fn unset(&mut self, keyword: &str) -> Option<ParamValue> {
        self.0.shift_remove(&keyword.to_lowercase())
    }

    /// Looks up a keyword (case-insensitive)
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&ParamValue> {
        self.0.get(&keyword.to_lowercase())
    }

    /// Whether a keyword is present (case-insensitive)
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains_key(&keyword.to_lowercase())
    }

    /// Iterates over `(keyword, value)` in the order keywords were first recorded
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Iterates over the keywords
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of keywords
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keywords
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut params = Params::default();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Where an applied parameter value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Source {
    /// Set directly on the host
    Local,
    /// Declared before any `Host` line
    Global,
    /// Inherited from the named pattern host
    Pattern(String),
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Local => f.write_str("local"),
            Source::Global => f.write_str("global"),
            Source::Pattern(p) => f.write_str(p),
        }
    }
}

impl From<Source> for String {
    fn from(value: Source) -> Self {
        value.to_string()
    }
}

/// A single `Host` block
///
/// Equality considers the declared content only (names, group, info, parameters and type);
/// the inherited parameters are derived data and are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Host {
    /// Primary name, the first word on the `Host` line
    pub name: String,
    /// Any further names on the `Host` line
    pub alt_names: Vec<String>,
    /// Name of the group whose list holds this host.
    /// Maintained by [`SshConfig`](super::SshConfig); do not change it by hand.
    pub(crate) group: String,
    /// Free-text info lines (`#@host:` metadata)
    pub info: Vec<String>,
    /// Parameters defined in this block
    pub params: Params,
    #[serde(rename = "type")]
    host_type: HostType,
    /// Inherited parameters, computed by the resolver
    pub(crate) matched_params: BTreeMap<String, (ParamValue, Source)>,
    /// Declaration order across the whole file; drives the resolver's before/after test
    #[serde(skip)]
    pub(crate) position: usize,
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.alt_names == other.alt_names
            && self.group == other.group
            && self.info == other.info
            && self.params == other.params
            && self.host_type == other.host_type
    }
}

impl Host {
    /// Creates an empty host. Its type is decided from `name` and never changes.
    #[must_use]
    pub fn new(name: &str, group: &str) -> Self {
        Self {
            name: name.to_owned(),
            alt_names: Vec::new(),
            group: group.to_owned(),
            info: Vec::new(),
            params: Params::default(),
            host_type: HostType::for_name(name),
            matched_params: BTreeMap::new(),
            position: 0,
        }
    }

    /// Builder-style helper to set the alternate names
    #[must_use]
    pub fn with_alt_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.alt_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper to set the info lines
    #[must_use]
    pub fn with_info<S: Into<String>>(mut self, info: impl IntoIterator<Item = S>) -> Self {
        self.info = info.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper to set the parameters
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Owning group name
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Normal host or pattern
    #[must_use]
    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    /// Convenience for `host_type() == HostType::Pattern`
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        self.host_type == HostType::Pattern
    }

    /// Inherited parameters, keyed by keyword
    #[must_use]
    pub fn matched_params(&self) -> &BTreeMap<String, (ParamValue, Source)> {
        &self.matched_params
    }

    /// Every keyword that applies to this host, local or inherited, in keyword order
    #[must_use]
    pub fn all_param_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .params
            .keys()
            .chain(self.matched_params.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Returns the value that applies for `param`, and where it came from.
    ///
    /// Inherited values are consulted before local ones. In combination with the resolver
    /// this means a pattern declared _before_ the host, or a global parameter, can shadow a
    /// local value; see the resolver documentation.
    #[must_use]
    pub fn applied_param(&self, param: &str) -> Option<(&ParamValue, Source)> {
        let param = param.to_lowercase();
        if let Some((value, source)) = self.matched_params.get(&param) {
            return Some((value, source.clone()));
        }
        self.params.get(&param).map(|v| (v, Source::Local))
    }

    /// Convenience: the first applied value of `param` as a string
    #[must_use]
    pub fn applied_str(&self, param: &str) -> Option<&str> {
        self.applied_param(param).and_then(|(v, _)| v.iter().next())
    }
}

/// A named collection of hosts and patterns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Group name (unique by convention)
    pub name: String,
    /// Optional one-line description
    pub desc: String,
    /// Free-text info lines
    pub info: Vec<String>,
    pub(crate) hosts: Vec<Host>,
    pub(crate) patterns: Vec<Host>,
}

impl Group {
    /// Creates an empty group
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            desc: String::new(),
            info: Vec::new(),
            hosts: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Builder-style helper to set the description
    #[must_use]
    pub fn with_desc(mut self, desc: &str) -> Self {
        desc.clone_into(&mut self.desc);
        self
    }

    /// Builder-style helper to set the info lines
    #[must_use]
    pub fn with_info<S: Into<String>>(mut self, info: impl IntoIterator<Item = S>) -> Self {
        self.info = info.into_iter().map(Into::into).collect();
        self
    }

    /// Concrete hosts, in order
    #[must_use]
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Pattern hosts, in order
    #[must_use]
    pub fn patterns(&self) -> &[Host] {
        &self.patterns
    }

    /// Hosts followed by patterns; the order the serializer writes them in
    pub fn all(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter().chain(self.patterns.iter())
    }

    /// Whether this is the group with the reserved default name
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP_NAME
    }

    /// Appends a host to the list matching its type.
    /// The caller is responsible for the group reference.
    pub(crate) fn push(&mut self, host: Host) {
        if host.is_pattern() {
            self.patterns.push(host);
        } else {
            self.hosts.push(host);
        }
    }

    /// Removes a host by primary name from whichever list holds it
    pub(crate) fn take(&mut self, name: &str) -> Option<Host> {
        if let Some(i) = self.hosts.iter().position(|h| h.name == name) {
            return Some(self.hosts.remove(i));
        }
        if let Some(i) = self.patterns.iter().position(|h| h.name == name) {
            return Some(self.patterns.remove(i));
        }
        None
    }

    pub(crate) fn find(&self, name: &str) -> Option<&Host> {
        self.all().find(|h| h.name == name)
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut Host> {
        self.hosts
            .iter_mut()
            .chain(self.patterns.iter_mut())
            .find(|h| h.name == name)
    }
}

/// The root of the document model
#[derive(Debug, Clone, Serialize)]
pub struct SshConfig {
    pub(crate) groups: Vec<Group>,
    /// Persisted tool options (`#@config: key=value`)
    pub opts: BTreeMap<String, String>,
    /// Parameters declared before the first `Host` line
    pub globals: Params,
    #[serde(skip)]
    pub(crate) next_position: usize,
}

impl PartialEq for SshConfig {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups && self.opts == other.opts && self.globals == other.globals
    }
}

impl Default for SshConfig {
    /// An empty document, holding only the default group
    fn default() -> Self {
        Self {
            groups: vec![Group::new(DEFAULT_GROUP_NAME).with_desc(DEFAULT_GROUP_DESC)],
            opts: BTreeMap::new(),
            globals: Params::default(),
            next_position: 0,
        }
    }
}

impl SshConfig {
    /// All groups, in file order. The first is always the default group.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Every host and pattern across all groups, in declaration order.
    ///
    /// For a freshly parsed document this is file order. Hosts added later sort after
    /// everything that was parsed.
    #[must_use]
    pub fn all_hosts(&self) -> Vec<&Host> {
        let mut all: Vec<&Host> = self.groups.iter().flat_map(Group::all).collect();
        all.sort_by_key(|h| h.position);
        all
    }

    /// Hands out the next declaration position
    pub(crate) fn claim_position(&mut self) -> usize {
        let p = self.next_position;
        self.next_position += 1;
        p
    }
}

#[cfg(test)]
mod test {
    use super::{Host, HostType, ParamValue, Params, Source};

    #[test]
    fn host_type_from_name() {
        for (name, expected) in [
            ("server", HostType::Normal),
            ("*", HostType::Pattern),
            ("test-*", HostType::Pattern),
            ("web?", HostType::Normal),
        ] {
            assert_eq!(Host::new(name, "default").host_type(), expected, "{name}");
        }
    }

    #[test]
    fn multi_valued_accumulates_in_order() {
        let mut p = Params::default();
        p.push("LocalForward", "A");
        p.push("localforward", "B");
        p.push("LOCALFORWARD", "C");
        assert_eq!(
            p.get("localforward"),
            Some(&ParamValue::Multi(vec!["A".into(), "B".into(), "C".into()]))
        );
    }

    #[test]
    fn single_valued_overwrites() {
        let mut p = Params::default();
        p.push("Port", "22");
        p.push("port", "2222");
        assert_eq!(p.get("PORT"), Some(&ParamValue::Single("2222".into())));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn set_refuses_duplicates() {
        let mut p = Params::default();
        assert!(p.set("remoteforward", "8080 localhost:80"));
        assert!(!p.set("remoteforward", "8080 localhost:80"));
        assert!(p.set("remoteforward", "9090 localhost:90"));
        assert_eq!(p.get("remoteforward").unwrap().iter().count(), 2);
        assert!(p.unset("RemoteForward").is_some());
        assert!(p.is_empty());
    }

    #[test]
    fn applied_param_prefers_inherited() {
        let params = [("user", "local")].into_iter().collect();
        let mut h = Host::new("a", "default").with_params(params);
        assert_eq!(
            h.applied_param("user"),
            Some((&ParamValue::Single("local".into()), Source::Local))
        );
        let _ = h.matched_params.insert(
            "user".into(),
            (ParamValue::Single("g".into()), Source::Global),
        );
        assert_eq!(h.applied_str("USER"), Some("g"));
        assert_eq!(h.applied_param("nothing"), None);
    }

    #[test]
    fn source_display() {
        assert_eq!(Source::Local.to_string(), "local");
        assert_eq!(Source::Global.to_string(), "global");
        assert_eq!(Source::Pattern("web-*".into()).to_string(), "web-*");
    }
}
