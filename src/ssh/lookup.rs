//! Finding, filtering and rearranging hosts and groups
// (c) 2024 Ross Younger
//!
//! `check_*` functions never fail; `get_*` functions return [`ConfigError`] on a miss,
//! so callers can probe before committing to a change.
//!
//! Every host's `group` field must name the group whose list holds it. The functions
//! here are the only ones that move hosts between groups, and they keep that true.

use regex::Regex;
use tracing::debug;

use super::{
    errors::ConfigError,
    model::{Group, Host, HostType, SshConfig, DEFAULT_GROUP_NAME},
};

/// Prefix marking a host or group argument as a regular expression
pub const REGEX_PREFIX: &str = "r:";

/// Compiles an optional filter. The empty string means "no filter".
fn filter_regex(expr: &str) -> Result<Option<Regex>, ConfigError> {
    if expr.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Regex::new(expr)?))
    }
}

fn passes(re: Option<&Regex>, s: &str) -> bool {
    match re {
        Some(re) => re.is_match(s),
        None => true,
    }
}

impl SshConfig {
    /// Whether any host or pattern has this primary name
    #[must_use]
    pub fn check_host_by_name(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.find(name).is_some())
    }

    /// Finds a host or pattern by primary name
    pub fn get_host_by_name(&self, name: &str) -> Result<&Host, ConfigError> {
        self.groups
            .iter()
            .find_map(|g| g.find(name))
            .ok_or_else(|| ConfigError::HostNotFound(name.to_owned()))
    }

    /// Mutable access to a host.
    ///
    /// Changing the host's name this way bypasses the checks in [`SshConfig::rename_host`].
    pub fn host_mut(&mut self, name: &str) -> Result<&mut Host, ConfigError> {
        self.groups
            .iter_mut()
            .find_map(|g| g.find_mut(name))
            .ok_or_else(|| ConfigError::HostNotFound(name.to_owned()))
    }

    /// Whether a group of this name exists
    #[must_use]
    pub fn check_group_by_name(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }

    /// Finds a group by name
    pub fn get_group_by_name(&self, name: &str) -> Result<&Group, ConfigError> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| ConfigError::GroupNotFound(name.to_owned()))
    }

    /// Mutable access to a group's descriptive fields.
    /// Use [`SshConfig::rename_group`] to change its name.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut Group, ConfigError> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| ConfigError::GroupNotFound(name.to_owned()))
    }

    /// Every host and pattern name, group by group
    #[must_use]
    pub fn get_all_host_names(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(Group::all)
            .map(|h| h.name.as_str())
            .collect()
    }

    /// Every group name, in order
    #[must_use]
    pub fn get_all_group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Hosts (and patterns) whose group name matches `group_filter` and whose own
    /// name matches `name_filter`. Either filter may be empty to match everything.
    ///
    /// Filters are unanchored regular expressions. Results are in group order,
    /// hosts before patterns within a group.
    pub fn filter_hosts(
        &self,
        group_filter: &str,
        name_filter: &str,
    ) -> Result<Vec<&Host>, ConfigError> {
        let group_re = filter_regex(group_filter)?;
        let name_re = filter_regex(name_filter)?;
        Ok(self
            .groups
            .iter()
            .filter(|g| passes(group_re.as_ref(), &g.name))
            .flat_map(Group::all)
            .filter(|h| passes(name_re.as_ref(), &h.name))
            .collect())
    }

    /// Groups matching `group_filter`, each holding only its hosts that match `name_filter`.
    ///
    /// With a name filter in effect, groups left with no hosts are omitted; without one,
    /// every matching group is returned, empty or not. The returned groups are copies.
    pub fn filter_groups(
        &self,
        group_filter: &str,
        name_filter: &str,
    ) -> Result<Vec<Group>, ConfigError> {
        let group_re = filter_regex(group_filter)?;
        let name_re = filter_regex(name_filter)?;
        let mut result = Vec::new();
        for group in self
            .groups
            .iter()
            .filter(|g| passes(group_re.as_ref(), &g.name))
        {
            let mut group = group.clone();
            if let Some(re) = &name_re {
                group.hosts.retain(|h| re.is_match(&h.name));
                group.patterns.retain(|h| re.is_match(&h.name));
                if group.hosts.is_empty() && group.patterns.is_empty() {
                    continue;
                }
            }
            result.push(group);
        }
        Ok(result)
    }

    /// Attaches a host to the group named by its `group` field.
    ///
    /// Returns false, leaving the document untouched, if that group does not exist.
    /// Name uniqueness is not checked here.
    pub fn add_host(&mut self, mut host: Host) -> bool {
        let Some(index) = self.groups.iter().position(|g| g.name == host.group) else {
            debug!("cannot add {}: no group {}", host.name, host.group);
            return false;
        };
        host.position = self.claim_position();
        host.matched_params.clear();
        self.groups[index].push(host);
        true
    }

    /// Appends a group. Returns false if one of that name already exists.
    pub fn add_group(&mut self, mut group: Group) -> bool {
        if self.check_group_by_name(&group.name) {
            return false;
        }
        let hosts: Vec<Host> = group.hosts.drain(..).chain(group.patterns.drain(..)).collect();
        let name = group.name.clone();
        self.groups.push(group);
        for mut host in hosts {
            host.group.clone_from(&name);
            let _ = self.add_host(host);
        }
        true
    }

    /// Moves a host from one group to another, keeping its place in declaration order.
    ///
    /// All checks happen before anything is changed; on error the document is untouched.
    pub fn move_host_to_group(
        &mut self,
        name: &str,
        from: &str,
        to: &str,
    ) -> Result<(), ConfigError> {
        let to_index = self
            .groups
            .iter()
            .position(|g| g.name == to)
            .ok_or_else(|| ConfigError::GroupNotFound(to.to_owned()))?;
        let from_index = self
            .groups
            .iter()
            .position(|g| g.name == from)
            .ok_or_else(|| ConfigError::GroupNotFound(from.to_owned()))?;
        if self.groups[from_index].find(name).is_none() {
            return Err(ConfigError::HostNotFound(name.to_owned()));
        }
        if from_index == to_index {
            return Ok(());
        }
        let mut host = self.groups[from_index]
            .take(name)
            .ok_or_else(|| ConfigError::HostNotFound(name.to_owned()))?;
        debug!("moving {name} from {from} to {to}");
        to.clone_into(&mut host.group);
        self.groups[to_index].push(host);
        Ok(())
    }

    /// Removes a host or pattern, returning it
    pub fn remove_host(&mut self, name: &str) -> Result<Host, ConfigError> {
        self.groups
            .iter_mut()
            .find_map(|g| g.take(name))
            .ok_or_else(|| ConfigError::HostNotFound(name.to_owned()))
    }

    /// Removes a group along with everything in it. The default group cannot be removed.
    pub fn remove_group(&mut self, name: &str) -> Result<Group, ConfigError> {
        if name == DEFAULT_GROUP_NAME {
            return Err(ConfigError::DefaultGroup);
        }
        let index = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| ConfigError::GroupNotFound(name.to_owned()))?;
        Ok(self.groups.remove(index))
    }

    /// Changes a host's primary name.
    ///
    /// The new name must be free, and must not turn a normal host into a pattern or the reverse.
    pub fn rename_host(&mut self, old: &str, new: &str) -> Result<(), ConfigError> {
        if old == new {
            return self.get_host_by_name(old).map(|_| ());
        }
        let current = self.get_host_by_name(old)?.host_type();
        if self.check_host_by_name(new) {
            return Err(ConfigError::HostExists(new.to_owned()));
        }
        if HostType::for_name(new) != current {
            return Err(ConfigError::HostTypeChange {
                from: old.to_owned(),
                to: new.to_owned(),
            });
        }
        new.clone_into(&mut self.host_mut(old)?.name);
        Ok(())
    }

    /// Renames a group and updates the group reference of everything in it
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<(), ConfigError> {
        if old == DEFAULT_GROUP_NAME {
            return Err(ConfigError::DefaultGroup);
        }
        if old != new && self.check_group_by_name(new) {
            return Err(ConfigError::GroupExists(new.to_owned()));
        }
        let group = self.group_mut(old)?;
        new.clone_into(&mut group.name);
        for host in group.hosts.iter_mut().chain(group.patterns.iter_mut()) {
            new.clone_into(&mut host.group);
        }
        Ok(())
    }

    /// Expands command-line host arguments.
    ///
    /// An argument of the form `r:<regex>` selects every host whose name matches; anything
    /// else is taken literally, whether or not such a host exists. The result is sorted
    /// and free of duplicates.
    pub fn expand_host_names<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<String>, ConfigError> {
        expand_names(args, &self.get_all_host_names())
    }

    /// As [`SshConfig::expand_host_names`], for group names
    pub fn expand_group_names<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<Vec<String>, ConfigError> {
        expand_names(args, &self.get_all_group_names())
    }
}

fn expand_names<S: AsRef<str>>(args: &[S], known: &[&str]) -> Result<Vec<String>, ConfigError> {
    let mut result = Vec::new();
    for arg in args {
        let arg = arg.as_ref();
        if let Some(expr) = arg.strip_prefix(REGEX_PREFIX) {
            let re = Regex::new(expr)?;
            result.extend(
                known
                    .iter()
                    .filter(|n| re.is_match(n))
                    .map(|n| (*n).to_owned()),
            );
        } else {
            result.push(arg.to_owned());
        }
    }
    result.sort();
    result.dedup();
    Ok(result)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::assert_eq_as_result;

    use crate::ssh::{
        errors::ConfigError,
        model::{Group, Host, SshConfig},
    };

    const SAMPLE: &str = r"
        Host lonely
        #@group: web
        Host web-1
        Host web-2
        Host web-*
            user www
        #@group: db
        Host db-1
        Host db-2
        #@group: empty
    ";

    fn sample() -> SshConfig {
        SshConfig::parse(&SAMPLE.lines().collect::<Vec<_>>()).unwrap()
    }

    fn names(hosts: &[&Host]) -> Vec<String> {
        hosts.iter().map(|h| h.name.clone()).collect()
    }

    /// Every host appears exactly once, in the group its `group` field names
    fn assert_consistent(config: &SshConfig) {
        let mut seen = Vec::new();
        for g in config.groups() {
            for h in g.all() {
                assert_eq!(h.group(), g.name, "{}", h.name);
                seen.push(h.name.clone());
            }
        }
        let len = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), len);
    }

    #[test]
    fn check_and_get() {
        let config = sample();
        assert!(config.check_host_by_name("web-1"));
        assert!(config.check_host_by_name("web-*"));
        assert!(!config.check_host_by_name("web"));
        assert_eq!(config.get_host_by_name("db-2").unwrap().group(), "db");
        assert!(matches!(
            config.get_host_by_name("nope"),
            Err(ConfigError::HostNotFound(n)) if n == "nope"
        ));

        assert!(config.check_group_by_name("empty"));
        assert!(!config.check_group_by_name("nope"));
        assert_eq!(config.get_group_by_name("web").unwrap().hosts().len(), 2);
        assert!(matches!(
            config.get_group_by_name("nope"),
            Err(ConfigError::GroupNotFound(_))
        ));
    }

    #[test]
    fn all_names() {
        let config = sample();
        assert_eq!(
            config.get_all_host_names(),
            vec!["lonely", "web-1", "web-2", "web-*", "db-1", "db-2"]
        );
        assert_eq!(
            config.get_all_group_names(),
            vec!["default", "web", "db", "empty"]
        );
    }

    #[test]
    fn host_filtering() -> Result<()> {
        let config = sample();
        for (group, name, expected) in [
            ("", "", vec!["lonely", "web-1", "web-2", "web-*", "db-1", "db-2"]),
            ("web", "", vec!["web-1", "web-2", "web-*"]),
            ("", "-1", vec!["web-1", "db-1"]),
            ("^db$", "2", vec!["db-2"]),
            ("e", "^l", vec!["lonely"]),
            ("^e", "^l", vec![]),
            ("nothing", "", vec![]),
        ] {
            let result = names(&config.filter_hosts(group, name)?);
            assert_eq_as_result!(result, expected)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("group filter {group:?}, name filter {name:?}"))?;
        }
        Ok(())
    }

    #[test]
    fn bad_filter() {
        let config = sample();
        assert!(matches!(
            config.filter_hosts("(", ""),
            Err(ConfigError::InvalidFilter(_))
        ));
    }

    #[test]
    fn group_filtering() {
        let config = sample();
        let all = config.filter_groups("", "").unwrap();
        assert_eq!(all.len(), 4);

        let groups = config.filter_groups("", "-2").unwrap();
        let summary: Vec<(&str, usize, usize)> = groups
            .iter()
            .map(|g| (g.name.as_str(), g.hosts().len(), g.patterns().len()))
            .collect();
        assert_eq!(summary, vec![("web", 1, 0), ("db", 1, 0)]);

        // the original is untouched
        assert_eq!(config.get_group_by_name("web").unwrap().hosts().len(), 2);
    }

    #[test]
    fn add_host_needs_group() {
        let mut config = sample();
        assert!(!config.add_host(Host::new("x", "nowhere")));
        assert!(!config.check_host_by_name("x"));

        assert!(config.add_host(Host::new("x", "empty")));
        assert!(config.add_host(Host::new("x-*", "empty")));
        let group = config.get_group_by_name("empty").unwrap();
        assert_eq!(group.hosts().len(), 1);
        assert_eq!(group.patterns().len(), 1);
        assert_eq!(config.all_hosts().last().unwrap().name, "x-*");
        assert_consistent(&config);
    }

    #[test]
    fn add_group_once() {
        let mut config = sample();
        assert!(!config.add_group(Group::new("web")));
        let mut group = Group::new("new").with_desc("fresh");
        group.push(Host::new("n1", "wrong"));
        assert!(config.add_group(group));
        assert_eq!(config.groups().last().unwrap().desc, "fresh");
        assert_eq!(config.get_host_by_name("n1").unwrap().group(), "new");
        assert_consistent(&config);
    }

    #[test]
    fn move_host() {
        let mut config = sample();
        config.move_host_to_group("web-1", "web", "db").unwrap();
        config.move_host_to_group("web-*", "web", "empty").unwrap();
        assert_consistent(&config);
        assert_eq!(config.get_host_by_name("web-1").unwrap().group(), "db");
        assert_eq!(config.get_group_by_name("db").unwrap().hosts().len(), 3);
        assert_eq!(config.get_group_by_name("empty").unwrap().patterns().len(), 1);
        assert_eq!(config.get_group_by_name("web").unwrap().all().count(), 1);
    }

    #[test]
    fn failed_move_changes_nothing() {
        let mut config = sample();
        let before = config.clone();
        assert!(matches!(
            config.move_host_to_group("web-1", "web", "nowhere"),
            Err(ConfigError::GroupNotFound(g)) if g == "nowhere"
        ));
        assert!(matches!(
            config.move_host_to_group("db-1", "web", "db"),
            Err(ConfigError::HostNotFound(_))
        ));
        assert_eq!(config, before);
        config.move_host_to_group("db-1", "db", "db").unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn remove() {
        let mut config = sample();
        assert_eq!(config.remove_host("web-2").unwrap().name, "web-2");
        assert!(!config.check_host_by_name("web-2"));
        assert!(config.remove_host("web-2").is_err());

        assert!(matches!(config.remove_group("default"), Err(ConfigError::DefaultGroup)));
        assert_eq!(config.remove_group("db").unwrap().hosts().len(), 2);
        assert!(!config.check_host_by_name("db-1"));
        assert!(config.remove_group("db").is_err());
    }

    #[test]
    fn rename_host_checks() {
        let mut config = sample();
        assert!(matches!(
            config.rename_host("web-1", "web-2"),
            Err(ConfigError::HostExists(_))
        ));
        assert!(matches!(
            config.rename_host("web-1", "web-1*"),
            Err(ConfigError::HostTypeChange { .. })
        ));
        assert!(matches!(
            config.rename_host("nope", "x"),
            Err(ConfigError::HostNotFound(_))
        ));
        config.rename_host("web-1", "www-1").unwrap();
        assert_eq!(config.get_host_by_name("www-1").unwrap().group(), "web");
        config.rename_host("web-*", "www-*").unwrap();
        assert!(config.check_host_by_name("www-*"));
    }

    #[test]
    fn rename_group_updates_hosts() {
        let mut config = sample();
        assert!(matches!(
            config.rename_group("web", "db"),
            Err(ConfigError::GroupExists(_))
        ));
        assert!(matches!(
            config.rename_group("default", "x"),
            Err(ConfigError::DefaultGroup)
        ));
        config.rename_group("web", "frontend").unwrap();
        assert!(!config.check_group_by_name("web"));
        assert_eq!(config.get_host_by_name("web-*").unwrap().group(), "frontend");
        assert_consistent(&config);
    }

    #[test]
    fn name_expansion() {
        let config = sample();
        assert_eq!(
            config
                .expand_host_names(&["r:^db", "web-1", "r:-1$", "unknown"])
                .unwrap(),
            vec!["db-1", "db-2", "unknown", "web-1"]
        );
        assert!(config.expand_host_names(&["r:("]).is_err());
        assert_eq!(
            config.expand_group_names(&["r:^(web|db)$"]).unwrap(),
            vec!["db", "web"]
        );
    }
}
