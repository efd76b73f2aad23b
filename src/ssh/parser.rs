//! Turns raw lines into the document model
// (c) 2024 Ross Younger

use tracing::{debug, warn};

use super::{
    errors::ConfigError,
    lines::{classify, Line, MetaTag},
    model::{Group, Host, SshConfig},
};

/// What to do with a parameter line that appears before any `Host` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlobalParams {
    /// Record it as a global parameter, applying to every host
    #[default]
    Accept,
    /// Fail with [`ConfigError::ParamWithoutHost`]. This was the behaviour of early releases.
    Reject,
}

/// Parser tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treatment of parameters outside any host block
    pub globals: GlobalParams,
}

/// Working state carried from one line to the next
#[derive(Debug, Default)]
struct ParserState {
    /// Index into the document's groups of the group receiving hosts
    active_group: usize,
    /// The host whose block we are inside, not yet stored in its group
    pending_host: Option<Host>,
    /// `#@host:` lines waiting for the next `Host` line
    pending_info: Vec<String>,
}

impl ParserState {
    /// Stores the pending host (if any) into the active group
    fn flush(&mut self, config: &mut SshConfig) {
        if let Some(host) = self.pending_host.take() {
            debug!("storing host {} in group {}", host.name, host.group);
            config.groups[self.active_group].push(host);
        }
    }
}

/// Reads ssh config lines, as written by this crate or by hand, into an [`SshConfig`].
///
/// Unrecognised lines are logged and skipped. Once all lines are read, parameter
/// inheritance is resolved before the document is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    /// Creates a parser with the given options
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses a sequence of lines. Lines may or may not carry their trailing newline.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<SshConfig, ConfigError> {
        let mut config = SshConfig::default();
        let mut state = ParserState::default();
        for (index, line) in lines.iter().enumerate() {
            self.parse_line(&mut config, &mut state, index + 1, line.as_ref())?;
        }
        // The last host has nothing following it to trigger a flush
        state.flush(&mut config);
        config.resolve();
        Ok(config)
    }

    fn parse_line(
        &self,
        config: &mut SshConfig,
        state: &mut ParserState,
        line_number: usize,
        line: &str,
    ) -> Result<(), ConfigError> {
        match classify(line) {
            Line::Empty => (),
            Line::Comment => debug!("dropping comment at line {line_number}"),
            Line::UnknownMeta { tag } => {
                debug!("dropping comment with unhandled tag `{tag}` at line {line_number}");
            }
            Line::Meta { tag, value } => Self::apply_meta(config, state, line_number, tag, value),
            Line::Invalid => {
                warn!(
                    "unreadable configuration line at line {line_number}: `{}`",
                    line.trim()
                );
            }
            Line::Host { names } => {
                state.flush(config);
                let mut names = names.into_iter();
                let Some(name) = names.next() else {
                    warn!("Host without a name at line {line_number}");
                    return Ok(());
                };
                let group = &config.groups[state.active_group].name;
                let mut host = Host::new(&name, group)
                    .with_alt_names(names)
                    .with_info(std::mem::take(&mut state.pending_info));
                host.position = config.claim_position();
                debug!("new {} `{name}` at line {line_number}", host.host_type());
                state.pending_host = Some(host);
            }
            Line::Generic { keyword, value } => match state.pending_host.as_mut() {
                Some(host) => {
                    debug!("host `{}`: {keyword} -> {value}", host.name);
                    host.params.push(&keyword, &value);
                }
                None => match self.options.globals {
                    GlobalParams::Accept => {
                        debug!("global parameter {keyword} -> {value}");
                        config.globals.push(&keyword, &value);
                    }
                    GlobalParams::Reject => {
                        return Err(ConfigError::ParamWithoutHost {
                            line: line_number,
                            keyword,
                        })
                    }
                },
            },
        }
        Ok(())
    }

    fn apply_meta(
        config: &mut SshConfig,
        state: &mut ParserState,
        line_number: usize,
        tag: MetaTag,
        value: String,
    ) {
        match tag {
            MetaTag::Config => {
                if let Some((k, v)) = value.split_once('=') {
                    debug!("config option {k}={v}");
                    let _ = config.opts.insert(k.trim().to_owned(), v.trim().to_owned());
                } else {
                    warn!("ignoring config option without `=` at line {line_number}: `{value}`");
                }
            }
            MetaTag::Group => {
                state.flush(config);
                debug!("starting group `{value}`");
                config.groups.push(Group::new(&value));
                state.active_group = config.groups.len() - 1;
            }
            MetaTag::Desc => {
                let group = &mut config.groups[state.active_group];
                debug!("description for group `{}`: {value}", group.name);
                group.desc = value;
            }
            MetaTag::Info => {
                let group = &mut config.groups[state.active_group];
                debug!("info for group `{}`: {value}", group.name);
                group.info.push(value);
            }
            MetaTag::Host => {
                debug!("host info cached for the next host: {value}");
                state.pending_info.push(value);
            }
        }
    }
}

impl SshConfig {
    /// Parses lines with the default [`ParserOptions`]
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, ConfigError> {
        Parser::default().parse(lines)
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use assertables::assert_contains;

    use super::{GlobalParams, Parser, ParserOptions};
    use crate::ssh::{
        errors::ConfigError,
        model::{Group, Host, HostType, ParamValue, Params, SshConfig, DEFAULT_GROUP_DESC},
    };

    fn lines(s: &str) -> Vec<&str> {
        s.lines().collect()
    }

    fn params(p: &[(&str, &str)]) -> Params {
        p.iter().copied().collect()
    }

    fn default_group() -> Group {
        Group::new("default").with_desc(DEFAULT_GROUP_DESC)
    }

    #[test]
    fn empty_input() {
        let config = SshConfig::parse::<&str>(&[]).unwrap();
        assert_eq!(config.groups(), &[default_group()]);
        assert!(config.groups()[0].hosts().is_empty());
        assert!(config.groups()[0].patterns().is_empty());
        assert!(config.opts.is_empty());
        assert!(config.globals.is_empty());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        for kw in ["HostName", "hostname", "HOSTNAME"] {
            let input = format!("Host test\n    {kw} Some.Host.Example");
            let config = SshConfig::parse(&lines(&input)).unwrap();
            let host = &config.groups()[0].hosts()[0];
            assert_eq!(
                host.params.get("hostname"),
                Some(&ParamValue::Single("Some.Host.Example".into()))
            );
        }
    }

    #[test]
    fn optional_equals() {
        let config = SshConfig::parse(&lines(
            r"
            #@host: testinfo
            host test
                hostname = 1.2.3.4
                port=2222
                user    =testUSER
            "
        ))
        .unwrap();
        let mut expected = default_group();
        expected.hosts.push(
            Host::new("test", "default")
                .with_info(["testinfo"])
                .with_params(params(&[
                    ("hostname", "1.2.3.4"),
                    ("port", "2222"),
                    ("user", "testUSER"),
                ])),
        );
        assert_eq!(config.groups(), &[expected]);
    }

    #[test]
    fn alt_names() {
        let config = SshConfig::parse(&lines("Host main alt1  alt2\n  user me")).unwrap();
        let host = &config.groups()[0].hosts()[0];
        assert_eq!(host.name, "main");
        assert_eq!(host.alt_names, vec!["alt1", "alt2"]);
    }

    #[test]
    fn patterns_are_separated() {
        let config = SshConfig::parse(&lines(
            r"
            #@host: pattern for test1 hosts
            Host test1-*
                user test123
            Host test1-app
                hostname 10.0.0.1
            #@host: pattern for test2 hosts
            Host test2-*
                user test321
            "
        ))
        .unwrap();
        let group = &config.groups()[0];
        assert_eq!(group.hosts().len(), 1);
        assert_eq!(group.patterns().len(), 2);
        assert_eq!(group.patterns()[0].host_type(), HostType::Pattern);
        assert_eq!(group.patterns()[0].info, vec!["pattern for test1 hosts"]);
        assert_eq!(group.patterns()[1].info, vec!["pattern for test2 hosts"]);
        assert!(group.hosts()[0].info.is_empty());
    }

    #[test]
    fn multi_valued_keeps_order() {
        let config = SshConfig::parse(&lines(
            r"
            Host tunnel
                LocalForward A
                localforward B
                LOCALFORWARD C
                port 1
                port 2
            "
        ))
        .unwrap();
        let host = &config.groups()[0].hosts()[0];
        assert_eq!(
            host.params.get("localforward"),
            Some(&ParamValue::Multi(vec!["A".into(), "B".into(), "C".into()]))
        );
        assert_eq!(host.params.get("port"), Some(&ParamValue::Single("2".into())));
    }

    #[test]
    fn groups_with_metadata() {
        let config = SshConfig::parse(&lines(
            r"
            #@host: some-host-info
            Host defaulthost
                hostname 2.2.3.3

            #-----------------------
            #@group: testgroup-1
            #@desc: this is description 1
            #@info: info line 1-1
            #@info: info line 1-2
            #-----------------------
            #@host: hostinfo1
            Host test1
                hostname 1.2.3.4

            #@group: testgroup-2
            Host test2
                hostname 4.3.2.1
            "
        ))
        .unwrap();

        let names: Vec<&str> = config.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["default", "testgroup-1", "testgroup-2"]);

        let g1 = &config.groups()[1];
        assert_eq!(g1.desc, "this is description 1");
        assert_eq!(g1.info, vec!["info line 1-1", "info line 1-2"]);
        assert_eq!(
            g1.hosts(),
            &[Host::new("test1", "testgroup-1")
                .with_info(["hostinfo1"])
                .with_params(params(&[("hostname", "1.2.3.4")]))]
        );
        assert_eq!(config.groups()[0].hosts()[0].group(), "default");
        assert_eq!(config.groups()[2].hosts()[0].group(), "testgroup-2");
    }

    #[test]
    fn config_options() {
        let config = SshConfig::parse(&lines(
            r"
            #@config: host-style=table
            #@config: broken
            #@config: something = nice
            "
        ))
        .unwrap();
        assert_eq!(config.opts.len(), 2);
        assert_eq!(config.opts["host-style"], "table");
        assert_eq!(config.opts["something"], "nice");
    }

    #[test]
    fn junk_is_skipped() {
        let config = SshConfig::parse(&lines(
            r"
            # an ordinary remark
            #@bogus: tag
            Host a
                justoneword
                user me
            "
        ))
        .unwrap();
        let host = &config.groups()[0].hosts()[0];
        assert_eq!(host.params, params(&[("user", "me")]));
    }

    #[test]
    fn globals_accepted_by_default() {
        let config = SshConfig::parse(&lines(
            r"
            User everyone
            ServerAliveInterval 30
            Host a
                hostname 1.1.1.1
            "
        ))
        .unwrap();
        assert_eq!(
            config.globals,
            params(&[("user", "everyone"), ("serveraliveinterval", "30")])
        );
        assert!(config.groups()[0].hosts()[0].params.get("user").is_none());
    }

    #[test]
    fn globals_rejected_in_strict_mode() {
        let parser = Parser::new(ParserOptions {
            globals: GlobalParams::Reject,
        });
        let err = parser
            .parse(&lines("\n# header\nUser everyone\nHost a\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ParamWithoutHost { line: 3, ref keyword } if keyword == "user"
        ));
        assert_contains!(err.to_string(), "line 3");

        // A well-formed file is fine in strict mode
        let _ = parser.parse(&lines("Host a\n  user me\n")).unwrap();
    }

    #[test]
    fn positions_follow_file_order() {
        let config = SshConfig::parse(&lines(
            r"
            Host p-*
            Host a
            #@group: other
            Host b
            Host q-*
            "
        ))
        .unwrap();
        let order: Vec<&str> = config.all_hosts().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(order, vec!["p-*", "a", "b", "q-*"]);
    }
}
