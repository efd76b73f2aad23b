//! Regenerates file text from the document model
// (c) 2024 Ross Younger
//!
//! The output is what [`Parser`](super::Parser) expects to read back; every line
//! (including the last) carries its trailing newline. The same model always produces
//! the same bytes: groups, hosts and parameters are written in the order the model holds them.

use std::fmt::Write as _;

use super::{
    lines::MetaTag,
    model::{Host, ParamValue, SshConfig},
};

/// First line of every file we write
pub const SIGNATURE_LINE: &str = "#<<<<< SSH Config file managed by sshc >>>>>\n";
/// Introduces the global parameter block
pub const GLOBALS_LINE: &str = "#<<<<< Global values >>>>>\n";

const INDENT: &str = "    ";
const RULE_WIDTH: usize = 79;

fn meta(tag: MetaTag, value: &str) -> String {
    format!("#@{tag}: {value}\n")
}

fn rule() -> String {
    format!("#{}\n", "-".repeat(RULE_WIDTH))
}

fn param_lines(out: &mut Vec<String>, indent: &str, keyword: &str, value: &ParamValue) {
    out.extend(value.iter().map(|v| {
        // `keyword =x` would read back as `x`
        let sep = if v.starts_with('=') { " = " } else { " " };
        format!("{indent}{keyword}{sep}{v}\n")
    }));
}

/// `#@tag: ` with nothing after it reads back as an ordinary comment
fn info_lines(tag: MetaTag, info: &[String]) -> impl Iterator<Item = String> + '_ {
    info.iter().filter(|i| !i.trim().is_empty()).map(move |i| meta(tag, i))
}

fn host_lines(out: &mut Vec<String>, host: &Host) {
    out.extend(info_lines(MetaTag::Host, &host.info));
    let mut line = format!("Host {}", host.name);
    for alt in &host.alt_names {
        let _ = write!(line, " {alt}");
    }
    line.push('\n');
    out.push(line);
    for (keyword, value) in host.params.iter() {
        param_lines(out, INDENT, keyword, value);
    }
    out.push("\n".into());
}

/// Generates the complete file text, one entry per line
#[must_use]
pub fn generate(config: &SshConfig) -> Vec<String> {
    let mut out = vec![SIGNATURE_LINE.to_owned()];
    out.extend(
        config
            .opts
            .iter()
            .map(|(k, v)| meta(MetaTag::Config, &format!("{k}={v}"))),
    );
    out.push("\n".into());

    if !config.globals.is_empty() {
        out.push(GLOBALS_LINE.into());
        for (keyword, value) in config.globals.iter() {
            param_lines(&mut out, "", keyword, value);
        }
        out.push("\n".into());
    }

    for group in config.groups() {
        if !group.is_default() {
            out.push("\n".into());
            out.push(rule());
            out.push(meta(MetaTag::Group, &group.name));
            if !group.desc.is_empty() {
                out.push(meta(MetaTag::Desc, &group.desc));
            }
            out.extend(info_lines(MetaTag::Info, &group.info));
            out.push(rule());
        }
        for host in group.all() {
            host_lines(&mut out, host);
        }
    }
    out
}

impl SshConfig {
    /// Convenience wrapper for [`generate`]
    #[must_use]
    pub fn generate(&self) -> Vec<String> {
        generate(self)
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use assertables::assert_contains;

    use super::{generate, SIGNATURE_LINE};
    use crate::ssh::model::{Group, Host, SshConfig};

    fn text(config: &SshConfig) -> String {
        generate(config).concat()
    }

    #[test]
    fn empty_config() {
        assert_eq!(generate(&SshConfig::default()), vec![SIGNATURE_LINE, "\n"]);
    }

    #[test]
    fn full_layout() {
        let input = r"
            #@config: host-style=table
            ForwardAgent no
            #@host: first
            Host a alt-a
                hostname 10.0.0.1
                LocalForward 1 x:1
                LocalForward 2 x:2
            #@group: web
            #@desc: web tier
            #@info: line 1
            Host w*
                user www
            Host w1
                port 8080
            ";
        let config = SshConfig::parse(&input.lines().collect::<Vec<_>>()).unwrap();
        let hrule = format!("#{}", "-".repeat(79));
        let expected = format!(
            "\
#<<<<< SSH Config file managed by sshc >>>>>
#@config: host-style=table

#<<<<< Global values >>>>>
forwardagent no

#@host: first
Host a alt-a
    hostname 10.0.0.1
    localforward 1 x:1
    localforward 2 x:2


{hrule}
#@group: web
#@desc: web tier
#@info: line 1
{hrule}
Host w1
    port 8080

Host w*
    user www

"
        );
        assert_eq!(text(&config), expected);
    }

    #[test]
    fn default_group_has_no_header() {
        let mut config = SshConfig::default();
        config.groups[0].desc = "changed".into();
        config.groups[0].info.push("some info".into());
        config.groups[0].push(Host::new("h", "default"));
        let out = text(&config);
        assert!(!out.contains("#@group"));
        assert!(!out.contains("#@desc"));
        assert!(!out.contains("#@info"));
        assert!(out.contains("Host h\n"));
    }

    #[test]
    fn group_without_desc() {
        let mut config = SshConfig::default();
        config.groups.push(Group::new("bare"));
        let out = text(&config);
        assert!(out.contains("#@group: bare\n"));
        assert!(!out.contains("#@desc"));
    }

    #[test]
    fn output_is_deterministic() {
        let mut config = SshConfig::default();
        let params = [("user", "u"), ("port", "1"), ("hostname", "h"), ("compression", "yes")];
        let host = Host::new("h", "default").with_params(params.into_iter().collect());
        config.groups[0].push(host);
        let _ = config.opts.insert("z".into(), "1".into());
        let _ = config.opts.insert("a".into(), "2".into());
        let first = generate(&config);
        for _ in 0..5 {
            assert_eq!(generate(&config.clone()), first);
        }
        let params: Vec<&str> = first
            .iter()
            .filter(|l| l.starts_with("    "))
            .map(|l| l.trim())
            .collect();
        assert_eq!(params, vec!["user u", "port 1", "hostname h", "compression yes"]);
    }

    #[test]
    fn parameters_keep_file_order() {
        let input = ["Host h", "    User u", "    Port 22", "    HostName h.example"];
        let config = SshConfig::parse(&input).unwrap();
        let out = text(&config);
        assert_contains!(out, "Host h\n    user u\n    port 22\n    hostname h.example\n");

        let mut config = config;
        let host = config.host_mut("h").unwrap();
        let _ = host.params.unset("user");
        let _ = host.params.set("compression", "yes");
        assert_contains!(
            text(&config),
            "    port 22\n    hostname h.example\n    compression yes\n"
        );
    }

    #[test]
    fn value_starting_with_equals() {
        let config = SshConfig::parse(&["Host h", "    SetEnv = =x", "    User =root"]).unwrap();
        let out = generate(&config);
        assert!(out.contains(&"    setenv = =x\n".to_owned()));
        assert!(out.contains(&"    user root\n".to_owned()));

        let again = SshConfig::parse(&out).unwrap();
        assert_eq!(config, again);
        assert_eq!(again.generate(), out);
    }

    #[test]
    fn blank_info_lines_are_not_written() {
        let mut config = SshConfig::default();
        let host = Host::new("h", "default").with_info(["", "x", "  "]);
        config.groups[0].push(host);
        let mut group = Group::new("g").with_info(["", "about g"]);
        group.push(Host::new("k", "g"));
        config.groups.push(group);

        let out = text(&config);
        assert!(!out.contains("#@host: \n"));
        assert!(!out.contains("#@info: \n"));

        let again = SshConfig::parse(&generate(&config)).unwrap();
        assert_eq!(again.get_host_by_name("h").unwrap().info, ["x"]);
        assert_eq!(again.get_group_by_name("g").unwrap().info, ["about g"]);
        assert_eq!(again.generate(), generate(&config));
    }
}
