//! Registry of known ssh client parameters
// (c) 2024 Ross Younger
//!
//! Nothing here validates a value; the table drives completion hints, warnings for
//! unfamiliar keywords and the multi-value rule.

const YES_NO: &[&str] = &["no", "yes"];

/// Every ssh_config(5) keyword we know about, in canonical spelling, with its
/// documented choices where the keyword takes one of a fixed set.
pub const KNOWN_PARAMS: &[(&str, Option<&[&str]>)] = &[
    ("AddKeysToAgent", Some(&["no", "yes", "confirm", "ask"])),
    ("AddressFamily", Some(&["any", "inet", "inet6"])),
    ("BatchMode", Some(YES_NO)),
    ("BindAddress", None),
    ("BindInterface", None),
    ("CASignatureAlgorithms", None),
    ("CertificateFile", None),
    ("CheckHostIP", Some(YES_NO)),
    ("Ciphers", None),
    ("ClearAllForwardings", Some(YES_NO)),
    ("Compression", Some(YES_NO)),
    ("ConnectionAttempts", None),
    ("ConnectTimeout", None),
    ("ControlMaster", Some(&["no", "yes", "ask", "auto", "autoask"])),
    ("ControlPath", None),
    ("ControlPersist", None),
    ("DynamicForward", None),
    ("EscapeChar", None),
    ("ExitOnForwardFailure", Some(YES_NO)),
    ("FingerprintHash", Some(&["sha256", "md5"])),
    ("ForkAfterAuthentication", Some(YES_NO)),
    ("ForwardAgent", Some(YES_NO)),
    ("ForwardX11", Some(YES_NO)),
    ("ForwardX11Timeout", None),
    ("ForwardX11Trusted", Some(YES_NO)),
    ("GatewayPorts", Some(YES_NO)),
    ("HostbasedAcceptedAlgorithms", None),
    ("HostbasedAuthentication", Some(YES_NO)),
    ("HostKeyAlgorithms", None),
    ("HostKeyAlias", None),
    ("HostName", None),
    ("IdentitiesOnly", Some(YES_NO)),
    ("IdentityAgent", None),
    ("IdentityFile", None),
    ("KexAlgorithms", None),
    ("LocalCommand", None),
    ("LocalForward", None),
    (
        "LogLevel",
        Some(&[
            "QUIET", "FATAL", "ERROR", "INFO", "VERBOSE", "DEBUG", "DEBUG1", "DEBUG2", "DEBUG3",
        ]),
    ),
    ("MACs", None),
    ("PasswordAuthentication", Some(&["yes", "no"])),
    ("PermitLocalCommand", Some(YES_NO)),
    ("Port", None),
    ("PreferredAuthentications", None),
    ("ProxyCommand", None),
    ("ProxyJump", None),
    ("RemoteCommand", None),
    ("RemoteForward", None),
    ("RequestTTY", Some(&["no", "yes", "force", "auto"])),
    ("SendEnv", None),
    ("ServerAliveCountMax", None),
    ("ServerAliveInterval", None),
    ("SetEnv", None),
    ("StrictHostKeyChecking", Some(&["ask", "yes", "accept-new", "no", "off"])),
    ("TCPKeepAlive", Some(&["yes", "no"])),
    ("UpdateHostKeys", Some(&["yes", "no", "ask"])),
    ("User", None),
    ("UserKnownHostsFile", None),
];

/// Keywords which may legitimately repeat within one block. Lowercase.
pub const MULTI_VALUED_PARAMS: &[&str] = &["localforward", "remoteforward", "dynamicforward"];

/// Whether a keyword accumulates into a list rather than overwriting
#[must_use]
pub fn is_multi_valued(keyword: &str) -> bool {
    MULTI_VALUED_PARAMS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(keyword))
}

fn lookup(keyword: &str) -> Option<&'static (&'static str, Option<&'static [&'static str]>)> {
    KNOWN_PARAMS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
}

/// Whether this is a keyword we recognise
#[must_use]
pub fn is_known(keyword: &str) -> bool {
    lookup(keyword).is_some()
}

/// The documented spelling of a keyword, e.g. `hostname` -> `HostName`
#[must_use]
pub fn canonical_name(keyword: &str) -> Option<&'static str> {
    lookup(keyword).map(|(name, _)| *name)
}

/// The fixed set of documented choices for a keyword, if it has one
#[must_use]
pub fn allowed_values(keyword: &str) -> Option<&'static [&'static str]> {
    lookup(keyword).and_then(|(_, values)| *values)
}
