//! Host matching
// (c) 2024 Ross Younger

/// Shell-style glob match of a host name against a pattern host's name.
/// `*` matches any run of characters, `?` exactly one.
pub(super) fn pattern_matches(pattern: &str, host: &str) -> bool {
    wildmatch::WildMatch::new(pattern).matches(host)
}

///////////////////////////////////////////////////////////////////////////////////////
