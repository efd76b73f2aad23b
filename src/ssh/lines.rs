//! Line classification
// (c) 2024 Ross Younger

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `#@tag: value`, relaxed: any run of whitespace and `@` before the tag,
    /// any run of whitespace and `:` after it.
    static ref META_RE: Regex = Regex::new(r"^#[\s@]*(\w+)[\s:]+(.+)$").unwrap();
    /// `Keyword value` or `Keyword = value`
    static ref KEYWORD_RE: Regex = Regex::new(r"^(\w+)(?:\s*=\s*|\s+)(.+)$").unwrap();
}

/// The metadata tags we understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(super) enum MetaTag {
    /// Persisted tool option, `key=value`
    Config,
    /// Starts a new group
    Group,
    /// Description of the active group
    Desc,
    /// Info line for the active group
    Info,
    /// Info line for the next host
    Host,
}

#[derive(Debug, PartialEq)]
/// A classified line from an ssh config file
pub(super) enum Line {
    Empty,
    /// A comment with no metadata shape; dropped
    Comment,
    Meta {
        tag: MetaTag,
        value: String,
    },
    /// Looked like metadata, but the tag is not one of ours
    UnknownMeta {
        tag: String,
    },
    Host {
        names: Vec<String>,
    },
    Generic {
        keyword: String, /*lowercase!*/
        value: String,
    },
    /// Not blank, not a comment, not `keyword value`
    Invalid,
}

/// Classifies a single raw line. The line need not be trimmed or newline-free.
pub(super) fn classify(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if line.starts_with('#') {
        let Some(caps) = META_RE.captures(line) else {
            return Line::Comment;
        };
        let tag = &caps[1];
        let value = caps[2].to_owned();
        return match tag.parse::<MetaTag>() {
            Ok(tag) => Line::Meta { tag, value },
            Err(_) => Line::UnknownMeta {
                tag: tag.to_owned(),
            },
        };
    }
    let Some(caps) = KEYWORD_RE.captures(line) else {
        return Line::Invalid;
    };
    let keyword = caps[1].to_lowercase();
    let value = &caps[2];
    if keyword == "host" {
        Line::Host {
            names: value.split_whitespace().map(ToOwned::to_owned).collect(),
        }
    } else {
        Line::Generic {
            keyword,
            value: value.to_owned(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////
