// (c) 2024 Ross Younger
//! # The configuration engine
//!
//! Reads an OpenSSH client configuration file into a structured document, works out
//! which parameter values every host inherits, and writes the document back out.
//!
//! ## File format
//!
//! Plain `ssh_config(5)` syntax, plus metadata comments that ssh itself ignores:
//!
//! ```text
//! #@config: host-style=table
//!
//! #-------------------------------------------------------------------------------
//! #@group: web
//! #@desc: Public web tier
//! #@info: Managed by the platform team
//! #-------------------------------------------------------------------------------
//! #@host: Primary frontend
//! Host web-1 www
//!     hostname 10.1.1.20
//!
//! Host web-*
//!     user deploy
//! ```
//!
//! * `#@config: key=value` persists a tool option
//! * `#@group: name` starts a group; `#@desc:` and `#@info:` describe it
//! * `#@host: text` attaches a line of text to the next `Host`
//!
//! Everything before the first `#@group:` line belongs to the default group.
//! Parameter lines before the first `Host` are global parameters.
//! Any other comment is discarded when the file is rewritten.
//!
//! ## Usage
//!
//! ```
//! use sshc::ssh::SshConfig;
//! let text = "Host web-1\n    hostname 10.0.0.1\nHost web-*\n    user deploy\n";
//! let lines: Vec<&str> = text.lines().collect();
//! let config = SshConfig::parse(&lines).unwrap();
//! let host = config.get_host_by_name("web-1").unwrap();
//! assert_eq!(host.applied_str("user"), Some("deploy"));
//! let regenerated = config.generate();
//! assert!(regenerated.contains(&"    hostname 10.0.0.1\n".to_string()));
//! ```

mod errors;
pub use errors::ConfigError;

mod files;
pub use files::{ConfigFile, OutputMode};

mod inherit;
mod lines;
mod lookup;
pub use lookup::REGEX_PREFIX;

mod matching;

mod model;
pub use model::{
    Group, Host, HostType, ParamValue, Params, Source, SshConfig, DEFAULT_GROUP_DESC,
    DEFAULT_GROUP_NAME,
};

pub mod params;

mod parser;
pub use parser::{GlobalParams, Parser, ParserOptions};

mod writer;
pub use writer::{generate, GLOBALS_LINE, SIGNATURE_LINE};

///////////////////////////////////////////////////////////////////////////////////////
