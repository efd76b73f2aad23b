//! Configuration layering
// (c) 2024 Ross Younger

use super::Configuration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::Value,
    Figment, Metadata, Profile, Provider,
};
use serde::Deserialize;
use std::{collections::HashSet, fmt::Display, path::Path};
use struct_field_names_as_array::FieldNamesAsSlice;
use tabled::{settings::style::Style, Table, Tabled};

use tracing::trace;

use crate::os::{AbstractPlatform as _, Platform};

/// Prefix of environment variables we read settings from
pub(crate) const ENV_PREFIX: &str = "SSHC_";

// SYSTEM DEFAULTS //////////////////////////////////////////////////////////////////////////////////////////////

/// A `[https://docs.rs/figment/latest/figment/trait.Provider.html](figment::Provider)` that holds
/// our set of fixed system default options
#[derive(Default)]
struct SystemDefault {}

impl SystemDefault {
    const META_NAME: &str = "default";
}

impl Provider for SystemDefault {
    fn metadata(&self) -> Metadata {
        figment::Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(Configuration::default()).data()
    }
}

// CONFIG MANAGER /////////////////////////////////////////////////////////////////////////////////////////////

/// Processes and merges all possible configuration sources.
///
/// Later sources override earlier ones:
/// 1. Hard-wired defaults
/// 1. The user's settings file (`~/.sshc.toml` on Unix)
/// 1. Environment variables prefixed `SSHC_`
/// 1. Anything merged in with [`merge_provider`](Self::merge_provider), typically the command line
#[derive(Debug)]
pub struct Manager {
    /// Configuration data
    data: Figment,
}

fn add_user_config(f: Figment) -> Figment {
    let Some(path) = Platform::user_config_path() else {
        return f;
    };
    if !path.exists() {
        trace!("user configuration file {path:?} not present");
        return f;
    }
    f.merge(Toml::file(path.as_path()))
}

impl Default for Manager {
    /// Initialises this structure fully-empty (for new(), or testing)
    fn default() -> Self {
        Self {
            data: Figment::default(),
        }
    }
}

impl Manager {
    /// Initialises this structure, reading the user settings file and the environment.
    #[must_use]
    pub fn new() -> Self {
        let mut data = Figment::new().merge(SystemDefault::default());
        // N.B. This may leave data in a fused-error state, if a data file isn't parseable.
        data = add_user_config(data);
        data = data.merge(Env::prefixed(ENV_PREFIX));
        Self { data }
    }

    /// Returns the list of settings files we would read.
    ///
    /// This is a function of platform and the current user id.
    #[must_use]
    pub fn config_files() -> Vec<String> {
        Platform::user_config_path()
            .into_iter()
            .map(|p| p.into_os_string().to_string_lossy().into())
            .collect()
    }

    /// Testing/internal constructor, does not read files or the environment
    #[must_use]
    pub(crate) fn without_files() -> Self {
        let data = Figment::new().merge(SystemDefault::default());
        Self { data }
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    ///
    /// Within sshc, we use [`crate::util::derive_deftly_template_Optionalify`] to implement Provider for [Configuration].
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in a data set from a TOML file
    pub fn merge_toml_file<T>(&mut self, toml: T)
    where
        T: AsRef<Path>,
    {
        let path = toml.as_ref();
        let provider = Toml::file_exact(path);
        self.merge_provider(provider);
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// Within sshc, `T` is usually [Configuration], but it isn't intrinsically required to be.
    pub fn get<'de, T>(&self) -> anyhow::Result<T, figment::Error>
    where
        T: Deserialize<'de>,
    {
        self.data.extract::<T>()
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Tabled)]
struct SettingRow {
    setting: String,
    value: String,
    source: String,
}

/// Human-readable value of a setting
fn value_text(value: &Value) -> String {
    match value {
        Value::String(_, s) => s.clone(),
        Value::Bool(_, b) => b.to_string(),
        Value::Empty(..) => "<empty>".into(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

/// Where a setting came from: a file, or a provider name with the key as that provider spells it
fn source_text(meta: Option<&Metadata>, field: &str) -> String {
    let Some(meta) = meta else {
        return String::new();
    };
    match (&meta.source, meta.name.as_ref()) {
        (Some(source), _) => source.to_string(),
        (None, SystemDefault::META_NAME) => SystemDefault::META_NAME.into(),
        (None, name) => format!("{name} ({})", meta.interpolate(&Profile::Default, &[field])),
    }
}

/// Pretty-printing type wrapper to Manager
#[derive(Debug)]
pub struct DisplayAdapter<'a> {
    /// Data source
    source: &'a Manager,
    /// Whether to warn if unused fields are present
    warn_on_unused: bool,
    /// The fields we want to output, in declaration order
    fields: &'static [&'static str],
}

impl Manager {
    /// Creates a `DisplayAdapter` for this struct with the given options.
    ///
    /// # Returns
    /// An ephemeral structure implementing `Display`.
    #[must_use]
    pub fn to_display_adapter<'de, T>(&self, warn_on_unused: bool) -> DisplayAdapter<'_>
    where
        T: Deserialize<'de> + FieldNamesAsSlice,
    {
        DisplayAdapter {
            source: self,
            warn_on_unused,
            fields: T::FIELD_NAMES_AS_SLICE,
        }
    }
}

impl DisplayAdapter<'_> {
    /// One row per known setting, plus a warning for anything that could not be shown
    fn rows(&self) -> (Vec<SettingRow>, Vec<String>) {
        let figment = &self.source.data;
        let mut warnings = Vec::new();
        let mut rows = Vec::new();
        for field in self.fields {
            match figment.find_value(field) {
                Ok(value) => rows.push(SettingRow {
                    setting: (*field).to_owned(),
                    value: value_text(&value),
                    source: source_text(figment.find_metadata(field), field),
                }),
                Err(e) => warnings.push(format!("error on {field}: {e}")),
            }
        }
        if self.warn_on_unused {
            match figment.data() {
                Ok(data) => {
                    let known: HashSet<&str> = self.fields.iter().copied().collect();
                    let unused = data
                        .values()
                        .flat_map(|dict| dict.keys())
                        .filter(|k| !known.contains(k.as_str()))
                        .collect::<HashSet<_>>();
                    for key in unused {
                        let source = source_text(figment.find_metadata(key), key);
                        warnings.push(format!("unrecognised setting `{key}` in {source}"));
                    }
                }
                // This isn't terribly helpful as it doesn't have metadata attached; BUT attempting to get() a struct does.
                Err(e) => warnings.push(e.to_string()),
            }
        }
        (rows, warnings)
    }
}

impl Display for DisplayAdapter<'_> {
    /// Formats the settings relevant to the chosen struct, with where each value came from.
    ///
    /// Problems are reported on stderr, using CLI styling.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::cli::styles::WARNING;

        let (rows, warnings) = self.rows();
        for w in warnings {
            anstream::eprintln!("{WARNING}WARNING{WARNING:#}: {w}");
        }
        write!(f, "{}", Table::new(rows).with(Style::sharp()))
    }
}
