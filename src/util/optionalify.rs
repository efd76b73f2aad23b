//! Derives an all-`Option` twin of a settings struct
// (c) 2024 Ross Younger

#![allow(meta_variable_misuse)] // false positives in these macro definitions

use derive_deftly::define_derive_deftly;
use figment::value::{Dict, Value};

/// Adds `value` to `dict` under `key`, but only if the user supplied one.
pub fn insert_if_some<T>(dict: &mut Dict, key: &str, value: Option<T>) -> Result<(), figment::Error>
where
    T: serde::Serialize,
{
    if let Some(v) = value {
        let _ = dict.insert(key.to_owned(), Value::serialize(v)?);
    }
    Ok(())
}

define_derive_deftly! {
    /// Generates `{Name}_Optional`: the same struct, every field wrapped in `Option`,
    /// with `Default` derived and a [`figment::Provider`](https://docs.rs/figment/latest/figment/trait.Provider.html)
    /// implementation that yields only the fields which are `Some`.
    ///
    /// Used for command-line overrides: clap fills in what the user typed, everything else stays
    /// `None`, and merging the result over the lower layers changes only what was typed.
    ///
    /// All attributes written _after_ `#[derive_deftly(Optionalify)]` are copied to the new struct.
    /// Options:
    /// * `#[deftly(already_has_default)]` if the original already derives `Default`
    /// * `#[deftly(visibility = "...")]` to override the generated struct's visibility
    ///
    /// Use `#[derive_deftly(Optionalify[dbg])]` to see the expansion.
    export Optionalify for struct, expect items:
    ${define OPTIONAL_TYPE ${paste $tdeftype _Optional}}

    /// Auto-derived struct variant with every field optional
    #[allow(non_camel_case_types)]
    ${tattrs}
    ${if not(tmeta(already_has_default)){
        #[derive(Default)]
    }}
    ${if tmeta(visibility) {
        ${tmeta(visibility) as token_stream}
    } else {
        ${tvis}
    }}
    struct $OPTIONAL_TYPE {
        $(
            ${fattrs}
            ${fvis} $fname: Option<$ftype>,
        )
    }

    impl figment::Provider for $OPTIONAL_TYPE {
        fn metadata(&self) -> figment::Metadata {
            // Reported as the source of a value, e.g. in --show-config
            figment::Metadata::named("command line").interpolater(|_profile, path| {
                use heck::ToKebabCase;
                let key = path.last().map_or("<unknown>".to_owned(), |s| s.to_kebab_case());
                format!("--{key}")
            })
        }

        fn data(&self) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
            use $crate::util::insert_if_some;
            use figment::{Profile, value::{Dict, Map}};
            let mut dict = Dict::new();
            $(
                insert_if_some(&mut dict, stringify!($fname), self.${fname}.clone())?;
            )
            let mut profiles = Map::new();
            let _ = profiles.insert(Profile::Global, dict);
            Ok(profiles)
        }
    }
}

#[allow(clippy::module_name_repetitions)]
pub use derive_deftly_template_Optionalify;

#[cfg(test)]
mod test {
    use super::derive_deftly_template_Optionalify;
    use derive_deftly::Deftly;
    use figment::{providers::Serialized, Figment, Provider as _};

    #[derive(Deftly)]
    #[derive_deftly(Optionalify)]
    #[deftly(already_has_default)]
    #[derive(PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
    struct Settings {
        path: String,
        flag: bool,
        level: Option<u8>,
    }

    #[test]
    fn only_entered_fields_override() {
        let base = Settings {
            path: "/base".into(),
            flag: true,
            level: Some(1),
        };
        let entered = Settings_Optional {
            flag: Some(false),
            ..Default::default()
        };
        let merged: Settings = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(entered)
            .extract()
            .unwrap();
        assert_eq!(
            merged,
            Settings {
                path: "/base".into(),
                flag: false,
                level: Some(1),
            }
        );
    }

    #[test]
    fn provider_names_its_source() {
        let entered = Settings_Optional::default();
        assert_eq!(entered.metadata().name, "command line");
        let data = entered.data().unwrap();
        assert!(data.values().all(figment::value::Dict::is_empty));
    }
}
