//! read and write contracts shared by all key spaces
//!
//! [Configuration] is implemented by [crate::store::PropertyStore],
//! [crate::hierarchy::HierarchicalConfiguration] and [Subset]. Implementors provide
//! raw access ([Lookup]) and key listing; typed, interpolated getters are provided.
//!
//! Missing keys follow [Options::throw_on_missing]: getters without a default
//! return `Ok(None)` (or an empty collection) unless the option is set, in which
//! case they fail with [ConfigError::MissingKey].
use crate::convert::FromScalar;
use crate::error::ConfigError;
use crate::interpolate::{Interpolator, Lookup};
use crate::options::Options;
use crate::value::{Scalar, Value};
use indexmap::IndexMap;
use std::borrow::Cow;

pub trait Configuration: Lookup {
    fn contains_key(&self, key: &str) -> bool;

    /// A fresh listing of all present keys
    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_>;

    /// Keys equal to `prefix` or below `prefix.`
    fn keys_with_prefix(&self, prefix: &str) -> Box<dyn Iterator<Item = String> + '_> {
        let nested = format!("{prefix}.");
        let prefix = prefix.to_string();
        Box::new(
            self.keys()
                .filter(move |key| *key == prefix || key.starts_with(&nested)),
        )
    }

    fn is_empty(&self) -> bool;

    fn options(&self) -> &Options;

    /// Interpolator resolving markers against this key space
    fn interpolator(&self) -> Interpolator<'_>;

    fn interpolate(&self, scalar: &Scalar) -> Result<Scalar, ConfigError> {
        self.interpolator().resolve(scalar)
    }

    /// First value of `key`, interpolated and converted
    fn get_typed<T: FromScalar>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        Self: Sized,
    {
        match first_as(self, key)? {
            Some(value) => Ok(Some(value)),
            None => missing(self.options(), key),
        }
    }

    fn get_typed_or<T: FromScalar>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        Self: Sized,
    {
        Ok(first_as(self, key)?.unwrap_or(default))
    }

    /// All values of `key`, each interpolated
    fn get_string_list(&self, key: &str) -> Result<Vec<String>, ConfigError>
    where
        Self: Sized,
    {
        match all_strings(self, key)? {
            Some(values) => Ok(values),
            None => Ok(missing(self.options(), key)?.unwrap_or_default()),
        }
    }

    fn get_string_list_or(&self, key: &str, default: Vec<String>) -> Result<Vec<String>, ConfigError>
    where
        Self: Sized,
    {
        Ok(all_strings(self, key)?.unwrap_or(default))
    }

    /// Values of `key` read as `name=value` pairs
    ///
    /// Empty values are skipped. A value without `=` is a format error.
    fn get_properties(&self, key: &str) -> Result<IndexMap<String, String>, ConfigError>
    where
        Self: Sized,
    {
        let Some(values) = all_strings(self, key)? else {
            return Ok(missing(self.options(), key)?.unwrap_or_default());
        };

        let mut properties = IndexMap::new();
        for token in values.iter().filter(|token| !token.is_empty()) {
            let Some((name, value)) = token.split_once('=') else {
                return Err(ConfigError::Format {
                    key: key.to_string(),
                    expected: "properties",
                    reason: format!("'{token}' does not contain an equals sign"),
                });
            };
            properties.insert(name.trim().to_string(), value.trim().to_string());
        }

        Ok(properties)
    }

    /// View of the keys below `prefix.` with the prefix stripped
    fn subset(&self, prefix: &str) -> Subset<'_, Self>
    where
        Self: Sized,
    {
        Subset::new(self, prefix.to_string())
    }
}

/// Mutation contract
///
/// Read-only key spaces reject `add` and `set` with [ConfigError::Unsupported].
/// Clearing never fails.
pub trait ConfigurationMut: Configuration {
    fn add_property(&mut self, key: &str, value: Value) -> Result<(), ConfigError>;

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), ConfigError>;

    fn clear_property(&mut self, key: &str);
}

fn missing<T>(options: &Options, key: &str) -> Result<Option<T>, ConfigError> {
    if options.throw_on_missing {
        return Err(ConfigError::MissingKey(key.to_string()));
    }

    Ok(None)
}

fn first_as<C: Configuration, T: FromScalar>(
    config: &C,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(values) = config.lookup(key) else {
        return Ok(None);
    };
    let Some(first) = values.first() else {
        return Ok(None);
    };

    let resolved = config.interpolate(first)?;
    T::from_scalar(&resolved)
        .map(Some)
        .map_err(|err| err.for_key::<T>(key))
}

fn all_strings<C: Configuration>(config: &C, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(values) = config.lookup(key) else {
        return Ok(None);
    };

    values
        .iter()
        .map(|value| {
            let resolved = config.interpolate(value)?;
            String::from_scalar(&resolved).map_err(|err| err.for_key::<String>(key))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Keys of a parent key space below a prefix
///
/// Reads delegate to the parent with the full key; interpolation resolves against
/// the parent so markers can reach outside the subset.
#[derive(derive_new::new, Debug)]
pub struct Subset<'c, C> {
    parent: &'c C,
    prefix: String,
}

impl<C: Configuration> Subset<'_, C> {
    fn full_key(&self, key: &str) -> String {
        if key.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }
}

impl<C: Configuration> Lookup for Subset<'_, C> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, [Scalar]>> {
        self.parent.lookup(&self.full_key(key))
    }
}

impl<C: Configuration> Configuration for Subset<'_, C> {
    fn contains_key(&self, key: &str) -> bool {
        self.parent.contains_key(&self.full_key(key))
    }

    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        let nested = format!("{}.", self.prefix);
        Box::new(
            self.parent
                .keys()
                .filter_map(move |key| key.strip_prefix(&nested).map(str::to_string)),
        )
    }

    fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }

    fn options(&self) -> &Options {
        self.parent.options()
    }

    fn interpolator(&self) -> Interpolator<'_> {
        self.parent.interpolator()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::PropertyStore;
    use bigdecimal::BigDecimal;
    use num_bigint::BigInt;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn strict() -> PropertyStore {
        PropertyStore::with_options(Options::strict())
    }

    #[test]
    fn typed_getters_with_and_without_default() {
        let mut config = strict();
        config.set("number", "1");

        assert_eq!(config.get_typed::<i8>("number"), Ok(Some(1)));
        assert_eq!(config.get_typed_or::<i8>("number", 2), Ok(1));
        assert_eq!(config.get_typed_or::<i8>("numberNotInConfig", 2), Ok(2));
        assert_eq!(config.get_typed::<i16>("number"), Ok(Some(1)));
        assert_eq!(config.get_typed::<i32>("number"), Ok(Some(1)));
        assert_eq!(config.get_typed::<i64>("number"), Ok(Some(1)));
        assert_eq!(config.get_typed::<f32>("number"), Ok(Some(1.0)));
        assert_eq!(config.get_typed::<f64>("number"), Ok(Some(1.0)));
        assert_eq!(
            config.get_typed::<String>("number"),
            Ok(Some("1".to_string()))
        );
    }

    #[test]
    fn missing_key_in_strict_mode() {
        let config = strict();
        assert_eq!(
            config.get_typed::<i8>("numberNotInConfig"),
            Err(ConfigError::MissingKey("numberNotInConfig".to_string()))
        );
        assert_eq!(
            config.get_typed::<String>("stringNotInConfig"),
            Err(ConfigError::MissingKey("stringNotInConfig".to_string()))
        );
        assert!(matches!(
            config.get_string_list("nope"),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn missing_key_in_lenient_mode() {
        let config = PropertyStore::new();
        assert_eq!(config.get_typed::<bool>("nope"), Ok(None));
        assert_eq!(config.get_string_list("nope"), Ok(vec![]));
        assert_eq!(config.get_properties("nope"), Ok(IndexMap::new()));
    }

    #[test]
    fn incompatible_values_are_format_errors() {
        let mut config = strict();
        config.set("test.empty", "");

        for result in [
            config.get_typed::<i8>("test.empty").map(|_| ()),
            config.get_typed::<i16>("test.empty").map(|_| ()),
            config.get_typed::<i64>("test.empty").map(|_| ()),
            config.get_typed::<f32>("test.empty").map(|_| ()),
            config.get_typed::<f64>("test.empty").map(|_| ()),
            config.get_typed::<BigInt>("test.empty").map(|_| ()),
            config.get_typed::<BigDecimal>("test.empty").map(|_| ()),
            config.get_typed::<bool>("test.empty").map(|_| ()),
        ] {
            assert!(matches!(result, Err(ConfigError::Format { .. })), "{result:?}");
        }
    }

    #[test]
    fn opaque_value_is_a_type_mismatch() {
        let mut config = strict();
        let mut object = IndexMap::new();
        object.insert("nested", true);
        config.set("object", object);

        assert_eq!(
            config.get_typed::<bool>("object"),
            Err(ConfigError::TypeMismatch {
                key: "object".to_string(),
                expected: "boolean",
                found: "opaque",
            })
        );
    }

    #[test]
    fn big_numbers() {
        let mut config = strict();
        config.set("numberBigD", "123.456");
        config.set("numberBigI", "1234567890");

        assert_eq!(
            config.get_typed::<BigDecimal>("numberBigD"),
            Ok(Some(BigDecimal::from_str("123.456").unwrap()))
        );
        assert_eq!(
            config.get_typed::<BigInt>("numberBigI"),
            Ok(Some(BigInt::from(1234567890)))
        );
        assert_eq!(
            config.get_typed_or("numberNotInConfig", BigInt::from(654321)),
            Ok(BigInt::from(654321))
        );
    }

    #[test]
    fn boolean_value() {
        let mut config = strict();
        config.set("boolA", true);
        assert_eq!(config.get_typed::<bool>("boolA"), Ok(Some(true)));
        assert_eq!(config.get_typed_or("boolNotInConfig", false), Ok(false));
    }

    #[test]
    fn hexadecimal_values() {
        let mut config = strict();
        config.set("number", "0xFF");
        assert_eq!(config.get_typed::<i8>("number"), Ok(Some(-1)));

        config.set("number", "0xFFFFFFFFFFFFFFFF");
        assert_eq!(config.get_typed::<i64>("number"), Ok(Some(-1)));
    }

    #[test]
    fn first_value_of_multi_valued_slots() {
        let mut config = strict();
        config.add("number", "1");
        config.add("number", "2");
        config.add("array.int", [1i32, 2]);
        config.add("array.double", [1.0f64, 2.0]);

        assert_eq!(config.get_string_list("number"), Ok(vec!["1".into(), "2".into()]));
        assert_eq!(config.get_typed::<String>("number"), Ok(Some("1".to_string())));
        assert_eq!(config.get_typed::<i32>("array.int"), Ok(Some(1)));
        assert_eq!(config.get_typed::<f64>("array.double"), Ok(Some(1.0)));
    }

    #[test]
    fn string_list_interpolates_every_value() {
        let mut config = strict();
        config.add("number", "1");
        config.add("array", "${number}");
        config.add("array", "${number}");

        assert_eq!(config.get_string_list("array"), Ok(vec!["1".into(), "1".into()]));
        assert_eq!(
            config.get_string_list_or("nope", vec!["x".into()]),
            Ok(vec!["x".to_string()])
        );
    }

    #[test]
    fn interpolated_typed_values() {
        let mut config = strict();
        config.set("applicationRoot", "/home/applicationRoot");
        config.set("db", "${applicationRoot}/db/hypersonic");
        config.set("dbFailedInterpolate", "${applicationRoot2}/db/hypersonic");
        config.set("base", "4");
        config.set("limit", "${base}");

        assert_eq!(
            config.get_typed::<String>("db"),
            Ok(Some("/home/applicationRoot/db/hypersonic".to_string()))
        );
        assert_eq!(
            config.get_typed::<String>("dbFailedInterpolate"),
            Ok(Some("${applicationRoot2}/db/hypersonic".to_string()))
        );
        assert_eq!(config.get_typed::<i32>("limit"), Ok(Some(4)));
    }

    #[test]
    fn interpolation_loop_is_reported() {
        let mut config = strict();
        config.set("test.a", "${test.b}");
        config.set("test.b", "${test.a}");

        assert!(matches!(
            config.get_typed::<String>("test.a"),
            Err(ConfigError::InterpolationCycle { .. })
        ));
        assert!(matches!(
            config.get_typed::<String>("test.b"),
            Err(ConfigError::InterpolationCycle { .. })
        ));
    }

    #[test]
    fn properties() {
        let mut config = strict();
        config.set("prop.properties", "");
        assert_eq!(config.get_properties("prop.properties"), Ok(IndexMap::new()));

        config.set("prop.properties", "foo=bar, baz=moo, seal=clubber");
        let properties = config.get_properties("prop.properties").unwrap();
        assert_eq!(
            properties.into_iter().collect::<Vec<_>>(),
            vec![
                ("foo".to_string(), "bar".to_string()),
                ("baz".to_string(), "moo".to_string()),
                ("seal".to_string(), "clubber".to_string()),
            ]
        );

        config.set("prop.broken", "foo");
        assert!(matches!(
            config.get_properties("prop.broken"),
            Err(ConfigError::Format { expected: "properties", .. })
        ));
    }

    #[test]
    fn subset_strips_prefix() {
        let mut config = strict();
        config.set("prop.string", r"hey\, that's a test");
        config.set("property.string", "hello");

        let subset = config.subset("prop");
        assert_eq!(
            subset.get_typed::<String>("string"),
            Ok(Some("hey, that's a test".to_string()))
        );
        assert_eq!(subset.keys().collect::<Vec<_>>(), vec!["string"]);
        assert!(subset.contains_key("string"));

        let subset = config.subset("prop.");
        assert!(subset.is_empty());
    }

    #[test]
    fn subset_interpolates_against_parent() {
        let mut config = strict();
        config.set("root", "/srv");
        config.set("db.path", "${root}/db");

        let subset = config.subset("db");
        assert_eq!(
            subset.get_typed::<String>("path"),
            Ok(Some("/srv/db".to_string()))
        );
        assert!(matches!(
            subset.get_typed::<String>("root"),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn keys_with_prefix() {
        let mut config = PropertyStore::new();
        for key in ["a", "a.b", "ab", "a.b.c", "b"] {
            config.set(key, "x");
        }

        assert_eq!(
            config.keys_with_prefix("a").collect::<Vec<_>>(),
            vec!["a", "a.b", "a.b.c"]
        );
    }

    #[test]
    fn mutation_contract() {
        let mut config = PropertyStore::new();
        config.add_property("k", "1".into()).unwrap();
        config.set_property("k", "2".into()).unwrap();
        assert_eq!(config.get_typed::<i32>("k"), Ok(Some(2)));

        config.clear_property("k");
        assert!(!config.contains_key("k"));
    }
}
