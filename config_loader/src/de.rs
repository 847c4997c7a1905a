//! Serde helpers for Kconfig-shaped values.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a Kconfig bool.
///
/// Files yield real booleans, but `CONFIG_*` environment variables arrive as text,
/// so `y`/`n`, `true`/`false` and `1`/`0` are all accepted.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a Kconfig bool (y/n, true/false, 1/0)")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok(true),
                "n" | "no" | "false" | "0" | "" => Ok(false),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde::de::value::{BoolDeserializer, Error, I64Deserializer, StrDeserializer};

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "flag")]
        enabled: bool,
    }

    #[rstest]
    #[case("y", true)]
    #[case("Y", true)]
    #[case("true", true)]
    #[case("1", true)]
    #[case("n", false)]
    #[case("false", false)]
    #[case("0", false)]
    fn test_flag_from_text(#[case] text: &str, #[case] expected: bool) {
        let de = StrDeserializer::<Error>::new(text);
        assert_eq!(flag(de).unwrap(), expected);
    }

    #[test]
    fn test_flag_from_bool_and_int() {
        assert!(flag(BoolDeserializer::<Error>::new(true)).unwrap());
        assert!(!flag(I64Deserializer::<Error>::new(0)).unwrap());
        assert!(flag(I64Deserializer::<Error>::new(2)).is_err());
    }

    #[test]
    fn test_flag_rejects_garbage() {
        let de = StrDeserializer::<Error>::new("sometimes");
        assert!(flag(de).is_err());
    }

    #[test]
    fn test_flag_defaults_to_false_when_absent() {
        use serde::de::value::MapDeserializer;
        let empty: Vec<(&str, bool)> = Vec::new();
        let flags = Flags::deserialize(MapDeserializer::<_, Error>::new(empty.into_iter())).unwrap();
        assert!(!flags.enabled);
    }
}
