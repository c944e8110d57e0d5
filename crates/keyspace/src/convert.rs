//! scalar to primitive conversions
//!
//! [FromScalar] is implemented for every type the typed getters of
//! [crate::configuration::Configuration] can return.
//!
//! Rules:
//! - text is parsed; integers additionally accept a `0x`/`0X` hexadecimal literal
//!   whose bit pattern is kept (`0xFF` as `i8` is `-1`)
//! - numeric scalars convert into each other when the value fits
//! - a scalar of the wrong kind (e.g. an opaque value read as boolean) is a mismatch
use crate::error::ConfigError;
use crate::value::Scalar;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use std::str::FromStr;

pub trait FromScalar: Sized {
    /// Human readable name of the target type
    const KIND: &'static str;

    fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("found {found}")]
    Mismatch { found: &'static str },
    #[error("{0}")]
    Format(String),
}

impl ConversionError {
    fn mismatch(scalar: &Scalar) -> Self {
        ConversionError::Mismatch {
            found: scalar.kind(),
        }
    }

    fn format(text: &str, reason: impl std::fmt::Display) -> Self {
        ConversionError::Format(format!("'{text}': {reason}"))
    }

    /// Attach the key that was read
    pub fn for_key<T: FromScalar>(self, key: &str) -> ConfigError {
        match self {
            ConversionError::Mismatch { found } => ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: T::KIND,
                found,
            },
            ConversionError::Format(reason) => ConfigError::Format {
                key: key.to_string(),
                expected: T::KIND,
                reason,
            },
        }
    }
}

fn out_of_range(scalar: &Scalar) -> ConversionError {
    ConversionError::Format(format!("{scalar} is out of range"))
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

impl FromScalar for bool {
    const KIND: &'static str = "boolean";

    fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
        match scalar {
            Scalar::Boolean(value) => Ok(*value),
            Scalar::Text(text) => parse_boolean(text),
            other => Err(ConversionError::mismatch(other)),
        }
    }
}

fn parse_boolean(text: &str) -> Result<bool, ConversionError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "t" => Ok(true),
        "false" | "no" | "off" | "n" | "f" => Ok(false),
        _ => Err(ConversionError::format(text, "expected true/false, yes/no or on/off")),
    }
}

macro_rules! integer_from_scalar {
    ($($signed:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl FromScalar for $signed {
                const KIND: &'static str = stringify!($signed);

                fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
                    match scalar {
                        Scalar::Text(text) => {
                            let trimmed = text.trim();
                            match strip_hex_prefix(trimmed) {
                                Some(hex) => <$unsigned>::from_str_radix(hex, 16)
                                    .map(|bits| bits as $signed)
                                    .map_err(|err| ConversionError::format(text, err)),
                                None => trimmed
                                    .parse::<$signed>()
                                    .map_err(|err| ConversionError::format(text, err)),
                            }
                        }
                        Scalar::I8(value) => {
                            <$signed>::try_from(*value).map_err(|_| out_of_range(scalar))
                        }
                        Scalar::I16(value) => {
                            <$signed>::try_from(*value).map_err(|_| out_of_range(scalar))
                        }
                        Scalar::I32(value) => {
                            <$signed>::try_from(*value).map_err(|_| out_of_range(scalar))
                        }
                        Scalar::I64(value) => {
                            <$signed>::try_from(*value).map_err(|_| out_of_range(scalar))
                        }
                        other => Err(ConversionError::mismatch(other)),
                    }
                }
            }
        )*
    };
}

integer_from_scalar! {
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
}

macro_rules! decimal_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                const KIND: &'static str = stringify!($ty);

                fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
                    match scalar {
                        Scalar::Text(text) => text
                            .trim()
                            .parse::<$ty>()
                            .map_err(|err| ConversionError::format(text, err)),
                        Scalar::I8(value) => Ok(*value as $ty),
                        Scalar::I16(value) => Ok(*value as $ty),
                        Scalar::I32(value) => Ok(*value as $ty),
                        Scalar::I64(value) => Ok(*value as $ty),
                        Scalar::F32(value) => Ok(*value as $ty),
                        Scalar::F64(value) => Ok(*value as $ty),
                        other => Err(ConversionError::mismatch(other)),
                    }
                }
            }
        )*
    };
}

decimal_from_scalar!(f32, f64);

impl FromScalar for BigInt {
    const KIND: &'static str = "big integer";

    fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
        match scalar {
            Scalar::Text(text) => {
                let trimmed = text.trim();
                match strip_hex_prefix(trimmed) {
                    Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16)
                        .ok_or_else(|| ConversionError::format(text, "invalid hexadecimal literal")),
                    None => BigInt::from_str(trimmed).map_err(|err| ConversionError::format(text, err)),
                }
            }
            Scalar::I8(value) => Ok(BigInt::from(*value)),
            Scalar::I16(value) => Ok(BigInt::from(*value)),
            Scalar::I32(value) => Ok(BigInt::from(*value)),
            Scalar::I64(value) => Ok(BigInt::from(*value)),
            other => Err(ConversionError::mismatch(other)),
        }
    }
}

impl FromScalar for BigDecimal {
    const KIND: &'static str = "big decimal";

    fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
        match scalar {
            Scalar::Text(text) => {
                BigDecimal::from_str(text.trim()).map_err(|err| ConversionError::format(text, err))
            }
            Scalar::I8(value) => Ok(BigDecimal::from(*value)),
            Scalar::I16(value) => Ok(BigDecimal::from(*value)),
            Scalar::I32(value) => Ok(BigDecimal::from(*value)),
            Scalar::I64(value) => Ok(BigDecimal::from(*value)),
            Scalar::F32(value) => BigDecimal::from_f32(*value).ok_or_else(|| out_of_range(scalar)),
            Scalar::F64(value) => BigDecimal::from_f64(*value).ok_or_else(|| out_of_range(scalar)),
            other => Err(ConversionError::mismatch(other)),
        }
    }
}

impl FromScalar for String {
    const KIND: &'static str = "string";

    fn from_scalar(scalar: &Scalar) -> Result<Self, ConversionError> {
        match scalar {
            Scalar::Opaque(_) => Err(ConversionError::mismatch(scalar)),
            other => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text<T: FromScalar>(value: &str) -> Result<T, ConversionError> {
        T::from_scalar(&Scalar::from(value))
    }

    #[test]
    fn decimal_integers() {
        assert_eq!(text::<i8>("1"), Ok(1));
        assert_eq!(text::<i16>(" -12 "), Ok(-12));
        assert_eq!(text::<i32>("1"), Ok(1));
        assert_eq!(text::<i64>("1"), Ok(1));
    }

    #[test]
    fn hexadecimal_keeps_bit_pattern() {
        assert_eq!(text::<i8>("0xFF"), Ok(-1));
        assert_eq!(text::<i16>("0xFFFF"), Ok(-1));
        assert_eq!(text::<i32>("0xFFFFFFFF"), Ok(-1));
        assert_eq!(text::<i64>("0xFFFFFFFFFFFFFFFF"), Ok(-1));
        assert_eq!(text::<i32>("0X10"), Ok(16));
    }

    #[test]
    fn hexadecimal_wider_than_type_is_a_format_error() {
        assert!(matches!(text::<i8>("0x1FF"), Err(ConversionError::Format(_))));
    }

    #[test]
    fn big_integer_hexadecimal_is_unsigned() {
        let value = text::<BigInt>("0xFFFFFFFFFFFFFFFF").unwrap();
        assert_eq!(value, BigInt::from(u64::MAX));
        assert_eq!(text::<BigInt>("1234567890"), Ok(BigInt::from(1234567890)));
    }

    #[test]
    fn big_decimal() {
        assert_eq!(
            text::<BigDecimal>("123.456"),
            Ok(BigDecimal::from_str("123.456").unwrap())
        );
        assert_eq!(
            BigDecimal::from_scalar(&Scalar::I32(5)),
            Ok(BigDecimal::from(5))
        );
    }

    #[test]
    fn empty_text_is_a_format_error() {
        assert!(matches!(text::<i8>(""), Err(ConversionError::Format(_))));
        assert!(matches!(text::<f64>(""), Err(ConversionError::Format(_))));
        assert!(matches!(text::<bool>(""), Err(ConversionError::Format(_))));
        assert!(matches!(text::<BigInt>(""), Err(ConversionError::Format(_))));
        assert!(matches!(text::<BigDecimal>(""), Err(ConversionError::Format(_))));
    }

    #[test]
    fn booleans() {
        assert_eq!(bool::from_scalar(&Scalar::Boolean(true)), Ok(true));
        assert_eq!(text::<bool>("TRUE"), Ok(true));
        assert_eq!(text::<bool>("off"), Ok(false));
        assert_eq!(text::<bool>("yes"), Ok(true));
    }

    #[test]
    fn wrong_kind_is_a_mismatch() {
        let opaque = Scalar::Opaque(Box::new(crate::value::Value::Null));
        assert_eq!(
            bool::from_scalar(&opaque),
            Err(ConversionError::Mismatch { found: "opaque" })
        );
        assert_eq!(
            i32::from_scalar(&Scalar::F64(1.5)),
            Err(ConversionError::Mismatch { found: "f64" })
        );
        assert_eq!(
            String::from_scalar(&opaque),
            Err(ConversionError::Mismatch { found: "opaque" })
        );
    }

    #[test]
    fn numeric_widening_and_narrowing() {
        assert_eq!(i64::from_scalar(&Scalar::I8(-3)), Ok(-3));
        assert_eq!(f64::from_scalar(&Scalar::I32(2)), Ok(2.0));
        assert!(matches!(
            i8::from_scalar(&Scalar::I64(300)),
            Err(ConversionError::Format(_))
        ));
    }

    #[test]
    fn strings_render_primitives() {
        assert_eq!(String::from_scalar(&Scalar::I16(4)), Ok("4".to_string()));
        assert_eq!(String::from_scalar(&Scalar::Boolean(false)), Ok("false".to_string()));
    }

    #[test]
    fn errors_carry_key_and_kind() {
        let err = text::<i32>("abc").unwrap_err().for_key::<i32>("number");
        assert!(matches!(
            err,
            ConfigError::Format { ref key, expected: "i32", .. } if key == "number"
        ));
    }
}
