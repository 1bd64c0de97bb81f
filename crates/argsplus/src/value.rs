//! Conversion of raw tokens into typed values.
//!
//! Every converter is all-or-nothing: the whole token must be consumed.
//! Trailing characters, surrounding whitespace, or a lexical failure all
//! produce a [`ConversionError`].

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::ConversionError;

/// Turns a raw token into a value of type [`ValueConverter::Value`].
pub trait ValueConverter {
    type Value;

    fn convert(&self, raw: &str) -> Result<Self::Value, ConversionError>;
}

/// `true`/`false`, or `1`/`0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl ValueConverter for Boolean {
    type Value = bool;

    fn convert(&self, raw: &str) -> Result<bool, ConversionError> {
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConversionError::new(raw, "boolean")),
        }
    }
}

/// Signed or unsigned integer of any primitive width.
pub struct Integer<T>(PhantomData<fn() -> T>);

/// `f32` or `f64`. Only finite values are accepted; `inf` and `NaN` are rejected.
pub struct Float<T>(PhantomData<fn() -> T>);

macro_rules! marker_impls {
    ($name:ident) => {
        impl<T> $name<T> {
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}<{}>", stringify!($name), type_name::<T>())
            }
        }
    };
}

marker_impls!(Integer);
marker_impls!(Float);

macro_rules! integer_converters {
    ($($t:ty),* $(,)?) => {
        $(
            impl ValueConverter for Integer<$t> {
                type Value = $t;

                fn convert(&self, raw: &str) -> Result<$t, ConversionError> {
                    raw.parse::<$t>()
                        .map_err(|_| ConversionError::new(raw, "integer"))
                }
            }
        )*
    };
}

integer_converters!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_converters {
    ($($t:ty),* $(,)?) => {
        $(
            impl ValueConverter for Float<$t> {
                type Value = $t;

                fn convert(&self, raw: &str) -> Result<$t, ConversionError> {
                    raw.parse::<$t>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| ConversionError::new(raw, "number"))
                }
            }
        )*
    };
}

float_converters!(f32, f64);

/// Identity conversion; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl ValueConverter for Text {
    type Value = String;

    fn convert(&self, raw: &str) -> Result<String, ConversionError> {
        Ok(raw.to_string())
    }
}

/// Any [`FromStr`] type.
pub struct Parsed<T> {
    expected: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Parsed<T> {
    /// Errors report the type name as the expected kind.
    pub fn new() -> Self {
        Self::named(type_name::<T>())
    }

    /// Errors report `expected` as the expected kind (e.g. "color").
    pub fn named(expected: &'static str) -> Self {
        Self {
            expected,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Parsed<T> {
    fn clone(&self) -> Self {
        Self::named(self.expected)
    }
}

impl<T> fmt::Debug for Parsed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsed")
            .field("expected", &self.expected)
            .finish()
    }
}

impl<T: FromStr> ValueConverter for Parsed<T> {
    type Value = T;

    fn convert(&self, raw: &str) -> Result<T, ConversionError> {
        raw.parse::<T>()
            .map_err(|_| ConversionError::new(raw, self.expected))
    }
}

/// Converter backed by a closure. Build with [`from_fn`].
#[derive(Clone)]
pub struct FnConverter<F>(F);

impl<F> fmt::Debug for FnConverter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnConverter")
    }
}

impl<T, F> ValueConverter for FnConverter<F>
where
    F: Fn(&str) -> Result<T, ConversionError>,
{
    type Value = T;

    fn convert(&self, raw: &str) -> Result<T, ConversionError> {
        (self.0)(raw)
    }
}

/// Wrap a closure as a converter. The closure must reject partial input itself.
pub fn from_fn<T, F>(f: F) -> FnConverter<F>
where
    F: Fn(&str) -> Result<T, ConversionError>,
{
    FnConverter(f)
}

#[cfg(test)]
mod tests {
    use super::{Boolean, Float, Integer, Parsed, Text, ValueConverter, from_fn};
    use crate::error::ConversionError;

    #[test]
    fn boolean_accepts_words_and_digits() {
        assert_eq!(Boolean.convert("true"), Ok(true));
        assert_eq!(Boolean.convert("1"), Ok(true));
        assert_eq!(Boolean.convert("false"), Ok(false));
        assert_eq!(Boolean.convert("0"), Ok(false));
        assert!(Boolean.convert("yes").is_err());
        assert!(Boolean.convert("True").is_err());
        assert!(Boolean.convert("").is_err());
    }

    #[test]
    fn integer_requires_whole_string() {
        let conv = Integer::<i32>::new();
        assert_eq!(conv.convert("42"), Ok(42));
        assert_eq!(conv.convert("-42"), Ok(-42));

        let err = conv.convert("42abc").unwrap_err();
        assert_eq!(err.raw(), "42abc");
        assert_eq!(err.expected(), "integer");

        assert!(conv.convert(" 42").is_err());
        assert!(conv.convert("42 ").is_err());
        assert!(conv.convert("").is_err());
    }

    #[test]
    fn unsigned_rejects_negative_and_overflow() {
        assert_eq!(Integer::<u32>::new().convert("17"), Ok(17));
        assert!(Integer::<u32>::new().convert("-1").is_err());
        assert!(Integer::<u8>::new().convert("256").is_err());
    }

    #[test]
    fn float_parses_and_rejects_garbage() {
        let conv = Float::<f64>::new();
        assert_eq!(conv.convert("3.5"), Ok(3.5));
        assert_eq!(conv.convert("-1e3"), Ok(-1000.0));
        assert!(conv.convert("3.5.1").is_err());
        assert!(conv.convert("3.5x").is_err());
        assert_eq!(Float::<f32>::new().convert("0.25"), Ok(0.25f32));
    }

    #[test]
    fn float_rejects_non_finite() {
        let conv = Float::<f64>::new();
        for raw in ["inf", "-inf", "infinity", "NaN", "nan", "1e400"] {
            assert!(conv.convert(raw).is_err(), "{raw} should be rejected");
        }
        assert!(Float::<f32>::new().convert("1e39").is_err());
    }

    #[test]
    fn text_is_identity() {
        assert_eq!(Text.convert(""), Ok(String::new()));
        assert_eq!(Text.convert(" spaced out "), Ok(" spaced out ".to_string()));
    }

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    impl std::str::FromStr for Color {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, ()> {
            match s {
                "red" => Ok(Color::Red),
                "blue" => Ok(Color::Blue),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn parsed_uses_from_str() {
        let conv = Parsed::<Color>::named("color");
        assert_eq!(conv.convert("blue"), Ok(Color::Blue));
        assert_eq!(conv.convert("red"), Ok(Color::Red));
        let err = conv.convert("green").unwrap_err();
        assert_eq!(err.to_string(), "'green' is not a valid color");
    }

    #[test]
    fn closure_converter() {
        let conv = from_fn(|raw: &str| {
            let (w, h) = raw
                .split_once('x')
                .ok_or_else(|| ConversionError::new(raw, "WIDTHxHEIGHT"))?;
            let w = w.parse::<u32>().map_err(|_| ConversionError::new(raw, "WIDTHxHEIGHT"))?;
            let h = h.parse::<u32>().map_err(|_| ConversionError::new(raw, "WIDTHxHEIGHT"))?;
            Ok((w, h))
        });
        assert_eq!(conv.convert("640x480"), Ok((640, 480)));
        assert!(conv.convert("640x").is_err());
    }
}
