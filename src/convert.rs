//! Conversion of raw command line tokens into typed values.
//!
//! Every parameter accumulates a list of raw string tokens during token
//! assignment. This module turns that list into the value type declared at
//! registration: integers with base auto-detection, floats, booleans toggled
//! by flag presence, verbatim strings, element-wise converted sequences, and
//! integers with an explicit numeric base.

use std::num::IntErrorKind;

use crate::error::ConversionError;

/// Integer wrapper carrying the numeric base its tokens are parsed with.
///
/// The base is a runtime field set at registration time, so `ff` parses to
/// 255 when the parameter was registered with base 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Based<T> {
    /// The parsed value
    pub value: T,
    /// Base used to interpret the token text
    pub base: u32,
}

impl<T> Based<T> {
    /// Create a wrapper with an explicit base.
    pub fn new(value: T, base: u32) -> Self {
        Self { value, base }
    }
}

impl<T: Default> Default for Based<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            base: 10,
        }
    }
}

/// Types that can be produced from the raw tokens of one parameter.
///
/// `default` is the value the parameter was registered with; booleans toggle
/// away from it and [`Based`] reads its base from it. Scalars demand exactly
/// one token, sequences accept any number.
pub trait FromTokens: Sized + 'static {
    /// Whether values of this type accumulate any number of tokens.
    const VARIADIC: bool = false;

    /// Whether this type consumes a token at all. Booleans are toggled by
    /// flag presence alone and never take one.
    const TAKES_VALUE: bool = true;

    /// Convert the accumulated raw tokens into a value.
    fn from_tokens(tokens: &[String], default: &Self) -> Result<Self, ConversionError>;

    /// Render a value for help output.
    fn describe(&self) -> String;
}

/// Expect exactly one token.
fn single(tokens: &[String]) -> Result<&str, ConversionError> {
    match tokens {
        [token] => Ok(token.as_str()),
        _ => Err(ConversionError::WrongArity(tokens.len())),
    }
}

/// Split off a radix prefix. Base 0 auto-detects: `0x` hex, `0b` binary,
/// a leading zero octal, decimal otherwise.
fn split_radix(digits: &str, base: u32) -> (u32, &str) {
    if base != 0 {
        return (base, digits);
    }
    if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        (2, rest)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    }
}

/// Integer primitives that parse from text in a given radix.
trait Integer: Sized {
    fn from_text(text: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Integer for $ty {
            fn from_text(text: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
                <$ty>::from_str_radix(text, radix)
            }
        }
    )*};
}

impl_integer!(i32, i64, u32, u64);

fn parse_integer<T: Integer>(token: &str, base: u32) -> Result<T, ConversionError> {
    let (sign, magnitude) = if let Some(rest) = token.strip_prefix('-') {
        ("-", rest)
    } else if let Some(rest) = token.strip_prefix('+') {
        ("", rest)
    } else {
        ("", token)
    };

    let (radix, digits) = split_radix(magnitude, base);
    if digits.is_empty() {
        return Err(ConversionError::InvalidNumber(token.to_string()));
    }

    let text = format!("{sign}{digits}");
    T::from_text(&text, radix).map_err(|parse_error| match parse_error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::OutOfRange(token.to_string())
        }
        _ => ConversionError::InvalidNumber(token.to_string()),
    })
}

macro_rules! impl_integer_from_tokens {
    ($($ty:ty),*) => {$(
        impl FromTokens for $ty {
            fn from_tokens(tokens: &[String], _default: &Self) -> Result<Self, ConversionError> {
                parse_integer(single(tokens)?, 0)
            }

            fn describe(&self) -> String {
                self.to_string()
            }
        }

        impl FromTokens for Based<$ty> {
            fn from_tokens(tokens: &[String], default: &Self) -> Result<Self, ConversionError> {
                let value = parse_integer(single(tokens)?, default.base)?;
                Ok(Based::new(value, default.base))
            }

            fn describe(&self) -> String {
                self.value.to_string()
            }
        }
    )*};
}

impl_integer_from_tokens!(i32, i64, u32, u64);

macro_rules! impl_float_from_tokens {
    ($($ty:ty),*) => {$(
        impl FromTokens for $ty {
            fn from_tokens(tokens: &[String], _default: &Self) -> Result<Self, ConversionError> {
                let token = single(tokens)?;
                token
                    .parse::<$ty>()
                    .map_err(|_| ConversionError::InvalidNumber(token.to_string()))
            }

            fn describe(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

impl_float_from_tokens!(f32, f64);

impl FromTokens for bool {
    const TAKES_VALUE: bool = false;

    /// The flag's mere presence toggles the value away from its default.
    fn from_tokens(tokens: &[String], default: &Self) -> Result<Self, ConversionError> {
        if !tokens.is_empty() {
            return Err(ConversionError::UnexpectedArguments);
        }
        Ok(!default)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl FromTokens for String {
    fn from_tokens(tokens: &[String], _default: &Self) -> Result<Self, ConversionError> {
        Ok(single(tokens)?.to_string())
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

impl<T: FromTokens + Default> FromTokens for Vec<T> {
    const VARIADIC: bool = true;

    /// Each token is converted independently under the scalar rule; order is
    /// preserved. An empty token list converts to the empty sequence.
    fn from_tokens(tokens: &[String], _default: &Self) -> Result<Self, ConversionError> {
        let element_default = T::default();
        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            values.push(T::from_tokens(std::slice::from_ref(token), &element_default)?);
        }
        Ok(values)
    }

    fn describe(&self) -> String {
        let elements: Vec<String> = self.iter().map(|value| value.describe()).collect();
        format!("[ {} ]", elements.join(" "))
    }
}
