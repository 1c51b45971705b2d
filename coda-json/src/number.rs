//! Number literals and their interpretation as Rust numbers.

use core::any::type_name;
use core::fmt;
use core::str::FromStr;

use crate::error::{JsonError, JsonErrorKind, Result};
use crate::value::Number;

/// The text of a number literal that has already passed the JSON number
/// grammar.
///
/// The reader does not decide what Rust type a number is; callers pick one
/// and get [`JsonErrorKind::NumberOutOfRange`] if it does not fit.
#[derive(Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    text: String,
}

impl NumberLiteral {
    pub(crate) const fn new(text: String) -> Self {
        Self { text }
    }

    /// The literal as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the literal has no fraction and no exponent.
    pub fn is_integral(&self) -> bool {
        !self.text.contains(['.', 'e', 'E'])
    }

    fn out_of_range<T>(&self) -> JsonError {
        JsonError::without_offset(JsonErrorKind::NumberOutOfRange {
            value: self.text.clone(),
            target_type: type_name::<T>(),
        })
    }

    /// Interpret as an integer type. Fractions and exponents are rejected
    /// even when their value is whole; `-0` is zero for every target.
    pub fn to_integer<T: FromStr>(&self) -> Result<T> {
        if !self.is_integral() {
            return Err(self.out_of_range::<T>());
        }
        // unsigned `FromStr` impls refuse a minus sign
        let text = if self.text == "-0" { "0" } else { self.text.as_str() };
        text.parse::<T>().map_err(|_| self.out_of_range::<T>())
    }

    /// Interpret as an `f64`. Literals too large to be finite are out of range.
    pub fn to_f64(&self) -> Result<f64> {
        match self.text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.out_of_range::<f64>()),
        }
    }

    /// Interpret as an `f32`. Literals too large to be finite are out of range.
    pub fn to_f32(&self) -> Result<f32> {
        match self.text.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.out_of_range::<f32>()),
        }
    }

    /// The narrowest dynamic [`Number`] that holds this literal exactly:
    /// `i64`, then `u64`, then `f64`.
    pub fn to_number(&self) -> Result<Number> {
        if self.is_integral() {
            if let Ok(v) = self.text.parse::<i64>() {
                return Ok(Number::I64(v));
            }
            if let Ok(v) = self.text.parse::<u64>() {
                return Ok(Number::U64(v));
            }
        }
        self.to_f64().map(Number::F64)
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumberLiteral({})", self.text)
    }
}
