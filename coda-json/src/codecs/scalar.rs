use core::marker::PhantomData;
use core::str::FromStr;

use coda_core::{Codable, CodableType, EmptyContext};

use crate::codec::{DecoderCodec, EncoderCodec};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};

/// Declares a codec for a scalar type in terms of one reader call and one
/// writer call.
macro_rules! scalar_codec {
    ($(#[$meta:meta])* $name:ident: $ty:ty, |$d:ident| $read:expr, |$e:ident, $v:ident| $write:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl DecoderCodec for $name {
            type Value = $ty;
            type Context = EmptyContext;

            fn decode(
                &self,
                _: &CodableType,
                $d: &mut Decoder<'_>,
                _: &EmptyContext,
            ) -> Result<$ty> {
                $read
            }
        }

        impl EncoderCodec for $name {
            type Value = $ty;
            type Context = EmptyContext;

            fn encode(
                &self,
                _: &CodableType,
                $v: &$ty,
                $e: &mut Encoder<'_>,
                _: &EmptyContext,
            ) -> Result<()> {
                $write
            }
        }
    };
}

scalar_codec!(
    /// `true` / `false`.
    BoolCodec: bool,
    |d| d.read_boolean(),
    |e, v| e.write_bool(*v)
);

scalar_codec!(
    /// JSON strings.
    StringCodec: String,
    |d| d.read_string(),
    |e, v| e.write_string(v)
);

scalar_codec!(
    /// A string holding exactly one character.
    CharCodec: char,
    |d| {
        let s = d.read_string()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(JsonError::invalid_value(format!(
                "expected a single character, got \"{s}\""
            ))),
        }
    },
    |e, v| e.write_string(v.encode_utf8(&mut [0; 4]))
);

scalar_codec!(
    /// `f64`. Refuses to write NaN and infinities.
    F64Codec: f64,
    |d| d.read_f64(),
    |e, v| e.write_f64(*v)
);

scalar_codec!(
    /// `f32`. Refuses to write NaN and infinities.
    F32Codec: f32,
    |d| d.read_f32(),
    |e, v| e.write_f32(*v)
);

/// Any primitive integer. Values that do not fit the target width fail with
/// [`NumberOutOfRange`](crate::JsonErrorKind::NumberOutOfRange).
pub struct IntegerCodec<T>(PhantomData<fn() -> T>);

impl<T> IntegerCodec<T> {
    /// The codec for `T`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for IntegerCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecoderCodec for IntegerCodec<T>
where
    T: Codable + FromStr + itoa::Integer + Copy,
{
    type Value = T;
    type Context = EmptyContext;

    fn decode(&self, _: &CodableType, decoder: &mut Decoder<'_>, _: &EmptyContext) -> Result<T> {
        decoder.read_integer::<T>()
    }
}

impl<T> EncoderCodec for IntegerCodec<T>
where
    T: Codable + FromStr + itoa::Integer + Copy,
{
    type Value = T;
    type Context = EmptyContext;

    fn encode(
        &self,
        _: &CodableType,
        value: &T,
        encoder: &mut Encoder<'_>,
        _: &EmptyContext,
    ) -> Result<()> {
        encoder.write_integer(*value)
    }
}

#[cfg(test)]
mod tests {
    use crate::{JsonErrorKind, from_str, to_string};
    use coda_testhelpers::test;

    #[test]
    fn integers_of_every_width() {
        assert_eq!(from_str::<u8>("255").unwrap(), 255);
        assert_eq!(
            from_str::<i128>("-170141183460469231731687303715884105728").unwrap(),
            i128::MIN
        );
        assert_eq!(to_string(&u64::MAX).unwrap(), "18446744073709551615");

        let err = from_str::<i16>("40000").unwrap_err();
        assert!(matches!(err.kind, JsonErrorKind::NumberOutOfRange { target_type: "i16", .. }));
    }

    #[test]
    fn chars_are_one_character_strings() {
        assert_eq!(from_str::<char>(r#""é""#).unwrap(), 'é');
        assert_eq!(to_string(&'"').unwrap(), r#""\"""#);
        assert!(from_str::<char>(r#""ab""#).is_err());
        assert!(from_str::<char>(r#""""#).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(from_str::<f64>("-2.5e-3").unwrap(), -0.0025);
        assert_eq!(from_str::<f32>("7").unwrap(), 7.0);
        assert_eq!(to_string(&0.1f64).unwrap(), "0.1");
        assert_eq!(
            to_string(&f64::NAN).unwrap_err().kind.code(),
            "json::non_finite_number"
        );
    }
}
