use core::marker::PhantomData;
use core::ops::RangeInclusive;
use core::str::FromStr;

use coda_core::{Codable, CodableType, EmptyContext};

use crate::codec::{DecoderCodec, EncoderCodec};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};

const START: &str = "start";
const END_INCLUSIVE: &str = "endInclusive";

/// Inclusive integer ranges as `{"start": a, "endInclusive": b}`.
///
/// Keys may come in any order and unknown keys are skipped. Both bounds are
/// required. Empty ranges (`start > endInclusive`) are allowed.
pub struct RangeInclusiveCodec<T>(PhantomData<fn() -> T>);

impl<T> RangeInclusiveCodec<T> {
    /// The codec for `RangeInclusive<T>`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for RangeInclusiveCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecoderCodec for RangeInclusiveCodec<T>
where
    T: FromStr + itoa::Integer + Copy + 'static,
    RangeInclusive<T>: Codable,
{
    type Value = RangeInclusive<T>;
    type Context = EmptyContext;

    fn decode(
        &self,
        ty: &CodableType,
        decoder: &mut Decoder<'_>,
        _: &EmptyContext,
    ) -> Result<RangeInclusive<T>> {
        let mut start = None;
        let mut end = None;
        decoder.read_map_entries(|decoder, key| {
            match key.as_str() {
                START => start = Some(decoder.read_integer::<T>()?),
                END_INCLUSIVE => end = Some(decoder.read_integer::<T>()?),
                _ => decoder.skip_value()?,
            }
            Ok(())
        })?;

        let start = start.ok_or_else(|| JsonError::missing_field(START, ty.to_string()))?;
        let end = end.ok_or_else(|| JsonError::missing_field(END_INCLUSIVE, ty.to_string()))?;
        Ok(start..=end)
    }
}

impl<T> EncoderCodec for RangeInclusiveCodec<T>
where
    T: FromStr + itoa::Integer + Copy + 'static,
    RangeInclusive<T>: Codable,
{
    type Value = RangeInclusive<T>;
    type Context = EmptyContext;

    fn encode(
        &self,
        _: &CodableType,
        value: &RangeInclusive<T>,
        encoder: &mut Encoder<'_>,
        _: &EmptyContext,
    ) -> Result<()> {
        encoder.write_into_map(|encoder| {
            encoder.write_map_element(START, |e| e.write_integer(*value.start()))?;
            encoder.write_map_element(END_INCLUSIVE, |e| e.write_integer(*value.end()))
        })
    }
}
