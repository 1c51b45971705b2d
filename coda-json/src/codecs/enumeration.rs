use coda_core::{Codable, CodableType, EmptyContext};

use crate::codec::{DecoderCodec, EncoderCodec};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, JsonErrorKind, Result};

/// A closed set of values, each written as a fixed string label.
///
/// ```
/// use coda_json::{CodecProvider, EmptyContext, EnumCodec, Registry, codable_scalar};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Weekday { Monday, Tuesday }
/// codable_scalar!(Weekday => "Weekday");
///
/// let registry = Registry::builder()
///     .provider(CodecProvider::new().with_codec(EnumCodec::new([
///         ("monday", Weekday::Monday),
///         ("tuesday", Weekday::Tuesday),
///     ])))
///     .build();
///
/// let day: Weekday =
///     coda_json::from_str_with_registry(r#""tuesday""#, &registry, &EmptyContext).unwrap();
/// assert_eq!(day, Weekday::Tuesday);
/// ```
pub struct EnumCodec<T> {
    labels: Vec<(&'static str, T)>,
}

impl<T> EnumCodec<T> {
    /// A codec over `label => value` pairs.
    pub fn new(labels: impl IntoIterator<Item = (&'static str, T)>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }
}

impl<T> DecoderCodec for EnumCodec<T>
where
    T: Codable + Clone + PartialEq + Send + Sync,
{
    type Value = T;
    type Context = EmptyContext;

    fn decode(&self, ty: &CodableType, decoder: &mut Decoder<'_>, _: &EmptyContext) -> Result<T> {
        let label = decoder.read_string()?;
        self.labels
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                JsonError::without_offset(JsonErrorKind::UnknownValueForEnumeration {
                    value: label,
                    type_name: ty.to_string(),
                })
            })
    }
}

impl<T> EncoderCodec for EnumCodec<T>
where
    T: Codable + Clone + PartialEq + Send + Sync,
{
    type Value = T;
    type Context = EmptyContext;

    fn encode(
        &self,
        ty: &CodableType,
        value: &T,
        encoder: &mut Encoder<'_>,
        _: &EmptyContext,
    ) -> Result<()> {
        let (label, _) = self
            .labels
            .iter()
            .find(|(_, candidate)| candidate == value)
            .ok_or_else(|| JsonError::invalid_value(format!("{ty} value has no label")))?;
        encoder.write_string(label)
    }
}
