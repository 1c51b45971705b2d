use core::any::Any;

use coda_core::{CodableType, ContextType, EmptyContext, Erased, ListVTable, TypeIdentity};

use crate::codec::{DynDecoderCodec, DynEncoderCodec};
use crate::codecs::NonRecursiveCodec;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};
use crate::value::Value;

/// `List<T>` for any element type, backed by the list type requested.
///
/// Elements are decoded and encoded through the ambient codec resolution, so
/// `List<List<Point>>` works as soon as `Point` has a codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCodec;

impl ListCodec {
    /// A codec for `Vec<Value>` that reads and writes elements directly,
    /// without resolving a codec per element.
    pub const fn non_recursive() -> NonRecursiveCodec<Vec<Value>> {
        NonRecursiveCodec::new()
    }
}

fn parts(ty: &CodableType) -> Result<(&ListVTable, &CodableType)> {
    match (ty.list_vtable(), ty.argument(0)) {
        (Some(vtable), Some(element)) => Ok((vtable, element)),
        _ => Err(JsonError::invalid_value(format!(
            "{ty} does not describe a concrete list"
        ))),
    }
}

impl DynDecoderCodec for ListCodec {
    fn decodable_identity(&self) -> TypeIdentity {
        TypeIdentity::list()
    }

    fn decoding_context(&self) -> ContextType {
        ContextType::of::<EmptyContext>()
    }

    fn decode_dyn(&self, ty: &CodableType, decoder: &mut Decoder<'_>) -> Result<Erased> {
        let (vtable, element) = parts(ty)?;
        let mut items = Vec::new();
        decoder.read_list_by_element(|decoder| {
            items.push(decoder.read_value_of_type(element)?);
            Ok(())
        })?;
        trace!(%ty, len = items.len(), "decoded list");
        (vtable.collect)(items)
            .ok_or_else(|| JsonError::invalid_value(format!("decoded elements do not fit {ty}")))
    }
}

impl DynEncoderCodec for ListCodec {
    fn encodable_identity(&self) -> TypeIdentity {
        TypeIdentity::list()
    }

    fn encoding_context(&self) -> ContextType {
        ContextType::of::<EmptyContext>()
    }

    fn encode_dyn(
        &self,
        ty: &CodableType,
        value: &dyn Any,
        encoder: &mut Encoder<'_>,
    ) -> Result<()> {
        let (vtable, element) = parts(ty)?;
        let items = (vtable.elements)(value)
            .ok_or_else(|| JsonError::invalid_value(format!("value is not a {ty}")))?;
        encoder.write_into_list(|encoder| {
            for item in items {
                encoder.write_value_of_type(element, item)?;
            }
            Ok(())
        })
    }
}
