use core::any::Any;

use coda_core::{CodableType, ContextType, EmptyContext, Erased, OptionVTable, TypeIdentity};

use crate::codec::{DynDecoderCodec, DynEncoderCodec};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};
use crate::reader::TokenKind;

/// `Option<T>`: `null` is `None`, anything else goes to `T`'s codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionCodec;

fn parts(ty: &CodableType) -> Result<(&OptionVTable, &CodableType)> {
    match (ty.option_vtable(), ty.argument(0)) {
        (Some(vtable), Some(inner)) => Ok((vtable, inner)),
        _ => Err(JsonError::invalid_value(format!(
            "{ty} does not describe a concrete option"
        ))),
    }
}

impl DynDecoderCodec for OptionCodec {
    fn decodable_identity(&self) -> TypeIdentity {
        TypeIdentity::option()
    }

    fn decoding_context(&self) -> ContextType {
        ContextType::of::<EmptyContext>()
    }

    fn decode_dyn(&self, ty: &CodableType, decoder: &mut Decoder<'_>) -> Result<Erased> {
        let (vtable, inner) = parts(ty)?;
        let value = if decoder.peek_token()? == TokenKind::Null {
            decoder.read_null()?;
            None
        } else {
            Some(decoder.read_value_of_type(inner)?)
        };
        (vtable.wrap)(value)
            .ok_or_else(|| JsonError::invalid_value(format!("decoded value does not fit {ty}")))
    }
}

impl DynEncoderCodec for OptionCodec {
    fn encodable_identity(&self) -> TypeIdentity {
        TypeIdentity::option()
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
        let (vtable, inner) = parts(ty)?;
        match (vtable.inner)(value) {
            Some(Some(value)) => encoder.write_value_of_type(inner, value),
            Some(None) => encoder.write_null(),
            None => Err(JsonError::invalid_value(format!("value is not a {ty}"))),
        }
    }
}
