use core::any::Any;

use coda_core::{CodableType, ContextType, EmptyContext, Erased, MapVTable, TypeIdentity};
use indexmap::IndexMap;

use crate::codec::{DynDecoderCodec, DynEncoderCodec};
use crate::codecs::NonRecursiveCodec;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};
use crate::value::Value;

/// `Map<K, V>` for any key and value types, backed by the map type
/// requested (`IndexMap`, `BTreeMap`, `HashMap`).
///
/// Keys go through their own codec while the reader or writer sits in key
/// position, so the key codec must read or write a string. Entries are
/// handed to the map in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapCodec;

impl MapCodec {
    /// A codec for `IndexMap<String, Value>` that reads and writes entries
    /// directly, without resolving a codec per entry.
    pub const fn non_recursive() -> NonRecursiveCodec<IndexMap<String, Value>> {
        NonRecursiveCodec::new()
    }
}

fn parts(ty: &CodableType) -> Result<(&MapVTable, &CodableType, &CodableType)> {
    match (ty.map_vtable(), ty.argument(0), ty.argument(1)) {
        (Some(vtable), Some(key), Some(value)) => Ok((vtable, key, value)),
        _ => Err(JsonError::invalid_value(format!(
            "{ty} does not describe a concrete map"
        ))),
    }
}

impl DynDecoderCodec for MapCodec {
    fn decodable_identity(&self) -> TypeIdentity {
        TypeIdentity::map()
    }

    fn decoding_context(&self) -> ContextType {
        ContextType::of::<EmptyContext>()
    }

    fn decode_dyn(&self, ty: &CodableType, decoder: &mut Decoder<'_>) -> Result<Erased> {
        let (vtable, key_ty, value_ty) = parts(ty)?;
        let mut entries = Vec::new();
        decoder.read_map_by_element(|decoder| {
            let key = decoder.read_value_of_type(key_ty)?;
            let value = decoder.read_value_of_type(value_ty)?;
            entries.push((key, value));
            Ok(())
        })?;
        trace!(%ty, len = entries.len(), "decoded map");
        (vtable.collect)(entries)
            .ok_or_else(|| JsonError::invalid_value(format!("decoded entries do not fit {ty}")))
    }
}

impl DynEncoderCodec for MapCodec {
    fn encodable_identity(&self) -> TypeIdentity {
        TypeIdentity::map()
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
        let (vtable, key_ty, value_ty) = parts(ty)?;
        let entries = (vtable.entries)(value)
            .ok_or_else(|| JsonError::invalid_value(format!("value is not a {ty}")))?;
        encoder.write_into_map(|encoder| {
            for (key, value) in entries {
                encoder.write_value_of_type(key_ty, key)?;
                encoder.write_value_of_type(value_ty, value)?;
            }
            Ok(())
        })
    }
}
