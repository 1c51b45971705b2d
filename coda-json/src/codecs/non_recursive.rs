use core::any::type_name;
use core::marker::PhantomData;

use coda_core::{Codable, CodableType, EmptyContext};
use indexmap::IndexMap;

use crate::codec::{DecoderCodec, EncoderCodec};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};
use crate::reader::Reader;
use crate::source::{CharSink, CharSource};
use crate::value::Value;
use crate::writer::Writer;

/// A type made only of JSON's own vocabulary, readable and writable without
/// any codec lookups.
pub trait ClosedVocabulary: Codable + Sized {
    /// Read one value.
    fn read_from<S: CharSource>(reader: &mut Reader<S>) -> Result<Self>;

    /// Write one value.
    fn write_to<W: CharSink>(&self, writer: &mut Writer<W>) -> Result<()>;
}

impl ClosedVocabulary for Value {
    fn read_from<S: CharSource>(reader: &mut Reader<S>) -> Result<Self> {
        reader.read_value()
    }

    fn write_to<W: CharSink>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_value(self)
    }
}

impl ClosedVocabulary for Vec<Value> {
    fn read_from<S: CharSource>(reader: &mut Reader<S>) -> Result<Self> {
        let mut items = Vec::new();
        reader.read_list_by_element(|reader| {
            items.push(reader.read_value()?);
            Ok(())
        })?;
        Ok(items)
    }

    fn write_to<W: CharSink>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_into_list(|writer| {
            for item in self {
                writer.write_value(item)?;
            }
            Ok(())
        })
    }
}

impl ClosedVocabulary for IndexMap<String, Value> {
    fn read_from<S: CharSource>(reader: &mut Reader<S>) -> Result<Self> {
        let mut map = IndexMap::new();
        reader.read_map_entries(|reader, key| {
            let value = reader.read_value()?;
            map.insert(key, value);
            Ok(())
        })?;
        Ok(map)
    }

    fn write_to<W: CharSink>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_into_map(|writer| {
            for (key, value) in self {
                writer.write_map_element(key, |writer| writer.write_value(value))?;
            }
            Ok(())
        })
    }
}

/// A codec for a [`ClosedVocabulary`] type.
///
/// It only accepts the exact type it was built for: bound to the `Map`
/// identity it still refuses `Map<String, i32>`, since it could never
/// produce one.
pub struct NonRecursiveCodec<T>(PhantomData<fn() -> T>);

/// The codec for dynamic [`Value`]s.
pub type ValueCodec = NonRecursiveCodec<Value>;

impl<T> NonRecursiveCodec<T> {
    /// The codec for `T`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for NonRecursiveCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_type<T: Codable>(ty: &CodableType) -> Result<()> {
    let supported = T::codable_type();
    if *ty == supported {
        Ok(())
    } else {
        Err(JsonError::invalid_value(format!(
            "{} only handles {supported}, not {ty}",
            type_name::<NonRecursiveCodec<T>>()
        )))
    }
}

impl<T: ClosedVocabulary> DecoderCodec for NonRecursiveCodec<T> {
    type Value = T;
    type Context = EmptyContext;

    fn decode(&self, ty: &CodableType, decoder: &mut Decoder<'_>, _: &EmptyContext) -> Result<T> {
        check_type::<T>(ty)?;
        T::read_from(&mut **decoder)
    }
}

impl<T: ClosedVocabulary> EncoderCodec for NonRecursiveCodec<T> {
    type Value = T;
    type Context = EmptyContext;

    fn encode(
        &self,
        ty: &CodableType,
        value: &T,
        encoder: &mut Encoder<'_>,
        _: &EmptyContext,
    ) -> Result<()> {
        check_type::<T>(ty)?;
        value.write_to(&mut **encoder)
    }
}
