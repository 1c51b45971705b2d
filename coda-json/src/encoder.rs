use core::any::{Any, type_name};
use core::ops::{Deref, DerefMut};

use coda_core::{Codable, CodableType, CodingContext};

use crate::codec::DynEncoderCodec;
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::options::SerializeOptions;
use crate::provider::{CodecProvider, Registry};
use crate::source::CharSink;
use crate::writer::Writer;

/// The per-call encoding facade handed to codecs.
///
/// Mirrors [`Decoder`](crate::Decoder): it dereferences to the [`Writer`]
/// and resolves a codec for every nested value it is asked to write.
pub struct Encoder<'a> {
    writer: Writer<&'a mut dyn CharSink>,
    registry: &'a Registry,
    context: &'a dyn CodingContext,
    scopes: Vec<&'a [CodecProvider]>,
}

impl<'a> Encoder<'a> {
    /// Create an encoder for a single call.
    pub fn new(
        sink: &'a mut dyn CharSink,
        registry: &'a Registry,
        context: &'a dyn CodingContext,
        options: SerializeOptions,
    ) -> Self {
        Self {
            writer: Writer::with_options(sink, options),
            registry,
            context,
            scopes: Vec::new(),
        }
    }

    /// The ambient context, as the context type `C`.
    pub fn context<C: CodingContext>(&self) -> Result<&'a C> {
        self.context.downcast::<C>().ok_or_else(|| {
            JsonError::without_offset(JsonErrorKind::ContextUnavailable {
                expected: type_name::<C>(),
                actual: self.context.context_name(),
            })
        })
    }

    /// The ambient context.
    pub fn coding_context(&self) -> &'a dyn CodingContext {
        self.context
    }

    fn find_codec(&self, ty: &CodableType) -> Result<&'a dyn DynEncoderCodec> {
        let identity = ty.identity();
        for &scope in self.scopes.iter().rev() {
            for provider in scope {
                if let Some(codec) = provider.find_encoder(identity, self.context) {
                    trace!(%ty, codec = codec.codec_name(), "encoder from additional provider");
                    return Ok(codec);
                }
            }
        }
        self.registry.encoder_for(ty, self.context)
    }

    /// Encode `value`, which must be a concrete `ty`, through whichever codec
    /// resolves for `ty`.
    pub fn write_value_of_type(&mut self, ty: &CodableType, value: &dyn Any) -> Result<()> {
        let codec = self.find_codec(ty)?;
        debug!(%ty, codec = codec.codec_name(), "encoding");

        let providers = codec.encoding_providers();
        let scoped = !providers.is_empty();
        if scoped {
            self.scopes.push(providers);
        }
        let result = codec.encode_dyn(ty, value, self);
        if scoped {
            self.scopes.pop();
        }
        result
    }

    /// Encode a `T`.
    pub fn write_value<T: Codable>(&mut self, value: &T) -> Result<()> {
        self.write_value_of_type(&T::codable_type(), value)
    }

    /// Write one map entry: the key, then whatever `f` writes as its value.
    pub fn write_map_element<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.writer.write_map_key(key)?;
        f(self)
    }

    /// Write a whole map; `f` writes the entries.
    pub fn write_into_map<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.writer.write_map_start()?;
        f(self)?;
        self.writer.write_map_end()
    }

    /// Write a whole list; `f` writes the elements.
    pub fn write_into_list<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.writer.write_list_start()?;
        f(self)?;
        self.writer.write_list_end()
    }

    /// Check that the output is complete.
    pub fn finish(self) -> Result<()> {
        self.writer.finish().map(drop)
    }
}

impl<'a> Deref for Encoder<'a> {
    type Target = Writer<&'a mut dyn CharSink>;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl DerefMut for Encoder<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}
