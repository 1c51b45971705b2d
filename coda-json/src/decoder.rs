use core::any::type_name;
use core::ops::{Deref, DerefMut};

use coda_core::{Codable, CodableType, CodingContext, Erased};

use crate::codec::DynDecoderCodec;
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::options::DeserializeOptions;
use crate::provider::{CodecProvider, Registry};
use crate::reader::Reader;
use crate::source::CharSource;

/// The per-call decoding facade handed to codecs.
///
/// It dereferences to the [`Reader`] for primitive reads, and adds typed
/// nested decoding that goes back through codec resolution, so a codec never
/// hard-codes the codec of its children.
pub struct Decoder<'a> {
    reader: Reader<&'a mut dyn CharSource>,
    registry: &'a Registry,
    context: &'a dyn CodingContext,
    scopes: Vec<&'a [CodecProvider]>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder for a single call.
    pub fn new(
        source: &'a mut dyn CharSource,
        registry: &'a Registry,
        context: &'a dyn CodingContext,
        options: &DeserializeOptions,
    ) -> Self {
        Self {
            reader: Reader::with_options(source, options),
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

    fn find_codec(&self, ty: &CodableType) -> Result<&'a dyn DynDecoderCodec> {
        let identity = ty.identity();
        for &scope in self.scopes.iter().rev() {
            for provider in scope {
                if let Some(codec) = provider.find_decoder(identity, self.context) {
                    trace!(%ty, codec = codec.codec_name(), "decoder from additional provider");
                    return Ok(codec);
                }
            }
        }
        self.registry.decoder_for(ty, self.context)
    }

    /// Decode a value of the given type through whichever codec resolves for it.
    pub fn read_value_of_type(&mut self, ty: &CodableType) -> Result<Erased> {
        let codec = self.find_codec(ty)?;
        debug!(%ty, codec = codec.codec_name(), "decoding");

        let providers = codec.decoding_providers();
        let scoped = !providers.is_empty();
        if scoped {
            self.scopes.push(providers);
        }
        let result = codec.decode_dyn(ty, self);
        if scoped {
            self.scopes.pop();
        }
        result
    }

    /// Decode a `T`.
    pub fn read_value<T: Codable>(&mut self) -> Result<T> {
        let ty = T::codable_type();
        let erased = self.read_value_of_type(&ty)?;
        erased.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            JsonError::invalid_value(format!(
                "the codec resolved for {ty} did not produce a {}",
                type_name::<T>()
            ))
        })
    }

    /// Read a whole map, calling `f` once per entry to read the key and value.
    pub fn read_map_by_element<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.reader.read_map_start()?;
        while self.reader.next_map_entry()? {
            f(self)?;
        }
        self.reader.read_map_end()
    }

    /// Read a whole map, reading each key for the callback.
    pub fn read_map_entries<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, String) -> Result<()>,
    {
        self.read_map_by_element(|decoder| {
            let key = decoder.reader.read_string()?;
            f(decoder, key)
        })
    }

    /// Read a whole list, calling `f` once per element.
    pub fn read_list_by_element<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.reader.read_list_start()?;
        while self.reader.next_list_element()? {
            f(self)?;
        }
        self.reader.read_list_end()
    }
}

impl<'a> Deref for Decoder<'a> {
    type Target = Reader<&'a mut dyn CharSource>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Decoder<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}
