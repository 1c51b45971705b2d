//! Codec bindings and their resolution.
//!
//! A [`CodecProvider`] is an ordered list of codec bindings plus nested
//! providers. A [`Registry`] is an ordered list of providers plus an optional
//! default tail. Resolution walks them in declaration order and the first
//! binding whose base identity matches, and whose context type the ambient
//! context is, wins. Nothing is cached; the answer depends only on the
//! registry, the requested identity and the ambient context.

use std::sync::Arc;

use coda_core::{CodableType, CodingContext, TypeIdentity};

use crate::codec::{DynDecoderCodec, DynEncoderCodec};
use crate::codecs::{
    BoolCodec, CharCodec, F32Codec, F64Codec, IntegerCodec, ListCodec, MapCodec, OptionCodec,
    RangeInclusiveCodec, StringCodec, ValueCodec,
};
use crate::error::{JsonError, JsonErrorKind, Result};

/// An ordered set of codec bindings, resolved depth-first.
#[derive(Clone, Default)]
pub struct CodecProvider {
    decoders: Vec<Arc<dyn DynDecoderCodec>>,
    encoders: Vec<Arc<dyn DynEncoderCodec>>,
    nested: Vec<CodecProvider>,
}

impl CodecProvider {
    /// An empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decode-only binding.
    pub fn with_decoder<C: DynDecoderCodec + 'static>(mut self, codec: C) -> Self {
        self.decoders.push(Arc::new(codec));
        self
    }

    /// Add an encode-only binding.
    pub fn with_encoder<C: DynEncoderCodec + 'static>(mut self, codec: C) -> Self {
        self.encoders.push(Arc::new(codec));
        self
    }

    /// Add a binding for both directions.
    pub fn with_codec<C>(mut self, codec: C) -> Self
    where
        C: DynDecoderCodec + DynEncoderCodec + 'static,
    {
        let codec = Arc::new(codec);
        self.decoders.push(codec.clone());
        self.encoders.push(codec);
        self
    }

    /// Append a nested provider, consulted after this provider's own bindings.
    pub fn with_provider(mut self, provider: CodecProvider) -> Self {
        self.nested.push(provider);
        self
    }

    /// The first decoder bound to `identity` that runs under `context`.
    pub fn find_decoder(
        &self,
        identity: TypeIdentity,
        context: &dyn CodingContext,
    ) -> Option<&dyn DynDecoderCodec> {
        self.decoders
            .iter()
            .map(|codec| &**codec)
            .find(|codec| {
                codec.decodable_identity() == identity && codec.decoding_context().accepts(context)
            })
            .or_else(|| {
                self.nested
                    .iter()
                    .find_map(|provider| provider.find_decoder(identity, context))
            })
    }

    /// The first encoder bound to `identity` that runs under `context`.
    pub fn find_encoder(
        &self,
        identity: TypeIdentity,
        context: &dyn CodingContext,
    ) -> Option<&dyn DynEncoderCodec> {
        self.encoders
            .iter()
            .map(|codec| &**codec)
            .find(|codec| {
                codec.encodable_identity() == identity && codec.encoding_context().accepts(context)
            })
            .or_else(|| {
                self.nested
                    .iter()
                    .find_map(|provider| provider.find_encoder(identity, context))
            })
    }

    fn scalars() -> Self {
        Self::new()
            .with_codec(BoolCodec)
            .with_codec(StringCodec)
            .with_codec(CharCodec)
            .with_codec(IntegerCodec::<i8>::new())
            .with_codec(IntegerCodec::<i16>::new())
            .with_codec(IntegerCodec::<i32>::new())
            .with_codec(IntegerCodec::<i64>::new())
            .with_codec(IntegerCodec::<i128>::new())
            .with_codec(IntegerCodec::<isize>::new())
            .with_codec(IntegerCodec::<u8>::new())
            .with_codec(IntegerCodec::<u16>::new())
            .with_codec(IntegerCodec::<u32>::new())
            .with_codec(IntegerCodec::<u64>::new())
            .with_codec(IntegerCodec::<u128>::new())
            .with_codec(IntegerCodec::<usize>::new())
            .with_codec(F32Codec)
            .with_codec(F64Codec)
            .with_codec(ValueCodec::new())
    }

    /// Every built-in codec. Containers look up their elements through the
    /// registry, so they nest to any depth and pick up user codecs.
    pub fn default_codecs() -> Self {
        Self::scalars()
            .with_codec(ListCodec)
            .with_codec(MapCodec)
            .with_codec(OptionCodec)
            .with_codec(RangeInclusiveCodec::<i32>::new())
            .with_codec(RangeInclusiveCodec::<i64>::new())
    }

    /// The closed vocabulary: scalars, [`Value`](crate::Value), and maps and
    /// lists of `Value` that never consult the registry for their contents.
    pub fn non_recursive() -> Self {
        Self::scalars()
            .with_codec(ListCodec::non_recursive())
            .with_codec(MapCodec::non_recursive())
    }
}

/// The immutable set of providers a decode or encode call resolves against.
///
/// Build it once and share it; it is `Send + Sync`.
#[derive(Clone)]
pub struct Registry {
    providers: Vec<CodecProvider>,
    default: Option<CodecProvider>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Registry {
    /// A registry with only the built-in codecs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            providers: Vec::new(),
            append_default: true,
        }
    }

    /// Providers in resolution order, default tail last.
    pub fn providers(&self) -> impl Iterator<Item = &CodecProvider> {
        self.providers.iter().chain(self.default.iter())
    }

    /// Resolve the decoder for `ty` under `context`.
    pub fn decoder_for(
        &self,
        ty: &CodableType,
        context: &dyn CodingContext,
    ) -> Result<&dyn DynDecoderCodec> {
        let identity = ty.identity();
        match self
            .providers()
            .find_map(|provider| provider.find_decoder(identity, context))
        {
            Some(codec) => {
                debug!(%ty, codec = codec.codec_name(), "resolved decoder");
                Ok(codec)
            }
            None => Err(no_codec(ty, context, "decoder")),
        }
    }

    /// Resolve the encoder for `ty` under `context`.
    pub fn encoder_for(
        &self,
        ty: &CodableType,
        context: &dyn CodingContext,
    ) -> Result<&dyn DynEncoderCodec> {
        let identity = ty.identity();
        match self
            .providers()
            .find_map(|provider| provider.find_encoder(identity, context))
        {
            Some(codec) => {
                debug!(%ty, codec = codec.codec_name(), "resolved encoder");
                Ok(codec)
            }
            None => Err(no_codec(ty, context, "encoder")),
        }
    }
}

fn no_codec(ty: &CodableType, context: &dyn CodingContext, capability: &'static str) -> JsonError {
    JsonError::without_offset(JsonErrorKind::NoCodecRegistered {
        type_name: ty.to_string(),
        context: context.context_name(),
        capability,
    })
}

/// Builder for [`Registry`].
pub struct RegistryBuilder {
    providers: Vec<CodecProvider>,
    append_default: bool,
}

impl RegistryBuilder {
    /// Append a provider. Earlier providers take precedence.
    pub fn provider(mut self, provider: CodecProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Whether [`CodecProvider::default_codecs`] is appended as the last
    /// provider (default: true).
    pub const fn append_default(mut self, append_default: bool) -> Self {
        self.append_default = append_default;
        self
    }

    /// Finish building.
    pub fn build(self) -> Registry {
        Registry {
            providers: self.providers,
            default: self.append_default.then(CodecProvider::default_codecs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decoder, DecoderCodec, Encoder, EncoderCodec};
    use coda_core::{Codable, EmptyContext};
    use coda_testhelpers::test;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Registry: Send, Sync);
    assert_impl_all!(CodecProvider: Send, Sync);

    struct Loud;

    impl DecoderCodec for Loud {
        type Value = String;
        type Context = EmptyContext;

        fn decode(&self, _: &CodableType, d: &mut Decoder<'_>, _: &EmptyContext) -> Result<String> {
            d.read_string().map(|s| s.to_uppercase())
        }
    }

    impl EncoderCodec for Loud {
        type Value = String;
        type Context = EmptyContext;

        fn encode(
            &self,
            _: &CodableType,
            value: &String,
            e: &mut Encoder<'_>,
            _: &EmptyContext,
        ) -> Result<()> {
            e.write_string(&value.to_uppercase())
        }
    }

    #[test]
    fn first_binding_wins_across_nesting() {
        let inner = CodecProvider::new().with_decoder(StringCodec);
        let provider = CodecProvider::new().with_provider(inner).with_decoder(Loud);
        let found = provider
            .find_decoder(String::codable_type().identity(), &EmptyContext)
            .unwrap();
        // own bindings are searched before nested providers
        assert!(found.codec_name().ends_with("Loud"));
    }

    #[test]
    fn decode_only_bindings_do_not_answer_encode_lookups() {
        let registry = Registry::builder()
            .provider(CodecProvider::new().with_decoder(Loud))
            .append_default(false)
            .build();
        let ty = String::codable_type();
        assert!(registry.decoder_for(&ty, &EmptyContext).is_ok());
        let err = registry.encoder_for(&ty, &EmptyContext).err().unwrap();
        assert_eq!(
            err.to_string(),
            "no encoder codec registered for String under context EmptyContext"
        );
    }

    #[test]
    fn default_tail_is_optional() {
        let ty = <Vec<i32>>::codable_type();
        assert!(Registry::new().decoder_for(&ty, &EmptyContext).is_ok());
        let bare = Registry::builder().append_default(false).build();
        assert!(bare.decoder_for(&ty, &EmptyContext).is_err());
        assert_eq!(bare.providers().count(), 0);
        assert_eq!(Registry::new().providers().count(), 1);
    }
}
