//! Codec traits.
//!
//! Codec authors implement the typed [`DecoderCodec`] and [`EncoderCodec`]
//! traits. The registry stores codecs behind the object-safe
//! [`DynDecoderCodec`] and [`DynEncoderCodec`] traits, which every typed codec
//! gets for free. Codecs that serve a whole family of types (all lists, all
//! maps) implement the dyn traits directly and use the vtables carried by the
//! requested [`CodableType`].

use core::any::{Any, type_name};

use coda_core::{Codable, CodableType, CodingContext, ContextType, Erased, TypeIdentity};

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{JsonError, Result};
use crate::provider::CodecProvider;

/// Decodes one base type under one context type.
///
/// ```
/// use coda_json::{
///     CodableType, CodecProvider, Decoder, DecoderCodec, EmptyContext, Registry, Result,
///     codable_scalar,
/// };
///
/// struct Celsius(f64);
/// codable_scalar!(Celsius => "Celsius");
///
/// struct CelsiusCodec;
///
/// impl DecoderCodec for CelsiusCodec {
///     type Value = Celsius;
///     type Context = EmptyContext;
///
///     fn decode(
///         &self,
///         _ty: &CodableType,
///         decoder: &mut Decoder<'_>,
///         _: &EmptyContext,
///     ) -> Result<Celsius> {
///         decoder.read_f64().map(Celsius)
///     }
/// }
///
/// let registry = Registry::builder()
///     .provider(CodecProvider::new().with_decoder(CelsiusCodec))
///     .build();
/// let t: Celsius = coda_json::from_str_with_registry("21.5", &registry, &EmptyContext).unwrap();
/// assert_eq!(t.0, 21.5);
/// ```
pub trait DecoderCodec: Send + Sync + 'static {
    /// The Rust type this codec produces.
    type Value: Codable;

    /// The context type this codec requires. Use
    /// [`EmptyContext`](coda_core::EmptyContext) if it needs none.
    type Context: CodingContext;

    /// The base identity this codec is bound to. Generic arguments are not
    /// part of the binding.
    fn decodable_type(&self) -> TypeIdentity {
        Self::Value::codable_type().identity()
    }

    /// Decode one value. `ty` is the fully applied type that was requested.
    fn decode(
        &self,
        ty: &CodableType,
        decoder: &mut Decoder<'_>,
        context: &Self::Context,
    ) -> Result<Self::Value>;

    /// Providers consulted first, for this codec's nested lookups.
    fn additional_providers(&self) -> &[CodecProvider] {
        &[]
    }
}

/// Encodes one base type under one context type.
pub trait EncoderCodec: Send + Sync + 'static {
    /// The Rust type this codec consumes.
    type Value: Codable;

    /// The context type this codec requires.
    type Context: CodingContext;

    /// The base identity this codec is bound to.
    fn encodable_type(&self) -> TypeIdentity {
        Self::Value::codable_type().identity()
    }

    /// Encode one value. `ty` is the fully applied type that was requested.
    fn encode(
        &self,
        ty: &CodableType,
        value: &Self::Value,
        encoder: &mut Encoder<'_>,
        context: &Self::Context,
    ) -> Result<()>;

    /// Providers consulted first, for this codec's nested lookups.
    fn additional_providers(&self) -> &[CodecProvider] {
        &[]
    }
}

/// Both capabilities, for the same value type.
pub trait Codec: DecoderCodec + EncoderCodec<Value = <Self as DecoderCodec>::Value> {}

impl<T> Codec for T where T: DecoderCodec + EncoderCodec<Value = <T as DecoderCodec>::Value> {}

/// Object-safe decoding capability, as stored in a [`CodecProvider`].
pub trait DynDecoderCodec: Send + Sync {
    /// The base identity this binding answers for.
    fn decodable_identity(&self) -> TypeIdentity;

    /// The context type this binding is declared for.
    fn decoding_context(&self) -> ContextType;

    /// Decode one value of type `ty`.
    fn decode_dyn(&self, ty: &CodableType, decoder: &mut Decoder<'_>) -> Result<Erased>;

    /// Providers layered above the registry while this codec runs.
    fn decoding_providers(&self) -> &[CodecProvider] {
        &[]
    }

    /// Name used in logs.
    fn codec_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Object-safe encoding capability, as stored in a [`CodecProvider`].
pub trait DynEncoderCodec: Send + Sync {
    /// The base identity this binding answers for.
    fn encodable_identity(&self) -> TypeIdentity;

    /// The context type this binding is declared for.
    fn encoding_context(&self) -> ContextType;

    /// Encode one value of type `ty`.
    fn encode_dyn(&self, ty: &CodableType, value: &dyn Any, encoder: &mut Encoder<'_>)
    -> Result<()>;

    /// Providers layered above the registry while this codec runs.
    fn encoding_providers(&self) -> &[CodecProvider] {
        &[]
    }

    /// Name used in logs.
    fn codec_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<T: DecoderCodec> DynDecoderCodec for T {
    fn decodable_identity(&self) -> TypeIdentity {
        self.decodable_type()
    }

    fn decoding_context(&self) -> ContextType {
        ContextType::of::<T::Context>()
    }

    fn decode_dyn(&self, ty: &CodableType, decoder: &mut Decoder<'_>) -> Result<Erased> {
        let context = decoder.context::<T::Context>()?;
        let value = self.decode(ty, decoder, context)?;
        Ok(Box::new(value))
    }

    fn decoding_providers(&self) -> &[CodecProvider] {
        DecoderCodec::additional_providers(self)
    }
}

impl<T: EncoderCodec> DynEncoderCodec for T {
    fn encodable_identity(&self) -> TypeIdentity {
        self.encodable_type()
    }

    fn encoding_context(&self) -> ContextType {
        ContextType::of::<T::Context>()
    }

    fn encode_dyn(
        &self,
        ty: &CodableType,
        value: &dyn Any,
        encoder: &mut Encoder<'_>,
    ) -> Result<()> {
        let value = value.downcast_ref::<T::Value>().ok_or_else(|| {
            JsonError::invalid_value(format!(
                "{} cannot encode a value that is not a {ty}",
                type_name::<T>()
            ))
        })?;
        let context = encoder.context::<T::Context>()?;
        self.encode(ty, value, encoder, context)
    }

    fn encoding_providers(&self) -> &[CodecProvider] {
        EncoderCodec::additional_providers(self)
    }
}
