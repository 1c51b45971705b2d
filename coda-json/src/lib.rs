#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Streaming JSON with type-directed, context-aware codecs.
//!
//! A [`Reader`] and a [`Writer`] handle the wire format one token at a time.
//! Codecs turn tokens into Rust values and back; a [`Registry`] picks the
//! codec for a requested [`CodableType`] and the ambient [`CodingContext`],
//! and nested values are resolved the same way, so containers compose with
//! user codecs to any depth.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let scores: BTreeMap<String, Vec<u32>> =
//!     coda_json::from_str(r#"{"ada": [3, 5], "bob": []}"#).unwrap();
//! assert_eq!(scores["ada"], [3, 5]);
//! assert_eq!(coda_json::to_string(&scores).unwrap(), r#"{"ada":[3,5],"bob":[]}"#);
//! ```

use std::sync::LazyLock;

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

pub mod character;
mod codec;
mod codecs;
mod decoder;
mod encoder;
mod error;
mod number;
mod options;
mod provider;
mod reader;
mod source;
mod value;
mod writer;

pub use codec::{Codec, DecoderCodec, DynDecoderCodec, DynEncoderCodec, EncoderCodec};
pub use codecs::{
    BoolCodec, CharCodec, ClosedVocabulary, EnumCodec, F32Codec, F64Codec, IntegerCodec,
    ListCodec, MapCodec, NonRecursiveCodec, OptionCodec, RangeInclusiveCodec, StringCodec,
    ValueCodec,
};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{JsonError, JsonErrorKind, Result};
pub use number::NumberLiteral;
pub use options::{DeserializeOptions, SerializeOptions};
pub use provider::{CodecProvider, Registry, RegistryBuilder};
pub use reader::{Reader, TokenKind};
pub use source::{CharSink, CharSource};
pub use value::{Number, Value};
pub use writer::Writer;

pub use coda_core::{
    Codable, CodableType, CodingContext, ContextType, EmptyContext, Erased, TypeIdentity,
    codable_scalar, upcast_self,
};

static BUILT_IN: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Decode a `T` from `source`, resolving codecs in `registry` under `context`.
///
/// The whole input must be one value, optionally surrounded by whitespace.
pub fn decode<T: Codable>(
    source: impl CharSource,
    registry: &Registry,
    context: &dyn CodingContext,
) -> Result<T> {
    decode_with_options(source, registry, context, &DeserializeOptions::default())
}

/// Like [`decode`], with explicit options.
pub fn decode_with_options<T: Codable>(
    mut source: impl CharSource,
    registry: &Registry,
    context: &dyn CodingContext,
    options: &DeserializeOptions,
) -> Result<T> {
    let mut decoder = Decoder::new(&mut source, registry, context, options);
    let value = decoder.read_value::<T>()?;
    if !options.allow_trailing_data {
        decoder.read_end()?;
    }
    Ok(value)
}

/// Encode `value` into `sink`, resolving codecs in `registry` under `context`.
pub fn encode<T: Codable>(
    value: &T,
    sink: &mut dyn CharSink,
    registry: &Registry,
    context: &dyn CodingContext,
) -> Result<()> {
    encode_with_options(value, sink, registry, context, SerializeOptions::default())
}

/// Like [`encode`], with explicit options.
pub fn encode_with_options<T: Codable>(
    value: &T,
    sink: &mut dyn CharSink,
    registry: &Registry,
    context: &dyn CodingContext,
    options: SerializeOptions,
) -> Result<()> {
    let mut encoder = Encoder::new(sink, registry, context, options);
    encoder.write_value(value)?;
    encoder.finish()
}

/// Decode a `T` from a string using the built-in codecs.
pub fn from_str<T: Codable>(input: &str) -> Result<T> {
    from_str_with_registry(input, &BUILT_IN, &EmptyContext)
}

/// Decode a `T` from a string with a registry and context.
pub fn from_str_with_registry<T: Codable>(
    input: &str,
    registry: &Registry,
    context: &dyn CodingContext,
) -> Result<T> {
    decode(input.chars(), registry, context)
}

/// Decode a `T` from a string with a registry, context and options.
pub fn from_str_with_options<T: Codable>(
    input: &str,
    registry: &Registry,
    context: &dyn CodingContext,
    options: &DeserializeOptions,
) -> Result<T> {
    decode_with_options(input.chars(), registry, context, options)
}

/// Encode a `T` to a compact string using the built-in codecs.
pub fn to_string<T: Codable>(value: &T) -> Result<String> {
    to_string_with_registry(value, &BUILT_IN, &EmptyContext)
}

/// Encode a `T` to a pretty-printed string using the built-in codecs.
pub fn to_string_pretty<T: Codable>(value: &T) -> Result<String> {
    to_string_with_options(value, &BUILT_IN, &EmptyContext, SerializeOptions::new().pretty())
}

/// Encode a `T` to a compact string with a registry and context.
pub fn to_string_with_registry<T: Codable>(
    value: &T,
    registry: &Registry,
    context: &dyn CodingContext,
) -> Result<String> {
    to_string_with_options(value, registry, context, SerializeOptions::default())
}

/// Encode a `T` to a string with a registry, context and options.
pub fn to_string_with_options<T: Codable>(
    value: &T,
    registry: &Registry,
    context: &dyn CodingContext,
    options: SerializeOptions,
) -> Result<String> {
    let mut out = String::new();
    encode_with_options(value, &mut out, registry, context, options)?;
    Ok(out)
}
