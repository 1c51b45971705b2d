//! Built-in codecs.

mod enumeration;
mod list;
mod map;
mod non_recursive;
mod option;
mod range;
mod scalar;

pub use enumeration::EnumCodec;
pub use list::ListCodec;
pub use map::MapCodec;
pub use non_recursive::{ClosedVocabulary, NonRecursiveCodec, ValueCodec};
pub use option::OptionCodec;
pub use range::RangeInclusiveCodec;
pub use scalar::{BoolCodec, CharCodec, F32Codec, F64Codec, IntegerCodec, StringCodec};
