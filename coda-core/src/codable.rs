use core::any::Any;
use core::hash::{BuildHasher, Hash};
use core::ops::RangeInclusive;
use std::collections::{BTreeMap, HashMap};

use crate::{CodableType, Erased, ListVTable, MapVTable, OptionVTable};

/// A Rust type that can be named as a [`CodableType`].
///
/// Implementations describe the type; they do not know how to encode or
/// decode it. That is the job of a codec registered for the type's identity.
///
/// Non-generic types are usually declared with [`codable_scalar!`](crate::codable_scalar).
pub trait Codable: Any {
    /// The fully applied type descriptor for `Self`.
    fn codable_type() -> CodableType;
}

/// Implement [`Codable`] for non-generic types, each with its own identity.
///
/// ```
/// struct Point { x: i32, y: i32 }
///
/// coda_core::codable_scalar!(Point => "Point");
///
/// use coda_core::Codable;
/// assert_eq!(Point::codable_type().to_string(), "Point");
/// ```
#[macro_export]
macro_rules! codable_scalar {
    ($($ty:ty => $name:expr),* $(,)?) => {
        $(impl $crate::Codable for $ty {
            fn codable_type() -> $crate::CodableType {
                $crate::CodableType::of::<$ty>($name)
            }
        })*
    };
}

codable_scalar!(
    bool => "bool",
    char => "char",
    String => "String",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    RangeInclusive<i32> => "IntRange",
    RangeInclusive<i64> => "LongRange",
);

fn downcast<T: Any>(value: Erased) -> Option<T> {
    value.downcast::<T>().ok().map(|boxed| *boxed)
}

fn collect_vec<T: Codable>(items: Vec<Erased>) -> Option<Erased> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(downcast::<T>(item)?);
    }
    Some(Box::new(out))
}

fn vec_elements<T: Codable>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let list = value.downcast_ref::<Vec<T>>()?;
    Some(list.iter().map(|item| item as &dyn Any).collect())
}

impl<T: Codable> Codable for Vec<T> {
    fn codable_type() -> CodableType {
        CodableType::list(
            T::codable_type(),
            ListVTable {
                collect: collect_vec::<T>,
                elements: vec_elements::<T>,
            },
        )
    }
}

fn wrap_option<T: Codable>(inner: Option<Erased>) -> Option<Erased> {
    let value: Option<T> = match inner {
        Some(inner) => Some(downcast::<T>(inner)?),
        None => None,
    };
    Some(Box::new(value))
}

fn option_inner<T: Codable>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    let option = value.downcast_ref::<Option<T>>()?;
    Some(option.as_ref().map(|inner| inner as &dyn Any))
}

impl<T: Codable> Codable for Option<T> {
    fn codable_type() -> CodableType {
        CodableType::option(
            T::codable_type(),
            OptionVTable {
                wrap: wrap_option::<T>,
                inner: option_inner::<T>,
            },
        )
    }
}

/// Shared plumbing for map-like collections that can be built from, and
/// iterated as, ordered key/value pairs.
trait MapLike: Any + Sized {
    type Key: Codable;
    type Value: Codable;

    fn from_pairs(pairs: Vec<(Self::Key, Self::Value)>) -> Self;

    fn pairs(&self) -> Vec<(&Self::Key, &Self::Value)>;
}

fn collect_map<M: MapLike>(entries: Vec<(Erased, Erased)>) -> Option<Erased> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        pairs.push((downcast::<M::Key>(key)?, downcast::<M::Value>(value)?));
    }
    Some(Box::new(M::from_pairs(pairs)))
}

fn map_entries<M: MapLike>(value: &dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> {
    let map = value.downcast_ref::<M>()?;
    Some(
        map.pairs()
            .into_iter()
            .map(|(key, value)| (key as &dyn Any, value as &dyn Any))
            .collect(),
    )
}

fn map_type<M: MapLike>() -> CodableType {
    CodableType::map(
        M::Key::codable_type(),
        M::Value::codable_type(),
        MapVTable {
            collect: collect_map::<M>,
            entries: map_entries::<M>,
        },
    )
}

impl<K, V> MapLike for BTreeMap<K, V>
where
    K: Codable + Ord,
    V: Codable,
{
    type Key = K;
    type Value = V;

    fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }

    fn pairs(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

impl<K, V> Codable for BTreeMap<K, V>
where
    K: Codable + Ord,
    V: Codable,
{
    fn codable_type() -> CodableType {
        map_type::<Self>()
    }
}

impl<K, V, S> MapLike for HashMap<K, V, S>
where
    K: Codable + Eq + Hash,
    V: Codable,
    S: BuildHasher + Default + 'static,
{
    type Key = K;
    type Value = V;

    fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }

    fn pairs(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

impl<K, V, S> Codable for HashMap<K, V, S>
where
    K: Codable + Eq + Hash,
    V: Codable,
    S: BuildHasher + Default + 'static,
{
    fn codable_type() -> CodableType {
        map_type::<Self>()
    }
}

#[cfg(feature = "indexmap")]
impl<K, V, S> MapLike for indexmap::IndexMap<K, V, S>
where
    K: Codable + Eq + Hash,
    V: Codable,
    S: BuildHasher + Default + 'static,
{
    type Key = K;
    type Value = V;

    fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }

    fn pairs(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

#[cfg(feature = "indexmap")]
impl<K, V, S> Codable for indexmap::IndexMap<K, V, S>
where
    K: Codable + Eq + Hash,
    V: Codable,
    S: BuildHasher + Default + 'static,
{
    fn codable_type() -> CodableType {
        map_type::<Self>()
    }
}
