use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

/// The base identity of a codable type, with its generic arguments erased.
///
/// `Vec<i64>` and `Vec<String>` share one identity ("List"), and so do every
/// map implementation. Codecs are bound to identities, never to fully applied
/// types: the requested [`CodableType`](crate::CodableType) carries the
/// arguments.
///
/// Equality and hashing only look at the underlying [`TypeId`]; the name is
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
    arity: usize,
}

/// Marker for the shared list identity.
enum ListMarker {}

/// Marker for the shared map identity.
enum MapMarker {}

/// Marker for the shared nullable identity.
enum OptionMarker {}

impl TypeIdentity {
    /// Identity of a non-generic type.
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::generic::<T>(name, 0)
    }

    /// Identity of a generic type, keyed by a marker type that stands in for
    /// every instantiation.
    ///
    /// `arity` is the number of type arguments every [`CodableType`](crate::CodableType)
    /// with this identity must carry.
    pub fn generic<Marker: ?Sized + 'static>(name: &'static str, arity: usize) -> Self {
        Self {
            id: TypeId::of::<Marker>(),
            name,
            arity,
        }
    }

    /// The identity shared by all sequence types (`List<T>`).
    pub fn list() -> Self {
        Self::generic::<ListMarker>("List", 1)
    }

    /// The identity shared by all map types (`Map<K, V>`).
    pub fn map() -> Self {
        Self::generic::<MapMarker>("Map", 2)
    }

    /// The identity of nullable values (`Option<T>`).
    pub fn option() -> Self {
        Self::generic::<OptionMarker>("Option", 1)
    }

    /// The erased type id this identity is keyed by.
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable name, used in error messages and logs.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of generic arguments this identity takes.
    pub const fn arity(&self) -> usize {
        self.arity
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({})", self.name)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coda_testhelpers::test;

    struct Point;

    #[test]
    fn identity_is_keyed_by_type_id_not_name() {
        let a = TypeIdentity::of::<Point>("Point");
        let b = TypeIdentity::of::<Point>("AnotherName");
        let c = TypeIdentity::of::<u8>("Point");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn shared_container_identities_are_distinct() {
        assert_eq!(TypeIdentity::list(), TypeIdentity::list());
        assert_ne!(TypeIdentity::list(), TypeIdentity::map());
        assert_ne!(TypeIdentity::map(), TypeIdentity::option());
        assert_eq!(TypeIdentity::map().arity(), 2);
        assert_eq!(TypeIdentity::list().to_string(), "List");
    }
}
