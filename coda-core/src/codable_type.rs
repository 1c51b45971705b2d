use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::TypeIdentity;

/// A type-erased, owned value flowing between codecs.
pub type Erased = Box<dyn Any>;

/// A fully applied codable type: a base identity plus its generic arguments.
///
/// This is the resolution key codecs are looked up by. It is built at the
/// call site through [`Codable::codable_type`](crate::Codable::codable_type),
/// where the concrete Rust type is statically known, and it carries a
/// [`TypeDef`] so that container codecs can build and take apart the concrete
/// container without knowing its element types.
///
/// Equality and hashing are structural over identity and arguments; the
/// definition is not compared.
#[derive(Clone)]
pub struct CodableType {
    identity: TypeIdentity,
    arguments: Arc<[CodableType]>,
    def: TypeDef,
}

/// How a codable type is put together.
#[derive(Clone, Copy, Debug)]
pub enum TypeDef {
    /// A leaf value with no structure the framework knows about.
    Scalar,
    /// A homogeneous sequence (`List<T>`).
    List(ListVTable),
    /// A key/value mapping (`Map<K, V>`).
    Map(MapVTable),
    /// A nullable value (`Option<T>`).
    Option(OptionVTable),
}

/// Operations on a concrete list type, monomorphized for its element type.
#[derive(Clone, Copy)]
pub struct ListVTable {
    /// Build the concrete list from decoded elements. Returns `None` if an
    /// element is not of the expected type.
    pub collect: fn(Vec<Erased>) -> Option<Erased>,
    /// Borrow the elements of a concrete list, in order. Returns `None` if the
    /// value is not of the expected list type.
    pub elements: for<'a> fn(&'a dyn Any) -> Option<Vec<&'a dyn Any>>,
}

/// Operations on a concrete map type, monomorphized for its key and value types.
#[derive(Clone, Copy)]
pub struct MapVTable {
    /// Build the concrete map from decoded entries, in input order.
    pub collect: fn(Vec<(Erased, Erased)>) -> Option<Erased>,
    /// Borrow the entries of a concrete map, in iteration order.
    pub entries: for<'a> fn(&'a dyn Any) -> Option<Vec<(&'a dyn Any, &'a dyn Any)>>,
}

/// Operations on `Option<T>`.
#[derive(Clone, Copy)]
pub struct OptionVTable {
    /// Wrap a decoded inner value (or its absence).
    pub wrap: fn(Option<Erased>) -> Option<Erased>,
    /// Look inside a concrete option. The outer `None` means type mismatch.
    pub inner: for<'a> fn(&'a dyn Any) -> Option<Option<&'a dyn Any>>,
}

macro_rules! opaque_debug {
    ($($ty:ident),*) => {
        $(impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($ty))
            }
        })*
    };
}

opaque_debug!(ListVTable, MapVTable, OptionVTable);

/// A codable type was built with the wrong number of generic arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityError {
    /// The identity being instantiated.
    pub identity: &'static str,
    /// Arguments the identity takes.
    pub expected: usize,
    /// Arguments that were supplied.
    pub got: usize,
}

impl fmt::Display for ArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} takes {} type argument(s), got {}",
            self.identity, self.expected, self.got
        )
    }
}

impl std::error::Error for ArityError {}

impl CodableType {
    /// Build a codable type, checking the argument count against the
    /// identity's arity.
    pub fn try_new(
        identity: TypeIdentity,
        arguments: Vec<CodableType>,
        def: TypeDef,
    ) -> Result<Self, ArityError> {
        if arguments.len() != identity.arity() {
            return Err(ArityError {
                identity: identity.name(),
                expected: identity.arity(),
                got: arguments.len(),
            });
        }
        Ok(Self {
            identity,
            arguments: arguments.into(),
            def,
        })
    }

    /// A leaf type with no arguments. Generic identities are refused.
    pub fn scalar(identity: TypeIdentity) -> Result<Self, ArityError> {
        Self::try_new(identity, Vec::new(), TypeDef::Scalar)
    }

    /// The leaf type for the non-generic Rust type `T`, named `name`.
    ///
    /// [`TypeIdentity::of`] always has arity 0, so this cannot fail.
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            identity: TypeIdentity::of::<T>(name),
            arguments: Arc::from([]),
            def: TypeDef::Scalar,
        }
    }

    /// `List<element>` backed by a concrete list type.
    pub fn list(element: CodableType, vtable: ListVTable) -> Self {
        Self {
            identity: TypeIdentity::list(),
            arguments: Arc::from([element]),
            def: TypeDef::List(vtable),
        }
    }

    /// `Map<key, value>` backed by a concrete map type.
    pub fn map(key: CodableType, value: CodableType, vtable: MapVTable) -> Self {
        Self {
            identity: TypeIdentity::map(),
            arguments: Arc::from([key, value]),
            def: TypeDef::Map(vtable),
        }
    }

    /// `Option<inner>`.
    pub fn option(inner: CodableType, vtable: OptionVTable) -> Self {
        Self {
            identity: TypeIdentity::option(),
            arguments: Arc::from([inner]),
            def: TypeDef::Option(vtable),
        }
    }

    /// The base identity.
    pub const fn identity(&self) -> TypeIdentity {
        self.identity
    }

    /// The generic arguments, in declaration order.
    pub fn arguments(&self) -> &[CodableType] {
        &self.arguments
    }

    /// The argument at `index`, if any.
    pub fn argument(&self, index: usize) -> Option<&CodableType> {
        self.arguments.get(index)
    }

    /// How the type is put together.
    pub const fn def(&self) -> &TypeDef {
        &self.def
    }

    /// The list vtable, if this is a list type.
    pub const fn list_vtable(&self) -> Option<&ListVTable> {
        match &self.def {
            TypeDef::List(vtable) => Some(vtable),
            _ => None,
        }
    }

    /// The map vtable, if this is a map type.
    pub const fn map_vtable(&self) -> Option<&MapVTable> {
        match &self.def {
            TypeDef::Map(vtable) => Some(vtable),
            _ => None,
        }
    }

    /// The option vtable, if this is an option type.
    pub const fn option_vtable(&self) -> Option<&OptionVTable> {
        match &self.def {
            TypeDef::Option(vtable) => Some(vtable),
            _ => None,
        }
    }
}

impl PartialEq for CodableType {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.arguments == other.arguments
    }
}

impl Eq for CodableType {}

impl Hash for CodableType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.arguments.hash(state);
    }
}

impl fmt::Display for CodableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity.name())?;
        if let Some((first, rest)) = self.arguments.split_first() {
            write!(f, "<{first}")?;
            for argument in rest {
                write!(f, ", {argument}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CodableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodableType({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Codable;
    use coda_testhelpers::test;
    use indexmap::IndexMap;
    use static_assertions::assert_impl_all;
    use std::collections::BTreeMap;

    assert_impl_all!(CodableType: Send, Sync, Clone);
    assert_impl_all!(TypeIdentity: Send, Sync, Copy);

    #[test]
    fn display_nests_arguments() {
        let ty = <IndexMap<String, Vec<Option<i64>>>>::codable_type();
        assert_eq!(ty.to_string(), "Map<String, List<Option<i64>>>");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(
            <BTreeMap<String, i32>>::codable_type(),
            <IndexMap<String, i32>>::codable_type()
        );
        assert_ne!(<Vec<i32>>::codable_type(), <Vec<i64>>::codable_type());
    }

    #[test]
    fn try_new_rejects_wrong_arity() {
        let err = CodableType::try_new(
            TypeIdentity::map(),
            vec![String::codable_type()],
            TypeDef::Scalar,
        )
        .unwrap_err();
        assert_eq!(err.expected, 2);
        assert_eq!(err.got, 1);
        assert_eq!(err.to_string(), "Map takes 2 type argument(s), got 1");
    }

    #[test]
    fn scalars_have_no_arguments() {
        let err = CodableType::scalar(TypeIdentity::map()).unwrap_err();
        assert_eq!(err.to_string(), "Map takes 2 type argument(s), got 0");
        assert!(CodableType::scalar(TypeIdentity::list()).is_err());

        struct Marker;
        let generic = TypeIdentity::generic::<Marker>("Pair", 2);
        assert!(CodableType::scalar(generic).is_err());

        let ty = CodableType::scalar(TypeIdentity::of::<u8>("u8")).unwrap();
        assert_eq!(ty, u8::codable_type());
        assert_eq!(CodableType::of::<u8>("u8"), ty);
        assert!(matches!(ty.def(), TypeDef::Scalar));
    }

    #[test]
    fn list_vtable_round_trips_through_erased_values() {
        let ty = <Vec<u8>>::codable_type();
        let vtable = ty.list_vtable().unwrap();
        let items = vec![Box::new(1u8) as Erased, Box::new(2u8) as Erased];
        let built = (vtable.collect)(items).unwrap();
        let list = built.downcast_ref::<Vec<u8>>().unwrap();
        assert_eq!(list, &[1, 2]);

        let elements = (vtable.elements)(list).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].downcast_ref::<u8>(), Some(&2));

        // wrong element type
        assert!((vtable.collect)(vec![Box::new("nope") as Erased]).is_none());
        // wrong container type
        assert!((vtable.elements)(&5u8).is_none());
    }
}
