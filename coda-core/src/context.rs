use core::any::{Any, TypeId};
use core::fmt;

/// Blanket `&T -> &dyn Any` so that [`CodingContext`]'s provided methods can
/// work on `Self` without requiring `Sized`.
pub trait AsAny: Any {
    /// `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A caller-supplied, read-only value threaded through every decode and
/// encode call.
///
/// Codecs are registered for a context type and are only selected when the
/// ambient context *is* that type. "Is" is answered by [`upcast`]: a context
/// always answers for its own type and for [`EmptyContext`], and a context
/// that embeds other contexts can answer for those too.
///
/// ```
/// use core::any::{Any, TypeId};
/// use coda_core::{CodingContext, upcast_self};
///
/// struct Tenant { id: u32 }
/// impl CodingContext for Tenant {}
///
/// struct Request { tenant: Tenant, locale: &'static str }
/// impl CodingContext for Request {
///     fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
///         upcast_self(self, target).or_else(|| self.tenant.upcast(target))
///     }
/// }
///
/// let request = Request { tenant: Tenant { id: 7 }, locale: "en" };
/// let ctx: &dyn CodingContext = &request;
/// assert_eq!(ctx.downcast::<Tenant>().map(|t| t.id), Some(7));
/// ```
///
/// [`upcast`]: CodingContext::upcast
pub trait CodingContext: AsAny + Send + Sync {
    /// View this context as the context type `target`, if it is (or embeds)
    /// that type.
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        let this = self.as_any();
        if target == this.type_id() {
            Some(this)
        } else if target == TypeId::of::<EmptyContext>() {
            Some(&EmptyContext)
        } else {
            None
        }
    }

    /// Name used in diagnostics.
    fn context_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// The default [`CodingContext::upcast`] behavior, for implementations that
/// extend it.
pub fn upcast_self<C: CodingContext>(context: &C, target: TypeId) -> Option<&dyn Any> {
    if target == TypeId::of::<C>() {
        Some(context)
    } else if target == TypeId::of::<EmptyContext>() {
        Some(&EmptyContext)
    } else {
        None
    }
}

impl<'a> dyn CodingContext + 'a {
    /// Whether this context is (or embeds) a `C`.
    pub fn is<C: CodingContext>(&self) -> bool {
        self.upcast(TypeId::of::<C>()).is_some()
    }

    /// This context viewed as a `C`.
    pub fn downcast<C: CodingContext>(&self) -> Option<&C> {
        self.upcast(TypeId::of::<C>())?.downcast_ref::<C>()
    }
}

/// The root context: carries nothing, and every context is one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyContext;

impl CodingContext for EmptyContext {
    fn context_name(&self) -> &'static str {
        "EmptyContext"
    }
}

/// The context type a codec binding is declared for.
#[derive(Clone, Copy)]
pub struct ContextType {
    id: TypeId,
    name: &'static str,
}

impl ContextType {
    /// The context type `C`.
    pub fn of<C: CodingContext>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: core::any::type_name::<C>(),
        }
    }

    /// The erased type id.
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a binding declared for this context type may run under `context`.
    pub fn accepts(&self, context: &dyn CodingContext) -> bool {
        context.upcast(self.id).is_some()
    }
}

impl PartialEq for ContextType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContextType {}

impl fmt::Debug for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextType({})", self.name)
    }
}
