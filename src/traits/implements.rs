//! Upcasting from concrete types to the abstractions they are bound to.

use std::sync::Arc;

/// Capability of a concrete type `Self` to stand in for the abstract type `T`.
///
/// Every sized type implements `Implements<Self>`. Bindings to trait objects
/// need one impl per `dyn Trait`, which the [`implements!`](crate::implements)
/// macro generates.
///
/// # Examples
///
/// ```
/// use covenant_di::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> &'static str;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> &'static str { "hello" }
/// }
///
/// implements!(English => dyn Greeter);
///
/// let greeter: Arc<dyn Greeter> = <English as Implements<dyn Greeter>>::upcast(Arc::new(English));
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Implements<T: ?Sized>: Send + Sync + 'static {
    /// Converts a shared concrete instance into the abstraction.
    fn upcast(this: Arc<Self>) -> Arc<T>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn upcast(this: Arc<Self>) -> Arc<T> {
        this
    }
}

/// Declares that a concrete type implements one or more trait-object abstractions.
///
/// ```
/// use covenant_di::implements;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($target:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$target> for $concrete {
                #[inline]
                fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$target> {
                    this
                }
            }
        )+
    };
}
