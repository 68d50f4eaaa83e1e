//! Types that can be requested from an injector or injected as parameters.

use std::sync::Arc;

use crate::injector::Injector;
use crate::key::{Key, ServiceList};
use crate::registration::AnyArc;

/// A type the injector can hand out: a single service, a collection of
/// services, or the injector itself.
///
/// | Request type          | Resolves                                  |
/// |-----------------------|-------------------------------------------|
/// | `Arc<T>`              | first contract of `T`                     |
/// | `Vec<Arc<T>>`         | every contract of `T`, registration order |
/// | `Box<[Arc<T>]>`       | every contract of `T`, registration order |
/// | `ServiceList<T>`      | every contract of `T`, registration order |
/// | `Injector`            | the resolving injector                    |
///
/// Constructor and method parameters are resolved through this trait.
pub trait Inject: Sized + Send + 'static {
    /// Key requested from the resolver.
    fn key() -> Key;

    /// Extracts the typed value from a resolved instance.
    ///
    /// Returns `None` if `value` is not an instance of the requested type.
    fn from_resolved(value: &AnyArc) -> Option<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Arc<T> {
    #[inline]
    fn key() -> Key {
        Key::of::<T>()
    }

    #[inline]
    fn from_resolved(value: &AnyArc) -> Option<Self> {
        value.downcast_ref::<Arc<T>>().cloned()
    }
}

fn unwrap_collection<C: Clone + Send + Sync + 'static>(value: &AnyArc) -> Option<C> {
    value.downcast_ref::<Arc<C>>().map(|shared| (**shared).clone())
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Vec<Arc<T>> {
    fn key() -> Key {
        Key::collection::<T, Self>()
    }

    fn from_resolved(value: &AnyArc) -> Option<Self> {
        unwrap_collection(value)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Box<[Arc<T>]> {
    fn key() -> Key {
        Key::collection::<T, Self>()
    }

    fn from_resolved(value: &AnyArc) -> Option<Self> {
        unwrap_collection(value)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Inject for ServiceList<T> {
    fn key() -> Key {
        Key::collection::<T, Self>()
    }

    fn from_resolved(value: &AnyArc) -> Option<Self> {
        unwrap_collection(value)
    }
}

impl Inject for Injector {
    fn key() -> Key {
        Key::of::<Injector>()
    }

    fn from_resolved(value: &AnyArc) -> Option<Self> {
        value.downcast_ref::<Arc<Injector>>().map(|injector| (**injector).clone())
    }
}
