//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::Inject;

/// Core resolver trait for object-safe service resolution.
///
/// This trait provides the fundamental resolution capability that is object-safe
/// (can be used as a trait object). Implementations handle the low-level mechanics:
/// contract lookup, collection assembly and circular dependency detection.
///
/// Most users should use the [`Resolver`] trait instead, which provides ergonomic
/// generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves the value handed out for `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to resolve (single abstraction or collection)
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - `Arc<T>` (or `Arc<C>` for a collection `C`) wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (not found, creation failure, circular, etc.)
    fn resolve_key(&self, key: &Key) -> DiResult<AnyArc>;
}

/// Generic resolution methods available on every [`ResolverCore`].
///
/// Implemented for all resolvers, including `dyn ResolverCore`.
pub trait Resolver: ResolverCore {
    /// Resolves any [`Inject`] type: `Arc<T>`, a collection of `Arc<T>`, or the injector.
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_di::{InjectorConfiguration, Resolver};
    /// use std::sync::Arc;
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.bind::<String>().to_instance(Arc::new("first".to_string()));
    /// config.bind::<String>().to_instance(Arc::new("second".to_string()));
    ///
    /// let injector = config.build().unwrap();
    /// let all = injector.resolve::<Vec<Arc<String>>>().unwrap();
    /// assert_eq!(all.len(), 2);
    /// assert_eq!(&*all[0], "first");
    /// ```
    fn resolve<R: Inject>(&self) -> DiResult<R> {
        let key = R::key();
        let value = self.resolve_key(&key)?;
        R::from_resolved(&value).ok_or(DiError::TypeMismatch(key.display_name()))
    }

    /// Resolves the first contract bound to `T`.
    ///
    /// `T` may be a concrete type or a trait object.
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_di::{implements, InjectorConfiguration, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Database: Send + Sync {
    ///     fn connect(&self) -> &str;
    /// }
    ///
    /// struct PostgresDb;
    /// impl Database for PostgresDb {
    ///     fn connect(&self) -> &str { "postgres://..." }
    /// }
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.bind::<dyn Database>().to_instance(Arc::new(PostgresDb));
    ///
    /// let injector = config.build().unwrap();
    /// let db = injector.get::<dyn Database>().unwrap();
    /// assert_eq!(db.connect(), "postgres://...");
    /// ```
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve::<Arc<T>>()
    }

    /// Resolves every contract bound to `T`, in registration order.
    ///
    /// Fails with [`DiError::NotFound`] when nothing is bound to `T`.
    fn get_all<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Vec<Arc<T>>> {
        self.resolve::<Vec<Arc<T>>>()
    }

    /// Resolves the first contract bound to `T`, panicking on failure.
    ///
    /// Intended for factories whose dependencies are known to be bound. A panic
    /// inside a factory surfaces as [`DiError::Creation`].
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be resolved.
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
