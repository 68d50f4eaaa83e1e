//! Contracts: the compiled binding of an abstraction to an instance source
//! and a caching strategy.

use std::any::type_name;
use std::sync::Arc;

use crate::descriptors::ContractDescriptor;
use crate::error::DiResult;
use crate::injector::InjectorRef;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;

pub mod caching;
pub mod set;
pub mod source;

pub use caching::{CachingStrategy, ReleaseFn, SingletonCaching, TransientCaching};
pub use set::ContractSet;
pub use source::InstanceSource;

/// Type-erased contract stored in a [`ContractSet`].
pub(crate) trait Contract: Send + Sync {
    fn key(&self) -> &Key;

    /// Resolves an instance: `Arc<T>` wrapped in an [`AnyArc`].
    fn resolve(&self) -> DiResult<AnyArc>;

    /// Releases cached instances.
    fn release(&self);

    /// Build-time check of the instance source.
    fn verify(&self) -> DiResult<()>;

    fn descriptor(&self) -> ContractDescriptor;
}

/// Contract of the abstraction `T`.
pub(crate) struct TypedContract<T: ?Sized> {
    key: Key,
    ordinal: usize,
    lifetime: Option<Lifetime>,
    injector: InjectorRef,
    source: Box<dyn InstanceSource<T>>,
    caching: Box<dyn CachingStrategy<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> TypedContract<T> {
    pub(crate) fn new(
        ordinal: usize,
        lifetime: Option<Lifetime>,
        injector: InjectorRef,
        source: Box<dyn InstanceSource<T>>,
        caching: Box<dyn CachingStrategy<T>>,
    ) -> Self {
        Self {
            key: Key::of::<T>(),
            ordinal,
            lifetime,
            injector,
            source,
            caching,
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Contract for TypedContract<T> {
    fn key(&self) -> &Key {
        &self.key
    }

    fn resolve(&self) -> DiResult<AnyArc> {
        let injector = self.injector.upgrade()?;
        let instance = self.caching.resolve(&injector, self.source.as_ref())?;
        Ok(Arc::new(instance) as AnyArc)
    }

    fn release(&self) {
        self.caching.release();
    }

    fn verify(&self) -> DiResult<()> {
        let injector = self.injector.upgrade()?;
        self.source.verify(&injector)
    }

    fn descriptor(&self) -> ContractDescriptor {
        ContractDescriptor {
            type_id: self.key.type_id(),
            type_name: type_name::<T>(),
            ordinal: self.ordinal,
            lifetime: self.lifetime,
            source: self.source.kind(),
        }
    }
}
