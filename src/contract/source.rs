//! Instance sources: where a contract obtains instances.

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptors::SourceKind;
use crate::error::DiResult;
use crate::injector::Injector;
use crate::internal::catch_creation;
use crate::metadata::Injectable;
use crate::traits::Implements;

/// Produces instances of the abstraction `T` for a contract.
///
/// Custom sources are attached with
/// [`ContractBuilder::to_source`](crate::ContractBuilder::to_source).
pub trait InstanceSource<T: ?Sized>: Send + Sync {
    /// Produces an instance, using `injector` for any dependencies.
    fn resolve(&self, injector: &Injector) -> DiResult<Arc<T>>;

    /// Kind reported in descriptors.
    fn kind(&self) -> SourceKind {
        SourceKind::Custom
    }

    /// Checks at build time that the source can produce instances.
    fn verify(&self, _injector: &Injector) -> DiResult<()> {
        Ok(())
    }
}

/// Constructs `C` through its selected constructor and upcasts it to `T`.
pub(crate) struct ConstructSource<C, T: ?Sized> {
    _marker: PhantomData<fn() -> (Arc<C>, Arc<T>)>,
}

impl<C, T: ?Sized> ConstructSource<C, T> {
    pub(crate) fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<C, T> InstanceSource<T> for ConstructSource<C, T>
where
    C: Injectable + Implements<T>,
    T: ?Sized + Send + Sync + 'static,
{
    fn resolve(&self, injector: &Injector) -> DiResult<Arc<T>> {
        injector.create_instance::<C>().map(C::upcast)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Construct(type_name::<C>())
    }

    fn verify(&self, injector: &Injector) -> DiResult<()> {
        injector.select_constructor::<C>().map(|_| ())
    }
}

/// Always hands out the same pre-built instance.
pub(crate) struct FixedInstance<T: ?Sized>(pub(crate) Arc<T>);

impl<T: ?Sized + Send + Sync> InstanceSource<T> for FixedInstance<T> {
    fn resolve(&self, _injector: &Injector) -> DiResult<Arc<T>> {
        Ok(Arc::clone(&self.0))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Instance
    }
}

pub(crate) type FactoryFn<T> = dyn Fn(&Injector) -> DiResult<Arc<T>> + Send + Sync;

/// Invokes a user factory. Panics surface as creation errors.
pub(crate) struct FactorySource<T: ?Sized> {
    factory: Box<FactoryFn<T>>,
}

impl<T: ?Sized> FactorySource<T> {
    pub(crate) fn new(factory: Box<FactoryFn<T>>) -> Self {
        Self { factory }
    }
}

impl<T: ?Sized + Send + Sync + 'static> InstanceSource<T> for FactorySource<T> {
    fn resolve(&self, injector: &Injector) -> DiResult<Arc<T>> {
        catch_creation(type_name::<T>(), || (self.factory)(injector))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Factory
    }
}

/// Hands out an unowned handle to the resolving injector.
pub(crate) struct SelfSource;

impl InstanceSource<Injector> for SelfSource {
    fn resolve(&self, injector: &Injector) -> DiResult<Arc<Injector>> {
        Ok(Arc::new(injector.unowned()))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Injector
    }
}
