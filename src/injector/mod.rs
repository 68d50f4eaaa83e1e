//! The injector: resolves requested types and constructs instances.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::config::InjectorOptions;
use crate::contract::ContractSet;
use crate::dependency_resolver::DependencyResolver;
use crate::descriptors::ContractDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::catch_creation;
use crate::key::Key;
use crate::metadata::{ConstructorDescriptor, Injectable, Markers, TypeMetadata};
use crate::observer::Observers;
use crate::registration::{AnyArc, ContractRegistry};
use crate::selector::{CachedConstructorSelector, ConstructorSelector};
use crate::traits::ResolverCore;

mod hooks;
mod method;
mod property;

pub use hooks::{CreatedInstance, CreationHook};
pub use method::Method;
pub use property::property_injection_hook;

/// Everything an injector is built from.
pub(crate) struct InjectorParts {
    pub(crate) registry: ContractRegistry,
    pub(crate) selector: Arc<dyn ConstructorSelector>,
    pub(crate) hooks: Vec<CreationHook>,
    pub(crate) markers: Markers,
    pub(crate) observers: Observers,
    pub(crate) options: InjectorOptions,
}

pub(crate) struct InjectorInner {
    resolver: OnceCell<DependencyResolver>,
    selector: CachedConstructorSelector,
    metadata: RwLock<AHashMap<TypeId, Arc<TypeMetadata>>>,
    markers: Markers,
    hooks: Vec<CreationHook>,
    observers: Observers,
    options: InjectorOptions,
    disposed: AtomicBool,
}

impl InjectorInner {
    fn release(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(resolver) = self.resolver.get() {
            // Reverse registration order: later contracts may depend on earlier ones.
            for contract in resolver.contracts().iter().rev() {
                contract.release();
            }
            tracing::debug!(contracts = resolver.contracts().len(), "injector disposed");
        }
    }
}

/// Disposes the injector when the last owning handle is dropped.
struct DisposeOnDrop(Arc<InjectorInner>);

impl Drop for DisposeOnDrop {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Non-owning handle held by contracts, so that contracts do not keep their
/// injector alive.
#[derive(Clone)]
pub(crate) struct InjectorRef(Weak<InjectorInner>);

impl InjectorRef {
    /// A handle for resolving. It does not own the injector.
    pub(crate) fn upgrade(&self) -> DiResult<Injector> {
        self.0
            .upgrade()
            .map(|inner| Injector { inner, owner: None })
            .ok_or(DiError::Disposed)
    }

    #[cfg(test)]
    pub(crate) fn dangling() -> Self {
        InjectorRef(Weak::new())
    }
}

/// Resolves requested types against an immutable set of contracts.
///
/// An injector is built from an [`InjectorConfiguration`](crate::InjectorConfiguration)
/// and is cheap to clone; clones share contracts and cached singletons. It is
/// always resolvable as itself, both directly and as a constructor parameter.
///
/// All operations are safe to call concurrently.
///
/// The handle returned by [`build`](crate::InjectorConfiguration::build) and its
/// clones own the injector: dropping the last of them disposes it. Handles the
/// injector hands out itself, as a resolved or injected `Injector`, do not own
/// it. A singleton may therefore keep such a handle without keeping the
/// injector, or itself, alive; once the injector is disposed the handle fails
/// with [`DiError::Disposed`].
///
/// # Examples
///
/// ```
/// use covenant_di::{Constructors, Injectable, Injector, InjectorConfiguration, Resolver};
/// use std::sync::Arc;
///
/// struct Service {
///     injector: Injector,
/// }
///
/// impl Injectable for Service {
///     fn constructors(c: &mut Constructors<Self>) {
///         c.public("new", |injector: Injector| Service { injector });
///     }
/// }
///
/// let injector = InjectorConfiguration::new().build().unwrap();
/// let service = injector.create_instance::<Service>().unwrap();
/// assert!(Injector::ptr_eq(&service.injector, &injector));
///
/// let itself = injector.get::<Injector>().unwrap();
/// assert!(Injector::ptr_eq(&itself, &injector));
/// ```
#[derive(Clone)]
pub struct Injector {
    owner: Option<Arc<DisposeOnDrop>>,
    inner: Arc<InjectorInner>,
}

impl Injector {
    pub(crate) fn build(parts: InjectorParts) -> DiResult<Self> {
        let InjectorParts {
            mut registry,
            selector,
            hooks,
            markers,
            observers,
            options,
        } = parts;

        options.validate()?;
        registry.register_injector();

        let inner = Arc::new(InjectorInner {
            resolver: OnceCell::new(),
            selector: CachedConstructorSelector::new(selector),
            metadata: RwLock::new(AHashMap::new()),
            markers,
            hooks,
            observers,
            options,
            disposed: AtomicBool::new(false),
        });
        let owner = Arc::new(DisposeOnDrop(Arc::clone(&inner)));
        let injector = Injector {
            inner,
            owner: Some(owner),
        };

        let options = &injector.inner.options;
        let contracts = registry.compile(&injector.downgrade(), options.default_lifetime)?;
        let count = contracts.len();
        let _ = injector
            .inner
            .resolver
            .set(DependencyResolver::new(injector.id(), contracts, options.max_depth));

        if options.verify_on_build {
            for contract in injector.resolver()?.contracts().iter() {
                contract.verify()?;
            }
        }

        tracing::debug!(
            contracts = count,
            hooks = injector.inner.hooks.len(),
            "injector built"
        );
        Ok(injector)
    }

    pub(crate) fn downgrade(&self) -> InjectorRef {
        InjectorRef(Arc::downgrade(&self.inner))
    }

    fn resolver(&self) -> DiResult<&DependencyResolver> {
        if self.inner.disposed.load(Ordering::Acquire) {
            return Err(DiError::Disposed);
        }
        self.inner.resolver.get().ok_or(DiError::Disposed)
    }

    /// Whether two handles refer to the same injector.
    pub fn ptr_eq(a: &Injector, b: &Injector) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Whether this handle keeps the injector from being disposed on drop.
    pub fn is_owner(&self) -> bool {
        self.owner.is_some()
    }

    /// A handle to the same injector that does not own it.
    pub(crate) fn unowned(&self) -> Injector {
        Injector {
            inner: Arc::clone(&self.inner),
            owner: None,
        }
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Resolves `key` without notifying observers.
    pub(crate) fn resolve_inner(&self, key: &Key) -> DiResult<AnyArc> {
        let value = self.resolver()?.resolve(key)?;
        if !key.accepts(&value) {
            return Err(DiError::TypeMismatch(key.display_name()));
        }
        Ok(value)
    }

    pub(crate) fn resolve_all(&self, keys: &[Key]) -> DiResult<Vec<AnyArc>> {
        keys.iter().map(|key| self.resolve_inner(key)).collect()
    }

    /// Constructs a new `C` through its selected constructor.
    ///
    /// Parameters are resolved left to right, then every creation hook runs on
    /// the new instance, in registration order. `C` does not need a contract.
    ///
    /// # Errors
    ///
    /// * Constructor selection errors ([`DiError::NoConstructor`],
    ///   [`DiError::AmbiguousConstructor`], [`DiError::MultipleInjectedConstructors`])
    /// * Any resolution error of a parameter, unchanged
    /// * [`DiError::Creation`] when the constructor or a hook fails or panics
    pub fn create_instance<C: Injectable>(&self) -> DiResult<Arc<C>> {
        let metadata = self.metadata_of::<C>();
        let constructor = self.inner.selector.select(&metadata, &self.inner.markers)?;
        let instance = self.construct(&metadata, &constructor)?;
        instance
            .downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(type_name::<C>()))
    }

    /// Constructor the injector uses for `C`.
    pub fn select_constructor<C: Injectable>(&self) -> DiResult<Arc<ConstructorDescriptor>> {
        let metadata = self.metadata_of::<C>();
        self.inner.selector.select(&metadata, &self.inner.markers)
    }

    fn construct(&self, metadata: &TypeMetadata, constructor: &ConstructorDescriptor) -> DiResult<AnyArc> {
        let start = Instant::now();
        let type_name = metadata.type_name();
        let args = self.resolve_all(constructor.parameters())?;
        let instance =
            catch_creation(type_name, || constructor.invoke(&args)).map_err(|e| classify(type_name, e))?;

        if !self.inner.hooks.is_empty() {
            let created = CreatedInstance::new(&instance, metadata);
            for hook in &self.inner.hooks {
                catch_creation(type_name, || hook(self, &created)).map_err(|e| classify(type_name, e))?;
            }
        }

        let elapsed = start.elapsed();
        tracing::trace!(
            service = type_name,
            constructor = constructor.name(),
            elapsed_us = elapsed.as_micros() as u64,
            "instance created"
        );
        if self.inner.observers.has_observers() {
            self.inner.observers.created(type_name, elapsed);
        }
        Ok(instance)
    }

    /// Metadata of `C`, collected once per injector.
    pub fn metadata_of<C: Injectable>(&self) -> Arc<TypeMetadata> {
        let type_id = TypeId::of::<C>();
        if let Some(metadata) = self.inner.metadata.read().get(&type_id) {
            return Arc::clone(metadata);
        }
        let mut cache = self.inner.metadata.write();
        Arc::clone(
            cache
                .entry(type_id)
                .or_insert_with(|| Arc::new(TypeMetadata::of::<C>())),
        )
    }

    pub(crate) fn markers(&self) -> &Markers {
        &self.inner.markers
    }

    /// Releases every cached instance, in reverse registration order.
    ///
    /// Idempotent. Also runs when the last owning handle is dropped. Cached
    /// singletons are dropped after their release callbacks ran. Resolutions
    /// after disposal fail with [`DiError::Disposed`].
    pub fn dispose(&self) {
        self.inner.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Compiled contracts.
    pub fn contracts(&self) -> DiResult<&ContractSet> {
        self.resolver().map(DependencyResolver::contracts)
    }

    /// Descriptors of every contract, the injector's own included.
    pub fn descriptors(&self) -> Vec<ContractDescriptor> {
        self.inner
            .resolver
            .get()
            .map(|resolver| resolver.contracts().descriptors())
            .unwrap_or_default()
    }

    pub fn options(&self) -> &InjectorOptions {
        &self.inner.options
    }

    /// Dumps the compiled contracts to the `tracing` output.
    #[cfg(feature = "diagnostics")]
    pub fn dump_contracts(&self) {
        for descriptor in self.descriptors() {
            tracing::info!(
                ordinal = descriptor.ordinal,
                service = descriptor.type_name,
                lifetime = ?descriptor.lifetime,
                source = ?descriptor.source,
                "contract"
            );
        }
    }
}

// Resolution errors pass through; anything else becomes a creation failure.
fn classify(type_name: &'static str, error: DiError) -> DiError {
    if error.is_resolution_error() {
        error
    } else {
        DiError::creation(type_name, error)
    }
}

impl ResolverCore for Injector {
    fn resolve_key(&self, key: &Key) -> DiResult<AnyArc> {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return self.resolve_inner(key);
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = self.resolve_inner(key);
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => observers.resolution_failed(key, error),
        }
        result
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("contracts", &self.inner.resolver.get().map(|r| r.contracts().len()))
            .field("hooks", &self.inner.hooks.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
