//! Contract registration: the registry and its fluent builders.

use std::any::{type_name, Any};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::contract::source::{ConstructSource, FactorySource, FixedInstance, SelfSource};
use crate::contract::{
    CachingStrategy, Contract, ContractSet, InstanceSource, ReleaseFn, SingletonCaching,
    TransientCaching, TypedContract,
};
use crate::descriptors::{ContractDescriptor, SourceKind};
use crate::error::{DiError, DiResult};
use crate::injector::{Injector, InjectorRef};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::metadata::Injectable;
use crate::traits::{Dispose, Implements};

/// Type-erased `Arc` as handed out by resolvers.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

type CachingFactory<T> = Arc<dyn Fn() -> Box<dyn CachingStrategy<T>> + Send + Sync>;

enum Caching<T: ?Sized> {
    Default,
    Lifetime(Lifetime),
    Custom(CachingFactory<T>),
}

/// Shared state of one registration, filled in through its [`ContractBuilder`].
pub(crate) struct ContractSlot<T: ?Sized> {
    source: Option<Arc<dyn InstanceSource<T>>>,
    caching: Caching<T>,
    on_release: Option<ReleaseFn<T>>,
}

impl<T: ?Sized> ContractSlot<T> {
    fn new() -> Self {
        Self {
            source: None,
            caching: Caching::Default,
            on_release: None,
        }
    }

    fn lifetime(&self, default: Lifetime) -> Option<Lifetime> {
        match &self.caching {
            Caching::Default => Some(default),
            Caching::Lifetime(lifetime) => Some(*lifetime),
            Caching::Custom(_) => None,
        }
    }
}

/// Registration compilable into a contract.
pub(crate) trait BuildContract: Send {
    fn key(&self) -> Key;

    fn is_configured(&self) -> bool;

    fn describe(&self, ordinal: usize, default_lifetime: Lifetime) -> ContractDescriptor;

    fn build_contract(
        &self,
        ordinal: usize,
        injector: &InjectorRef,
        default_lifetime: Lifetime,
    ) -> DiResult<Arc<dyn Contract>>;
}

impl<T: ?Sized + Send + Sync + 'static> BuildContract for Arc<Mutex<ContractSlot<T>>> {
    fn key(&self) -> Key {
        Key::of::<T>()
    }

    fn is_configured(&self) -> bool {
        self.lock().source.is_some()
    }

    fn describe(&self, ordinal: usize, default_lifetime: Lifetime) -> ContractDescriptor {
        let slot = self.lock();
        ContractDescriptor {
            type_id: std::any::TypeId::of::<T>(),
            type_name: type_name::<T>(),
            ordinal,
            lifetime: slot.lifetime(default_lifetime),
            source: slot.source.as_ref().map_or(SourceKind::Unbound, |s| s.kind()),
        }
    }

    fn build_contract(
        &self,
        ordinal: usize,
        injector: &InjectorRef,
        default_lifetime: Lifetime,
    ) -> DiResult<Arc<dyn Contract>> {
        let slot = self.lock();
        let source = slot
            .source
            .clone()
            .ok_or(DiError::Unconfigured(type_name::<T>()))?;

        let lifetime = slot.lifetime(default_lifetime);
        let caching: Box<dyn CachingStrategy<T>> = match (&slot.caching, lifetime) {
            (Caching::Custom(factory), _) => factory(),
            (_, Some(Lifetime::Singleton)) => match &slot.on_release {
                Some(on_release) => Box::new(SingletonCaching::with_release(Arc::clone(on_release))),
                None => Box::new(SingletonCaching::new()),
            },
            _ => Box::new(TransientCaching),
        };

        Ok(Arc::new(TypedContract::new(
            ordinal,
            lifetime,
            injector.clone(),
            Box::new(SharedSource(source)),
            caching,
        )))
    }
}

// Lets one configured source back the contracts of several injectors.
struct SharedSource<T: ?Sized>(Arc<dyn InstanceSource<T>>);

impl<T: ?Sized> InstanceSource<T> for SharedSource<T> {
    fn resolve(&self, injector: &Injector) -> DiResult<Arc<T>> {
        self.0.resolve(injector)
    }

    fn kind(&self) -> SourceKind {
        self.0.kind()
    }

    fn verify(&self, injector: &Injector) -> DiResult<()> {
        self.0.verify(injector)
    }
}

/// Ordered collection of registrations.
///
/// Registrations keep global insertion order; per abstraction, that order is
/// the order in which collections are resolved and "first" is chosen.
#[derive(Default)]
pub(crate) struct ContractRegistry {
    entries: Vec<Box<dyn BuildContract>>,
}

impl ContractRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a registration for `T`. Never replaces an earlier one.
    pub(crate) fn add<T: ?Sized + Send + Sync + 'static>(&mut self) -> ContractBuilder<T> {
        let slot = Arc::new(Mutex::new(ContractSlot::new()));
        self.entries.push(Box::new(Arc::clone(&slot)));
        ContractBuilder { slot }
    }

    /// Drops every registration for `key`, returning how many were removed.
    pub(crate) fn remove_all(&mut self, key: &Key) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key() != *key);
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn descriptors(&self, default_lifetime: Lifetime) -> Vec<ContractDescriptor> {
        self.entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| entry.describe(ordinal, default_lifetime))
            .collect()
    }

    /// Compiles every registration into a [`ContractSet`] bound to `injector`.
    ///
    /// Fails on the first registration that was never bound to a source.
    pub(crate) fn compile(&self, injector: &InjectorRef, default_lifetime: Lifetime) -> DiResult<ContractSet> {
        let contracts = self
            .entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| entry.build_contract(ordinal, injector, default_lifetime))
            .collect::<DiResult<Vec<_>>>()?;
        Ok(ContractSet::new(contracts))
    }

    /// Registers the injector as the sole contract of [`Injector`].
    pub(crate) fn register_injector(&mut self) {
        let removed = self.remove_all(&Key::of::<Injector>());
        if removed > 0 {
            tracing::warn!(removed, "ignoring user contracts for the injector type");
        }
        self.add::<Injector>().to_source(SelfSource).as_transient();
    }
}

/// Fluent builder configuring one contract of the abstraction `T`.
///
/// Returned by [`InjectorConfiguration::bind`](crate::InjectorConfiguration::bind).
/// A contract must be bound to an instance source (`to`, `to_self`,
/// `to_instance`, `to_factory`, `to_try_factory` or `to_source`) before the
/// injector is built. Binding again replaces the previous source.
///
/// # Examples
///
/// ```
/// use covenant_di::{implements, Constructors, Injectable, InjectorConfiguration, Resolver};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
/// impl Injectable for FixedClock {
///     fn constructors(c: &mut Constructors<Self>) {
///         c.public("new", || FixedClock);
///     }
/// }
/// implements!(FixedClock => dyn Clock);
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<dyn Clock>().to::<FixedClock>().as_singleton();
///
/// let injector = config.build().unwrap();
/// let a = injector.get::<dyn Clock>().unwrap();
/// let b = injector.get::<dyn Clock>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.now(), 42);
/// ```
pub struct ContractBuilder<T: ?Sized> {
    slot: Arc<Mutex<ContractSlot<T>>>,
}

impl<T: ?Sized + Send + Sync + 'static> ContractBuilder<T> {
    /// Constructs `C` through its selected constructor on every cache miss.
    pub fn to<C>(self) -> Self
    where
        C: Injectable + Implements<T>,
    {
        self.to_source(ConstructSource::<C, T>::new())
    }

    /// Always hands out `instance`.
    pub fn to_instance(self, instance: Arc<T>) -> Self {
        self.to_source(FixedInstance(instance))
    }

    /// Invokes `factory` on every cache miss.
    ///
    /// A panic inside the factory is reported as [`DiError::Creation`].
    pub fn to_factory<F>(self, factory: F) -> Self
    where
        F: Fn(&Injector) -> Arc<T> + Send + Sync + 'static,
    {
        self.to_source(FactorySource::new(Box::new(move |injector: &Injector| Ok(factory(injector)))))
    }

    /// Invokes a fallible `factory` on every cache miss.
    pub fn to_try_factory<F>(self, factory: F) -> Self
    where
        F: Fn(&Injector) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.to_source(FactorySource::new(Box::new(factory)))
    }

    /// Binds a custom instance source.
    pub fn to_source<S>(self, source: S) -> Self
    where
        S: InstanceSource<T> + 'static,
    {
        self.slot.lock().source = Some(Arc::new(source));
        self
    }

    /// Caches a single instance for the injector's lifetime.
    pub fn as_singleton(self) -> Self {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// Creates a new instance on every resolution.
    pub fn as_transient(self) -> Self {
        self.with_lifetime(Lifetime::Transient)
    }

    pub fn with_lifetime(self, lifetime: Lifetime) -> Self {
        self.slot.lock().caching = Caching::Lifetime(lifetime);
        self
    }

    /// Uses a custom caching strategy; `factory` runs once per built injector.
    pub fn with_caching<S, F>(self, factory: F) -> Self
    where
        S: CachingStrategy<T> + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        let factory: CachingFactory<T> = Arc::new(move || Box::new(factory()) as Box<dyn CachingStrategy<T>>);
        self.slot.lock().caching = Caching::Custom(factory);
        self
    }

    /// Runs `on_release` on the cached singleton when the injector is disposed.
    ///
    /// Ignored for transient and custom caching.
    pub fn on_release<F>(self, on_release: F) -> Self
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.slot.lock().on_release = Some(Arc::new(on_release));
        self
    }
}

impl<T: Injectable> ContractBuilder<T> {
    /// Constructs `T` itself.
    pub fn to_self(self) -> Self {
        self.to::<T>()
    }
}

impl<T: ?Sized + Dispose + 'static> ContractBuilder<T> {
    /// Disposes the cached singleton when the injector is disposed.
    ///
    /// Only singleton contracts cache an instance to dispose; on other
    /// lifetimes this has no effect.
    pub fn disposed(self) -> Self {
        self.on_release(|instance: &Arc<T>| instance.dispose())
    }

    /// Shorthand for `.as_singleton().disposed()`.
    pub fn as_disposable_singleton(self) -> Self {
        self.as_singleton().disposed()
    }
}
