//! Injector configuration: bindings, creation hooks, markers and options.

use std::sync::Arc;

use crate::config::InjectorOptions;
use crate::descriptors::ContractDescriptor;
use crate::error::{DiError, DiResult};
use crate::injector::{CreatedInstance, CreationHook, Injector, InjectorParts};
use crate::metadata::{Injectable, Markers};
use crate::observer::{DiObserver, Observers};
use crate::registration::{ContractBuilder, ContractRegistry};
use crate::selector::{ConstructorSelector, DefaultConstructorSelector};

pub mod module;

/// Mutable description of an injector.
///
/// Bind abstractions to instance sources with [`bind`](Self::bind), then call
/// [`build`](Self::build). Binding the same abstraction several times keeps every
/// binding: single requests use the first one, collection requests get all of
/// them in registration order.
///
/// # Examples
///
/// ```rust
/// use covenant_di::{implements, Constructors, Injectable, InjectorConfiguration, Resolver};
/// use std::sync::Arc;
///
/// trait Plugin: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct Alpha;
/// impl Plugin for Alpha {
///     fn name(&self) -> &'static str { "alpha" }
/// }
/// impl Injectable for Alpha {
///     fn constructors(c: &mut Constructors<Self>) {
///         c.public("new", || Alpha);
///     }
/// }
/// implements!(Alpha => dyn Plugin);
///
/// struct Beta;
/// impl Plugin for Beta {
///     fn name(&self) -> &'static str { "beta" }
/// }
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<dyn Plugin>().to::<Alpha>();
/// config.bind::<dyn Plugin>().to_instance(Arc::new(Beta));
///
/// let injector = config.build().unwrap();
/// assert_eq!(injector.get::<dyn Plugin>().unwrap().name(), "alpha");
///
/// let names: Vec<_> = injector.get_all::<dyn Plugin>().unwrap().iter().map(|p| p.name()).collect();
/// assert_eq!(names, vec!["alpha", "beta"]);
/// ```
pub struct InjectorConfiguration {
    registry: ContractRegistry,
    hooks: Vec<CreationHook>,
    markers: Markers,
    selector: Arc<dyn ConstructorSelector>,
    observers: Observers,
    options: InjectorOptions,
}

impl InjectorConfiguration {
    /// Creates an empty configuration with default options.
    pub fn new() -> Self {
        Self {
            registry: ContractRegistry::new(),
            hooks: Vec::new(),
            markers: Markers::new(),
            selector: Arc::new(DefaultConstructorSelector),
            observers: Observers::new(),
            options: InjectorOptions::default(),
        }
    }

    /// Adds a contract for the abstraction `T` and returns its builder.
    ///
    /// The contract must be bound to a source before [`build`](Self::build).
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&mut self) -> ContractBuilder<T> {
        self.registry.add::<T>()
    }

    /// Adds a creation hook run on every constructed instance.
    ///
    /// ```
    /// use covenant_di::InjectorConfiguration;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let created = Arc::new(AtomicUsize::new(0));
    /// let counter = created.clone();
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.add_creation_hook(move |_, instance| {
    ///     counter.fetch_add(1, Ordering::SeqCst);
    ///     println!("created {}", instance.type_name());
    ///     Ok(())
    /// });
    /// assert_eq!(config.hook_count(), 1);
    /// ```
    pub fn add_creation_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Injector, &CreatedInstance<'_>) -> DiResult<()> + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Adds a shared creation hook. Adding the same hook twice has no effect.
    pub fn add_creation_hook_arc(&mut self, hook: CreationHook) -> &mut Self {
        if !self.hooks.iter().any(|existing| Arc::ptr_eq(existing, &hook)) {
            self.hooks.push(hook);
        }
        self
    }

    /// Number of distinct creation hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Marks the constructor `name` of `C` for injection.
    ///
    /// Fails with [`DiError::InvalidArgument`] if `C` declares no such constructor.
    pub fn mark_injected_constructor<C: Injectable>(&mut self, name: &'static str) -> DiResult<&mut Self> {
        let metadata = crate::metadata::TypeMetadata::of::<C>();
        if !metadata.constructors().iter().any(|c| c.name() == name) {
            return Err(DiError::InvalidArgument {
                argument: "name",
                reason: "the type declares no constructor with this name",
            });
        }
        self.markers.mark_constructor::<C>(name);
        Ok(self)
    }

    /// Marks the property `name` of `C` for injection.
    ///
    /// Fails with [`DiError::InvalidArgument`] if `C` declares no such property.
    pub fn mark_injected_property<C: Injectable>(&mut self, name: &'static str) -> DiResult<&mut Self> {
        let metadata = crate::metadata::TypeMetadata::of::<C>();
        if !metadata.properties().iter().any(|p| p.name() == name) {
            return Err(DiError::InvalidArgument {
                argument: "name",
                reason: "the type declares no property with this name",
            });
        }
        self.markers.mark_property::<C>(name);
        Ok(self)
    }

    /// Replaces the default constructor selection rules.
    pub fn with_constructor_selector<S>(&mut self, selector: S) -> &mut Self
    where
        S: ConstructorSelector + 'static,
    {
        self.selector = Arc::new(selector);
        self
    }

    /// Adds an observer notified of resolutions and creations.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    pub fn with_options(&mut self, options: InjectorOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &InjectorOptions {
        &self.options
    }

    /// Descriptors of the registered contracts, in registration order.
    ///
    /// The injector's own contract is only added when building.
    pub fn descriptors(&self) -> Vec<ContractDescriptor> {
        self.registry.descriptors(self.options.default_lifetime)
    }

    /// Builds an injector from this configuration.
    ///
    /// # Errors
    ///
    /// * [`DiError::Unconfigured`] if a contract was never bound to a source
    /// * With `verify_on_build`, any constructor selection error of a
    ///   constructed contract
    pub fn build(self) -> DiResult<Injector> {
        tracing::debug!(
            registrations = self.registry.len(),
            hooks = self.hooks.len(),
            "building injector"
        );
        Injector::build(InjectorParts {
            registry: self.registry,
            selector: self.selector,
            hooks: self.hooks,
            markers: self.markers,
            observers: self.observers,
            options: self.options,
        })
    }
}

impl Default for InjectorConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InjectorConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorConfiguration")
            .field("registrations", &self.registry.len())
            .field("hooks", &self.hooks.len())
            .field("options", &self.options)
            .finish()
    }
}
