//! Type metadata consumed by the injector.
//!
//! A type becomes constructible by the injector by implementing [`Injectable`]:
//! it lists its constructors (with their injected parameters) and, optionally,
//! its properties. Members can be marked for injection either here or through
//! [`InjectorConfiguration`](crate::InjectorConfiguration).

use std::any::{type_name, TypeId};
use std::sync::Arc;

mod args;
mod constructor;
mod markers;
mod property;

pub use args::InjectableFn;
pub use constructor::{ConstructorDescriptor, Constructors, Visibility};
pub use markers::Markers;
pub use property::{Properties, PropertyDescriptor};

/// A type the injector can construct.
///
/// # Examples
///
/// ```
/// use covenant_di::{Constructors, Injectable, InjectorConfiguration, Resolver};
/// use std::sync::Arc;
///
/// struct Config {
///     url: String,
/// }
///
/// struct Repository {
///     config: Arc<Config>,
/// }
///
/// impl Injectable for Repository {
///     fn constructors(constructors: &mut Constructors<Self>) {
///         constructors.public("new", |config: Arc<Config>| Repository { config });
///     }
/// }
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<Config>().to_instance(Arc::new(Config { url: "db://".into() }));
/// config.bind::<Repository>().to_self();
///
/// let injector = config.build().unwrap();
/// let repo = injector.get::<Repository>().unwrap();
/// assert_eq!(repo.config.url, "db://");
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declares the constructors of the type.
    fn constructors(constructors: &mut Constructors<Self>);

    /// Declares the properties of the type. None by default.
    fn properties(_properties: &mut Properties<Self>) {}
}

/// Collected metadata of one [`Injectable`] type.
#[derive(Debug)]
pub struct TypeMetadata {
    type_id: TypeId,
    type_name: &'static str,
    constructors: Vec<Arc<ConstructorDescriptor>>,
    properties: Vec<Arc<PropertyDescriptor>>,
}

impl TypeMetadata {
    /// Collects the metadata declared by `C`.
    pub fn of<C: Injectable>() -> Self {
        let mut constructors = Constructors::<C>::new();
        C::constructors(&mut constructors);
        let mut properties = Properties::<C>::new();
        C::properties(&mut properties);

        Self {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            constructors: constructors.into_vec().into_iter().map(Arc::new).collect(),
            properties: properties.into_vec().into_iter().map(Arc::new).collect(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Constructors, in declaration order.
    pub fn constructors(&self) -> &[Arc<ConstructorDescriptor>] {
        &self.constructors
    }

    /// Properties, in declaration order.
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    /// Properties marked for injection, by the type or by `markers`.
    pub fn injected_properties<'a>(
        &'a self,
        markers: &'a Markers,
    ) -> impl Iterator<Item = &'a Arc<PropertyDescriptor>> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.is_injected() || markers.is_property_marked(self.type_id, p.name()))
    }
}
