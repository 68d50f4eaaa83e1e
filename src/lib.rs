//! # covenant-di
//!
//! Contract-based dependency injection for Rust.
//!
//! ## Features
//!
//! - **Contracts**: bind an abstraction (concrete type or `dyn Trait`) to a
//!   constructed type, a fixed instance, a factory or a custom source
//! - **Lifetimes**: singleton and transient caching, or a custom strategy
//! - **Constructor selection**: marked constructors win, otherwise the single
//!   public one; pluggable through [`ConstructorSelector`]
//! - **Collections**: every binding of `T` as `Vec<Arc<T>>`, `Box<[Arc<T>]>` or
//!   [`ServiceList<T>`], in registration order
//! - **Creation hooks**: run on every constructed instance, e.g. for property
//!   injection
//! - **Circular dependency detection** with the full resolution path
//!
//! ## Quick Start
//!
//! ```rust
//! use covenant_di::{implements, Constructors, Injectable, InjectorConfiguration, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {}", message)
//!     }
//! }
//! implements!(ConsoleLogger => dyn Logger);
//! impl Injectable for ConsoleLogger {
//!     fn constructors(c: &mut Constructors<Self>) {
//!         c.public("new", || ConsoleLogger);
//!     }
//! }
//!
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//! }
//! impl Injectable for UserService {
//!     fn constructors(c: &mut Constructors<Self>) {
//!         c.public("new", |logger: Arc<dyn Logger>| UserService { logger });
//!     }
//! }
//!
//! let mut config = InjectorConfiguration::new();
//! config.bind::<dyn Logger>().to::<ConsoleLogger>().as_singleton();
//! config.bind::<UserService>().to_self();
//!
//! let injector = config.build().unwrap();
//! let users = injector.get::<UserService>().unwrap();
//! assert_eq!(users.logger.log("hello"), "[LOG] hello");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: created once per injector, on first resolution
//! - **Transient**: created fresh on every resolution (the default)
//!
//! ## Types without a contract
//!
//! [`Injector::create_instance`] constructs any [`Injectable`] type, resolving
//! its constructor parameters from the injector:
//!
//! ```rust
//! use covenant_di::{Constructors, Injectable, InjectorConfiguration};
//! use std::sync::Arc;
//!
//! struct Report {
//!     title: Arc<String>,
//! }
//! impl Injectable for Report {
//!     fn constructors(c: &mut Constructors<Self>) {
//!         c.public("new", |title: Arc<String>| Report { title });
//!     }
//! }
//!
//! let mut config = InjectorConfiguration::new();
//! config.bind::<String>().to_instance(Arc::new("Q3".to_string()));
//! let injector = config.build().unwrap();
//!
//! let report = injector.create_instance::<Report>().unwrap();
//! assert_eq!(report.title.as_str(), "Q3");
//! ```

pub mod config;
pub mod configuration;
pub mod contract;
pub mod descriptors;
pub mod error;
pub mod injector;
pub mod key;
pub mod lifetime;
pub mod metadata;
pub mod observer;
pub mod selector;
pub mod traits;

mod dependency_resolver;
mod internal;
mod registration;

pub use config::InjectorOptions;
pub use configuration::module::{InjectorConfigurationExt, InjectorModule};
pub use configuration::InjectorConfiguration;
pub use contract::{CachingStrategy, ContractSet, InstanceSource, ReleaseFn, SingletonCaching, TransientCaching};
pub use descriptors::{ContractDescriptor, SourceKind};
pub use error::{DiError, DiResult, ErrorCause, PanicCause};
pub use injector::{property_injection_hook, CreatedInstance, CreationHook, Injector, Method};
pub use key::{key_of_type, CollectionShape, ElementKey, FromElements, Key, ServiceList};
pub use lifetime::Lifetime;
pub use metadata::{
    ConstructorDescriptor, Constructors, Injectable, InjectableFn, Markers, Properties, PropertyDescriptor,
    TypeMetadata, Visibility,
};
pub use observer::{DiObserver, LoggingObserver, MetricsObserver};
pub use registration::{AnyArc, ContractBuilder};
pub use selector::{CachedConstructorSelector, ConstructorSelector, DefaultConstructorSelector};
pub use traits::{Dispose, Implements, Inject, Resolver, ResolverCore};
