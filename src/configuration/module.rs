//! Module system for grouping contract registrations.

use crate::configuration::InjectorConfiguration;
use crate::error::DiResult;

/// A reusable group of bindings, hooks and markers.
///
/// # Example
///
/// ```rust
/// use covenant_di::{
///     Constructors, DiResult, Injectable, InjectorConfiguration, InjectorConfigurationExt,
///     InjectorModule, Resolver,
/// };
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct UserConfig;
///
/// struct UserService {
///     config: Arc<UserConfig>,
/// }
///
/// impl Injectable for UserService {
///     fn constructors(c: &mut Constructors<Self>) {
///         c.public("new", |config: Arc<UserConfig>| UserService { config });
///     }
/// }
///
/// struct UserModule;
///
/// impl InjectorModule for UserModule {
///     fn configure(self, config: &mut InjectorConfiguration) -> DiResult<()> {
///         config.bind::<UserConfig>().to_instance(Arc::new(UserConfig::default()));
///         config.bind::<UserService>().to_self().as_singleton();
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let injector = InjectorConfiguration::new().add_module(UserModule)?.build()?;
/// let users = injector.get::<UserService>()?;
/// # let _ = &users.config;
/// # Ok(())
/// # }
/// ```
pub trait InjectorModule {
    /// Adds this module's registrations to `config`.
    fn configure(self, config: &mut InjectorConfiguration) -> DiResult<()>;
}

/// Module registration on an [`InjectorConfiguration`].
pub trait InjectorConfigurationExt {
    /// Applies a module, consuming and returning the configuration.
    ///
    /// ```rust
    /// use covenant_di::{DiResult, InjectorConfiguration, InjectorConfigurationExt, InjectorModule};
    ///
    /// struct DatabaseModule;
    /// impl InjectorModule for DatabaseModule {
    ///     fn configure(self, _: &mut InjectorConfiguration) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// struct UserModule;
    /// impl InjectorModule for UserModule {
    ///     fn configure(self, _: &mut InjectorConfiguration) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// # fn main() -> DiResult<()> {
    /// let injector = InjectorConfiguration::new()
    ///     .add_module(DatabaseModule)?
    ///     .add_module(UserModule)?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    fn add_module<M: InjectorModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;

    /// Applies a module in place.
    fn add_module_mut<M: InjectorModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl InjectorConfigurationExt for InjectorConfiguration {
    fn add_module<M: InjectorModule>(mut self, module: M) -> DiResult<Self> {
        module.configure(&mut self)?;
        Ok(self)
    }

    fn add_module_mut<M: InjectorModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.configure(self)?;
        Ok(self)
    }
}
