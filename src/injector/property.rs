//! Property injection.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{DiError, DiResult};
use crate::injector::{CreatedInstance, CreationHook, Injector};
use crate::metadata::{Injectable, TypeMetadata};
use crate::registration::AnyArc;

impl Injector {
    /// Assigns every property of `instance` marked for injection.
    ///
    /// Properties are visited in declaration order. A marked property without
    /// a setter fails with [`DiError::MissingSetter`] before anything is
    /// resolved for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_di::{Constructors, Injectable, InjectorConfiguration, Properties};
    /// use parking_lot::Mutex;
    /// use std::sync::Arc;
    ///
    /// struct Handler {
    ///     name: Mutex<Option<Arc<String>>>,
    /// }
    ///
    /// impl Injectable for Handler {
    ///     fn constructors(c: &mut Constructors<Self>) {
    ///         c.public("new", || Handler { name: Mutex::new(None) });
    ///     }
    ///
    ///     fn properties(p: &mut Properties<Self>) {
    ///         p.settable("name", |h: &Handler, name: Arc<String>| *h.name.lock() = Some(name))
    ///             .injected();
    ///     }
    /// }
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.bind::<String>().to_instance(Arc::new("orders".to_string()));
    /// let injector = config.build().unwrap();
    ///
    /// let handler = Arc::new(Handler { name: Mutex::new(None) });
    /// injector.inject_properties(&handler).unwrap();
    /// assert_eq!(handler.name.lock().as_deref().map(String::as_str), Some("orders"));
    /// ```
    pub fn inject_properties<C: Injectable>(&self, instance: &Arc<C>) -> DiResult<()> {
        let metadata = self.metadata_of::<C>();
        let erased: AnyArc = Arc::new(Arc::clone(instance));
        self.inject_into(&metadata, &erased)
    }

    /// Assigns the marked properties of an instance passed to a creation hook.
    pub fn inject_created(&self, created: &CreatedInstance<'_>) -> DiResult<()> {
        self.inject_into(created.metadata(), created.as_any())
    }

    fn inject_into(&self, metadata: &TypeMetadata, instance: &AnyArc) -> DiResult<()> {
        for property in metadata.injected_properties(self.markers()) {
            if !property.has_setter() {
                return Err(DiError::MissingSetter {
                    property: property.name(),
                    type_name: metadata.type_name(),
                });
            }
            let value = self.resolve_inner(property.key())?;
            property.assign(instance, &value)?;
            tracing::trace!(service = metadata.type_name(), property = property.name(), "property injected");
        }
        Ok(())
    }
}

fn inject_marked(injector: &Injector, created: &CreatedInstance<'_>) -> DiResult<()> {
    injector.inject_created(created)
}

static PROPERTY_INJECTION: Lazy<CreationHook> = Lazy::new(|| Arc::new(inject_marked) as CreationHook);

/// Creation hook injecting the marked properties of every constructed instance.
///
/// Every call returns the same shared hook, so adding it from several modules
/// registers it once.
///
/// ```
/// use covenant_di::{property_injection_hook, InjectorConfiguration};
///
/// let mut config = InjectorConfiguration::new();
/// config.add_creation_hook_arc(property_injection_hook());
/// config.add_creation_hook_arc(property_injection_hook());
/// assert_eq!(config.hook_count(), 1);
/// ```
pub fn property_injection_hook() -> CreationHook {
    Arc::clone(&PROPERTY_INJECTION)
}
