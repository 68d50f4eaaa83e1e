//! Creation hooks: callbacks run on every constructed instance.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::DiResult;
use crate::injector::Injector;
use crate::metadata::TypeMetadata;
use crate::registration::AnyArc;

/// Callback run on every instance the injector constructs, right after its
/// constructor returns and before the instance is handed to anyone.
///
/// Hooks run in registration order; an error or panic aborts creation.
/// Register them with
/// [`InjectorConfiguration::add_creation_hook`](crate::InjectorConfiguration::add_creation_hook).
pub type CreationHook = Arc<dyn Fn(&Injector, &CreatedInstance<'_>) -> DiResult<()> + Send + Sync>;

/// A freshly constructed instance, as seen by creation hooks.
pub struct CreatedInstance<'a> {
    instance: &'a AnyArc,
    metadata: &'a TypeMetadata,
}

impl<'a> CreatedInstance<'a> {
    pub(crate) fn new(instance: &'a AnyArc, metadata: &'a TypeMetadata) -> Self {
        Self { instance, metadata }
    }

    /// Name of the constructed type.
    pub fn type_name(&self) -> &'static str {
        self.metadata.type_name()
    }

    pub fn type_id(&self) -> TypeId {
        self.metadata.type_id()
    }

    /// Whether the instance is a `C`.
    pub fn is<C: 'static>(&self) -> bool {
        self.instance.is::<Arc<C>>()
    }

    /// The instance, if it is a `C`.
    pub fn downcast<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.instance.downcast_ref::<Arc<C>>().cloned()
    }

    /// Metadata of the constructed type.
    pub fn metadata(&self) -> &'a TypeMetadata {
        self.metadata
    }

    /// The instance as an `Arc<C>` wrapped in an [`AnyArc`].
    pub fn as_any(&self) -> &'a AnyArc {
        self.instance
    }
}

impl std::fmt::Debug for CreatedInstance<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedInstance")
            .field("type", &self.type_name())
            .finish()
    }
}
