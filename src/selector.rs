//! Constructor selection.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{DiError, DiResult};
use crate::metadata::{ConstructorDescriptor, Markers, TypeMetadata};

/// Strategy picking the constructor the injector uses for a type.
///
/// Replace the default with
/// [`InjectorConfiguration::with_constructor_selector`](crate::InjectorConfiguration::with_constructor_selector).
/// The injector caches every selection per type, so a selector runs at most once
/// per type and injector.
pub trait ConstructorSelector: Send + Sync {
    /// Selects the constructor of the type described by `metadata`.
    fn select(&self, metadata: &TypeMetadata, markers: &Markers) -> DiResult<Arc<ConstructorDescriptor>>;
}

/// Default constructor selection rules.
///
/// 1. If exactly one constructor is marked for injection, it is selected
///    regardless of visibility. More than one marked constructor is an error.
/// 2. Otherwise the single public constructor is selected.
/// 3. Several public constructors are ambiguous, none at all is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConstructorSelector;

impl ConstructorSelector for DefaultConstructorSelector {
    fn select(&self, metadata: &TypeMetadata, markers: &Markers) -> DiResult<Arc<ConstructorDescriptor>> {
        let owner = metadata.type_id();
        let marked: Vec<_> = metadata
            .constructors()
            .iter()
            .filter(|c| c.is_injected() || markers.is_constructor_marked(owner, c.name()))
            .collect();

        match marked.as_slice() {
            [only] => return Ok(Arc::clone(only)),
            [] => {}
            many => {
                return Err(DiError::MultipleInjectedConstructors {
                    type_name: metadata.type_name(),
                    count: many.len(),
                })
            }
        }

        let public: Vec<_> = metadata.constructors().iter().filter(|c| c.is_public()).collect();
        match public.as_slice() {
            [only] => Ok(Arc::clone(only)),
            [] => Err(DiError::NoConstructor(metadata.type_name())),
            many => Err(DiError::AmbiguousConstructor {
                type_name: metadata.type_name(),
                candidates: many.len(),
            }),
        }
    }
}

/// Memoizes selections of an inner selector per type, failures included.
pub struct CachedConstructorSelector {
    inner: Arc<dyn ConstructorSelector>,
    cache: RwLock<AHashMap<TypeId, DiResult<Arc<ConstructorDescriptor>>>>,
    selections: AtomicUsize,
}

impl CachedConstructorSelector {
    pub fn new(inner: Arc<dyn ConstructorSelector>) -> Self {
        Self {
            inner,
            cache: RwLock::new(AHashMap::new()),
            selections: AtomicUsize::new(0),
        }
    }

    /// Number of times the inner selector ran.
    pub fn selections(&self) -> usize {
        self.selections.load(Ordering::Relaxed)
    }
}

impl ConstructorSelector for CachedConstructorSelector {
    fn select(&self, metadata: &TypeMetadata, markers: &Markers) -> DiResult<Arc<ConstructorDescriptor>> {
        let type_id = metadata.type_id();
        if let Some(cached) = self.cache.read().get(&type_id) {
            return cached.clone();
        }

        let mut cache = self.cache.write();
        // Another thread may have selected while we waited for the write lock
        if let Some(cached) = cache.get(&type_id) {
            return cached.clone();
        }

        self.selections.fetch_add(1, Ordering::Relaxed);
        let selected = self.inner.select(metadata, markers);
        match &selected {
            Ok(ctor) => tracing::trace!(service = metadata.type_name(), constructor = ctor.name(), "constructor selected"),
            Err(error) => tracing::debug!(service = metadata.type_name(), %error, "constructor selection failed"),
        }
        cache.insert(type_id, selected.clone());
        selected
    }
}
