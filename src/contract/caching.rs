//! Caching strategies deciding when a contract reuses instances.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::contract::source::InstanceSource;
use crate::error::{DiError, DiResult};
use crate::injector::Injector;

/// Callback run on a cached instance when its contract is released.
pub type ReleaseFn<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

/// Decides whether to reuse an instance or ask the source for a new one.
///
/// Each contract owns its own strategy instance.
pub trait CachingStrategy<T: ?Sized>: Send + Sync {
    /// Returns an instance, possibly invoking `source`.
    fn resolve(&self, injector: &Injector, source: &dyn InstanceSource<T>) -> DiResult<Arc<T>>;

    /// Releases whatever the strategy holds. Called once, on injector disposal.
    fn release(&self) {}
}

/// Invokes the source on every resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransientCaching;

impl<T: ?Sized> CachingStrategy<T> for TransientCaching {
    #[inline]
    fn resolve(&self, injector: &Injector, source: &dyn InstanceSource<T>) -> DiResult<Arc<T>> {
        source.resolve(injector)
    }
}

/// Invokes the source at most once and hands out the cached instance afterwards.
///
/// Concurrent first resolutions are serialized; a failed resolution caches
/// nothing, so a later call retries. Releasing drops the cached instance after
/// running the release callback, and later resolutions fail with
/// [`DiError::Disposed`].
pub struct SingletonCaching<T: ?Sized> {
    instance: RwLock<Option<Arc<T>>>,
    lock: Mutex<()>,
    released: AtomicBool,
    on_release: Option<ReleaseFn<T>>,
}

impl<T: ?Sized> SingletonCaching<T> {
    pub fn new() -> Self {
        Self {
            instance: RwLock::new(None),
            lock: Mutex::new(()),
            released: AtomicBool::new(false),
            on_release: None,
        }
    }

    /// Runs `on_release` on the cached instance when the contract is released.
    pub fn with_release(on_release: ReleaseFn<T>) -> Self {
        Self {
            on_release: Some(on_release),
            ..Self::new()
        }
    }

    /// Whether an instance is currently cached.
    pub fn is_resolved(&self) -> bool {
        self.instance.read().is_some()
    }

    fn cached(&self) -> Option<Arc<T>> {
        self.instance.read().as_ref().map(Arc::clone)
    }
}

impl<T: ?Sized> Default for SingletonCaching<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + Send + Sync> CachingStrategy<T> for SingletonCaching<T> {
    fn resolve(&self, injector: &Injector, source: &dyn InstanceSource<T>) -> DiResult<Arc<T>> {
        if let Some(instance) = self.cached() {
            return Ok(instance);
        }

        let _guard = self.lock.lock();
        if let Some(instance) = self.cached() {
            return Ok(instance);
        }
        if self.released.load(Ordering::Acquire) {
            return Err(DiError::Disposed);
        }

        let instance = source.resolve(injector)?;
        *self.instance.write() = Some(Arc::clone(&instance));
        Ok(instance)
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        // Taken under the creation lock so no resolution can publish afterwards.
        let instance = {
            let _guard = self.lock.lock();
            self.instance.write().take()
        };
        if let (Some(instance), Some(on_release)) = (&instance, &self.on_release) {
            on_release(instance);
        }
    }
}
