//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g., flushing caches,
/// closing connections). Implementing it is not enough: disposal is opt-in per contract.
/// Singleton contracts bound with
/// [`ContractBuilder::disposed`](crate::ContractBuilder::disposed), or the shorthand
/// [`ContractBuilder::as_disposable_singleton`](crate::ContractBuilder::as_disposable_singleton),
/// call it once when the owning injector is disposed, in reverse registration order.
/// Transient instances are never disposed by the injector.
///
/// # Examples
///
/// ```
/// use covenant_di::{Dispose, InjectorConfiguration, Resolver};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// struct Cache {
///     flushed: AtomicBool,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<Cache>()
///     .to_factory(|_| Arc::new(Cache { flushed: AtomicBool::new(false) }))
///     .as_disposable_singleton();
///
/// let injector = config.build().unwrap();
/// let cache = injector.get::<Cache>().unwrap();
/// injector.dispose();
/// assert!(cache.flushed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
