//! Diagnostic observers for resolution traceability.
//!
//! Observers receive resolution and creation events from an injector. They are
//! registered on the [`InjectorConfiguration`](crate::InjectorConfiguration)
//! and invoked synchronously on the resolving thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for dependency injection events.
///
/// Observers can track which types are being resolved, timing information,
/// and failure conditions.
///
/// # Performance
///
/// Observer calls are made synchronously during resolution. Keep implementations
/// lightweight.
///
/// # Examples
///
/// ```
/// use covenant_di::{DiObserver, InjectorConfiguration, Key};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct TracingObserver {
///     trace_id: String,
/// }
///
/// impl DiObserver for TracingObserver {
///     fn resolving(&self, key: &Key) {
///         println!("[{}] Resolving: {}", self.trace_id, key.display_name());
///     }
///
///     fn resolved(&self, key: &Key, duration: Duration) {
///         println!("[{}] Resolved: {} in {:?}", self.trace_id, key.display_name(), duration);
///     }
/// }
///
/// let mut config = InjectorConfiguration::new();
/// config.add_observer(Arc::new(TracingObserver { trace_id: "run-123".to_string() }));
/// let injector = config.build().unwrap();
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when an outward resolution request starts.
    fn resolving(&self, key: &Key);

    /// Called when an outward resolution request succeeds.
    ///
    /// # Arguments
    ///
    /// * `key` - The key that was resolved
    /// * `duration` - Time elapsed from `resolving` to `resolved`
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when an outward resolution request fails.
    fn resolution_failed(&self, _key: &Key, _error: &DiError) {}

    /// Called after an instance was constructed and every creation hook ran.
    fn created(&self, _type_name: &'static str, _duration: Duration) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }

    #[inline]
    pub(crate) fn created(&self, type_name: &'static str, duration: Duration) {
        for observer in &self.observers {
            observer.created(type_name, duration);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Resolutions are logged at `TRACE`, failures at `WARN`.
///
/// # Examples
///
/// ```
/// use covenant_di::{InjectorConfiguration, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut config = InjectorConfiguration::new();
/// config.add_observer(Arc::new(LoggingObserver::with_prefix("app")));
/// let injector = config.build().unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "covenant-di".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(prefix = %self.prefix, service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(
            prefix = %self.prefix,
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, service = key.display_name(), %error, "resolution failed");
    }

    fn created(&self, type_name: &'static str, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            service = type_name,
            elapsed_us = duration.as_micros() as u64,
            "instance created"
        );
    }
}

/// Observer collecting resolution counts, timings and failures.
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    total_resolution_time: AtomicU64,
    failure_count: AtomicU64,
    creation_count: AtomicU64,
}

impl MetricsObserver {
    /// Creates a new metrics observer.
    pub fn new() -> Self {
        Self {
            resolution_count: AtomicU64::new(0),
            total_resolution_time: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            creation_count: AtomicU64::new(0),
        }
    }

    /// Gets the total number of successful resolutions observed.
    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    /// Gets the average resolution time.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }

        let total_ns = self.total_resolution_time.load(Ordering::Relaxed);
        Some(Duration::from_nanos(total_ns / count))
    }

    /// Gets the total resolution time.
    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_time.load(Ordering::Relaxed))
    }

    /// Gets the number of failed resolutions observed.
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Gets the number of instances constructed.
    pub fn creation_count(&self) -> u64 {
        self.creation_count.load(Ordering::Relaxed)
    }

    /// Resets all metrics.
    pub fn reset(&self) {
        self.resolution_count.store(0, Ordering::Relaxed);
        self.total_resolution_time.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.creation_count.store(0, Ordering::Relaxed);
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &Key) {}

    fn resolved(&self, _key: &Key, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        self.total_resolution_time
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn resolution_failed(&self, _key: &Key, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    fn created(&self, _type_name: &'static str, _duration: Duration) {
        self.creation_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_observer() {
        let observer = MetricsObserver::new();
        let key = crate::key_of_type::<String>();

        assert_eq!(observer.resolution_count(), 0);
        assert_eq!(observer.failure_count(), 0);
        assert!(observer.average_resolution_time().is_none());

        observer.resolved(&key, Duration::from_millis(10));
        observer.resolved(&key, Duration::from_millis(20));

        assert_eq!(observer.resolution_count(), 2);
        assert_eq!(observer.average_resolution_time(), Some(Duration::from_millis(15)));
        assert!(observer.total_resolution_time() >= Duration::from_millis(30));

        observer.resolution_failed(&key, &DiError::NotFound("String"));
        observer.created("String", Duration::from_millis(1));
        assert_eq!(observer.failure_count(), 1);
        assert_eq!(observer.creation_count(), 1);

        observer.reset();
        assert_eq!(observer.resolution_count(), 0);
        assert_eq!(observer.failure_count(), 0);
    }

    #[test]
    fn test_observers_fan_out() {
        let metrics = Arc::new(MetricsObserver::new());
        let mut observers = Observers::new();
        assert!(!observers.has_observers());
        observers.add(Arc::new(LoggingObserver::new()));
        observers.add(metrics.clone());
        assert!(observers.has_observers());

        let key = crate::key_of_type::<String>();
        observers.resolving(&key);
        observers.resolved(&key, Duration::from_millis(1));
        observers.resolution_failed(&key, &DiError::Disposed);

        assert_eq!(metrics.resolution_count(), 1);
        assert_eq!(metrics.failure_count(), 1);
    }
}
