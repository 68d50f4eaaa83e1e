//! Error types for the dependency injection engine.

use std::error::Error;
use std::sync::Arc;

/// Shared, clonable cause attached to creation failures.
pub type ErrorCause = Arc<dyn Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Every failure to satisfy a dependency request surfaces as one of these
/// variants. Apart from [`DiError::InvalidArgument`] and [`DiError::Disposed`],
/// all of them are resolution errors (see [`DiError::is_resolution_error`]).
///
/// # Examples
///
/// ```rust
/// use covenant_di::{DiError, InjectorConfiguration, Resolver};
///
/// let injector = InjectorConfiguration::new().build().unwrap();
/// match injector.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use covenant_di::DiError;
///
/// let not_found = DiError::NotFound("MyService");
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
///
/// assert_eq!(not_found.to_string(), "Cannot resolve type MyService");
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// No contract for the type, and not a non-empty collection request
    #[error("Cannot resolve type {0}")]
    NotFound(&'static str),
    /// A contract was registered but never bound to an instance source
    #[error("Contract for type {0} was registered but never bound to a target")]
    Unconfigured(&'static str),
    /// The type declares no public and no marked constructor
    #[error("Cannot create an instance of type {0}; the type has no public constructor")]
    NoConstructor(&'static str),
    /// Several public constructors and none marked for injection
    #[error("Cannot create an instance of type {type_name}; {candidates} public constructors and none marked for injection")]
    AmbiguousConstructor {
        type_name: &'static str,
        candidates: usize,
    },
    /// More than one constructor carries the injection marker
    #[error("Type {type_name} has {count} constructors marked for injection; at most one is allowed")]
    MultipleInjectedConstructors {
        type_name: &'static str,
        count: usize,
    },
    /// A property is marked for injection but cannot be assigned
    #[error("Property '{property}' on type '{type_name}' is marked for injection but does not have a setter")]
    MissingSetter {
        property: &'static str,
        type_name: &'static str,
    },
    /// Resolved value is not an instance of the requested type
    #[error("Resolved instance is not assignable to resolved type {0}")]
    TypeMismatch(&'static str),
    /// A callable's declared return type differs from the requested one
    #[error("Delegate has wrong return type {actual}. Expected return type {expected}")]
    ReturnTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// Constructor, factory or creation hook failed
    #[error("Failed to create instance of type {type_name}")]
    Creation {
        type_name: &'static str,
        #[source]
        source: ErrorCause,
    },
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// The injector backing a contract has been disposed or dropped
    #[error("Injector has been disposed")]
    Disposed,
    /// Eager argument validation failed
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },
}

impl DiError {
    /// Wraps an arbitrary failure raised while creating `type_name`.
    pub fn creation<E>(type_name: &'static str, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        DiError::Creation {
            type_name,
            source: Arc::new(error),
        }
    }

    /// Like [`creation`](Self::creation), but a `DiError` is returned unchanged.
    pub(crate) fn from_failure<E>(type_name: &'static str, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let cause: ErrorCause = Arc::new(error);
        match cause.downcast_ref::<DiError>() {
            Some(resolution) => resolution.clone(),
            None => DiError::Creation {
                type_name,
                source: cause,
            },
        }
    }

    /// Whether this error belongs to the resolution taxonomy.
    pub fn is_resolution_error(&self) -> bool {
        !matches!(self, DiError::InvalidArgument { .. } | DiError::Disposed)
    }
}

/// Message carried by a panic that was converted into a [`DiError::Creation`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("panicked: {0}")]
pub struct PanicCause(pub String);

impl PanicCause {
    pub(crate) fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        PanicCause(message)
    }
}

/// Result type for DI operations
///
/// # Examples
///
/// ```rust
/// use covenant_di::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service"))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
