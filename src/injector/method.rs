//! Invocation of arbitrary callables with injected parameters.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::internal::catch_creation;
use crate::key::Key;
use crate::metadata::InjectableFn;
use crate::registration::AnyArc;

type Invoke = Box<dyn Fn(&[AnyArc]) -> Option<Box<dyn Any + Send>> + Send + Sync>;

/// A type-erased callable whose parameters are resolved by the injector.
pub struct Method {
    parameters: Vec<Key>,
    return_type: TypeId,
    return_name: &'static str,
    invoke: Invoke,
}

impl Method {
    pub fn new<Args, R, F>(f: F) -> Self
    where
        Args: 'static,
        R: Send + 'static,
        F: InjectableFn<Args, R>,
    {
        Self {
            parameters: F::parameters(),
            return_type: TypeId::of::<R>(),
            return_name: type_name::<R>(),
            invoke: Box::new(move |args: &[AnyArc]| {
                f.call(args).map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        }
    }

    /// Parameter keys, in declaration order.
    pub fn parameters(&self) -> &[Key] {
        &self.parameters
    }

    /// Declared return type.
    pub fn return_type_name(&self) -> &'static str {
        self.return_name
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("parameters", &self.parameters.iter().map(Key::display_name).collect::<Vec<_>>())
            .field("returns", &self.return_name)
            .finish()
    }
}

impl Injector {
    /// Invokes `method` with resolved parameters and returns its result.
    ///
    /// # Errors
    ///
    /// * [`DiError::ReturnTypeMismatch`] if `method` does not return a `T`;
    ///   nothing is resolved in that case
    /// * Any resolution error of a parameter
    /// * [`DiError::Creation`] if the method panics
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_di::{DiError, InjectorConfiguration, Method};
    /// use std::sync::Arc;
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.bind::<u32>().to_instance(Arc::new(20));
    /// let injector = config.build().unwrap();
    ///
    /// let double = Method::new(|n: Arc<u32>| *n * 2);
    /// assert_eq!(injector.execute_method::<u32>(&double).unwrap(), 40);
    /// assert!(matches!(
    ///     injector.execute_method::<String>(&double),
    ///     Err(DiError::ReturnTypeMismatch { .. })
    /// ));
    /// ```
    pub fn execute_method<T: 'static>(&self, method: &Method) -> DiResult<T> {
        if method.return_type != TypeId::of::<T>() {
            return Err(DiError::ReturnTypeMismatch {
                expected: type_name::<T>(),
                actual: method.return_name,
            });
        }

        let args = self.resolve_all(&method.parameters)?;
        let result = catch_creation(method.return_name, || {
            (method.invoke)(&args).ok_or(DiError::TypeMismatch(method.return_name))
        })?;
        result
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Invokes `f` with resolved parameters.
    ///
    /// ```
    /// use covenant_di::InjectorConfiguration;
    /// use std::sync::Arc;
    ///
    /// let mut config = InjectorConfiguration::new();
    /// config.bind::<String>().to_instance(Arc::new("world".to_string()));
    /// let injector = config.build().unwrap();
    ///
    /// let greeting = injector.execute(|name: Arc<String>| format!("hello {name}")).unwrap();
    /// assert_eq!(greeting, "hello world");
    /// ```
    pub fn execute<Args, R, F>(&self, f: F) -> DiResult<R>
    where
        Args: 'static,
        R: Send + 'static,
        F: InjectableFn<Args, R>,
    {
        self.execute_method::<R>(&Method::new(f))
    }
}
