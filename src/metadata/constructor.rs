//! Constructor metadata.

use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::metadata::args::InjectableFn;
use crate::metadata::Injectable;
use crate::registration::AnyArc;

type Invoke = Arc<dyn Fn(&[AnyArc]) -> DiResult<AnyArc> + Send + Sync>;

/// Visibility of a constructor to the default selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Eligible for automatic selection
    Public,
    /// Only selected when marked for injection
    Private,
}

/// One way of building an instance of a type from injected parameters.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    name: &'static str,
    owner: &'static str,
    visibility: Visibility,
    injected: bool,
    parameters: Vec<Key>,
    invoke: Invoke,
}

impl ConstructorDescriptor {
    /// Marks this constructor for injection.
    ///
    /// When exactly one constructor of a type is marked, it is selected
    /// regardless of visibility.
    pub fn injected(&mut self) -> &mut Self {
        self.injected = true;
        self
    }

    /// Constructor name, unique within its type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the type this constructor builds.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Whether the type itself marked this constructor for injection.
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Parameter keys, in declaration order.
    pub fn parameters(&self) -> &[Key] {
        &self.parameters
    }

    /// Invokes the constructor with resolved arguments.
    ///
    /// The returned value holds an `Arc` of the owner type.
    pub(crate) fn invoke(&self, args: &[AnyArc]) -> DiResult<AnyArc> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("visibility", &self.visibility)
            .field("injected", &self.injected)
            .field("parameters", &self.parameters.iter().map(Key::display_name).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder collecting the constructors of `C`.
///
/// Handed to [`Injectable::constructors`].
pub struct Constructors<C> {
    list: Vec<ConstructorDescriptor>,
    _owner: PhantomData<fn() -> C>,
}

impl<C: Injectable> Constructors<C> {
    pub(crate) fn new() -> Self {
        Self {
            list: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declares a public constructor.
    pub fn public<Args, F>(&mut self, name: &'static str, f: F) -> &mut ConstructorDescriptor
    where
        Args: 'static,
        F: InjectableFn<Args, C>,
    {
        self.push(name, Visibility::Public, infallible::<Args, C, F>(f), F::parameters())
    }

    /// Declares a private constructor, only used when marked for injection.
    pub fn private<Args, F>(&mut self, name: &'static str, f: F) -> &mut ConstructorDescriptor
    where
        Args: 'static,
        F: InjectableFn<Args, C>,
    {
        self.push(name, Visibility::Private, infallible::<Args, C, F>(f), F::parameters())
    }

    /// Declares a public constructor that may fail.
    ///
    /// A returned error is reported as [`DiError::Creation`], unless it is a
    /// `DiError` itself.
    pub fn try_public<Args, E, F>(&mut self, name: &'static str, f: F) -> &mut ConstructorDescriptor
    where
        Args: 'static,
        F: InjectableFn<Args, Result<C, E>>,
        E: Error + Send + Sync + 'static,
    {
        self.push(name, Visibility::Public, fallible::<Args, C, E, F>(f), F::parameters())
    }

    /// Declares a private constructor that may fail.
    pub fn try_private<Args, E, F>(&mut self, name: &'static str, f: F) -> &mut ConstructorDescriptor
    where
        Args: 'static,
        F: InjectableFn<Args, Result<C, E>>,
        E: Error + Send + Sync + 'static,
    {
        self.push(name, Visibility::Private, fallible::<Args, C, E, F>(f), F::parameters())
    }

    fn push(
        &mut self,
        name: &'static str,
        visibility: Visibility,
        invoke: Invoke,
        parameters: Vec<Key>,
    ) -> &mut ConstructorDescriptor {
        self.list.push(ConstructorDescriptor {
            name,
            owner: type_name::<C>(),
            visibility,
            injected: false,
            parameters,
            invoke,
        });
        let last = self.list.len() - 1;
        &mut self.list[last]
    }

    pub(crate) fn into_vec(self) -> Vec<ConstructorDescriptor> {
        self.list
    }
}

fn infallible<Args, C, F>(f: F) -> Invoke
where
    Args: 'static,
    C: Injectable,
    F: InjectableFn<Args, C>,
{
    Arc::new(move |args: &[AnyArc]| {
        let instance = f.call(args).ok_or(DiError::TypeMismatch(type_name::<C>()))?;
        Ok(Arc::new(Arc::new(instance)) as AnyArc)
    })
}

fn fallible<Args, C, E, F>(f: F) -> Invoke
where
    Args: 'static,
    C: Injectable,
    E: Error + Send + Sync + 'static,
    F: InjectableFn<Args, Result<C, E>>,
{
    Arc::new(move |args: &[AnyArc]| {
        match f.call(args).ok_or(DiError::TypeMismatch(type_name::<C>()))? {
            Ok(instance) => Ok(Arc::new(Arc::new(instance)) as AnyArc),
            Err(error) => Err(DiError::from_failure(type_name::<C>(), error)),
        }
    })
}
