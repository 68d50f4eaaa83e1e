//! Property metadata.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::metadata::Injectable;
use crate::registration::AnyArc;
use crate::traits::Inject;

type Setter = Arc<dyn Fn(&AnyArc, &AnyArc) -> DiResult<()> + Send + Sync>;

/// An assignable (or read-only) member of a type.
///
/// Setters receive a shared reference to the instance, so assignable
/// properties use interior mutability (`Mutex`, `RwLock`, `OnceCell`, ...).
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: &'static str,
    owner: &'static str,
    key: Key,
    injected: bool,
    setter: Option<Setter>,
}

impl PropertyDescriptor {
    /// Marks this property for injection.
    pub fn injected(&mut self) -> &mut Self {
        self.injected = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the type declaring the property.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Key of the property's declared type.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Whether the type itself marked this property for injection.
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Assigns a resolved value to the property of `instance`.
    pub(crate) fn assign(&self, instance: &AnyArc, value: &AnyArc) -> DiResult<()> {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => Err(DiError::MissingSetter {
                property: self.name,
                type_name: self.owner,
            }),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("type", &self.key.display_name())
            .field("injected", &self.injected)
            .field("settable", &self.setter.is_some())
            .finish()
    }
}

/// Builder collecting the properties of `C`.
///
/// Handed to [`Injectable::properties`].
pub struct Properties<C> {
    list: Vec<PropertyDescriptor>,
    _owner: PhantomData<fn() -> C>,
}

impl<C: Injectable> Properties<C> {
    pub(crate) fn new() -> Self {
        Self {
            list: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declares a property of type `P` assigned through `setter`.
    pub fn settable<P, F>(&mut self, name: &'static str, setter: F) -> &mut PropertyDescriptor
    where
        P: Inject,
        F: Fn(&C, P) + Send + Sync + 'static,
    {
        let setter: Setter = Arc::new(move |instance: &AnyArc, value: &AnyArc| {
            let target = instance
                .downcast_ref::<Arc<C>>()
                .ok_or(DiError::TypeMismatch(type_name::<C>()))?;
            let value = P::from_resolved(value).ok_or(DiError::TypeMismatch(type_name::<P>()))?;
            setter(target, value);
            Ok(())
        });
        self.push(name, P::key(), Some(setter))
    }

    /// Declares a property of type `P` that cannot be assigned.
    pub fn read_only<P: Inject>(&mut self, name: &'static str) -> &mut PropertyDescriptor {
        self.push(name, P::key(), None)
    }

    fn push(&mut self, name: &'static str, key: Key, setter: Option<Setter>) -> &mut PropertyDescriptor {
        self.list.push(PropertyDescriptor {
            name,
            owner: type_name::<C>(),
            key,
            injected: false,
            setter,
        });
        let last = self.list.len() - 1;
        &mut self.list[last]
    }

    pub(crate) fn into_vec(self) -> Vec<PropertyDescriptor> {
        self.list
    }
}
