//! Keys identifying requestable types.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::registration::AnyArc;

/// Read-only collection shapes recognized by the resolver.
///
/// Requesting one of these shapes for an element type `T` that has at least
/// one contract resolves every contract of `T`, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionShape {
    /// `Vec<Arc<T>>`
    Enumerable,
    /// `Box<[Arc<T>]>`
    ReadOnlyCollection,
    /// [`ServiceList<T>`]
    ReadOnlyList,
}

/// Element side of a collection key.
#[derive(Debug, Clone, Copy)]
pub struct ElementKey {
    id: TypeId,
    name: &'static str,
    shape: CollectionShape,
    collect: fn(Vec<AnyArc>) -> Option<AnyArc>,
}

impl ElementKey {
    /// `TypeId` of the element type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Element type name.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// Collection shape requested.
    pub fn shape(&self) -> CollectionShape {
        self.shape
    }

    /// Assembles resolved element instances into the requested collection.
    ///
    /// Returns `None` if any element is not an instance of the element type.
    pub(crate) fn collect(&self, items: Vec<AnyArc>) -> Option<AnyArc> {
        (self.collect)(items)
    }
}

/// Key for contract storage and lookup.
///
/// A key identifies an abstract type `T` by its `TypeId` and remembers the
/// shape of the value handed out for it, which is always `Arc<T>` stored in an
/// `Arc<dyn Any>`. Collection keys additionally describe their element type.
///
/// Equality and hashing only consider the `TypeId`.
///
/// # Examples
///
/// ```rust
/// use covenant_di::{Key, CollectionShape};
/// use std::sync::Arc;
///
/// trait Plugin: Send + Sync {}
///
/// let single = Key::of::<dyn Plugin>();
/// assert!(single.element().is_none());
///
/// let many = Key::collection::<dyn Plugin, Vec<Arc<dyn Plugin>>>();
/// let element = many.element().unwrap();
/// assert_eq!(element.shape(), CollectionShape::Enumerable);
/// assert_eq!(element.type_id(), single.type_id());
/// ```
#[derive(Debug, Clone)]
pub struct Key {
    id: TypeId,
    name: &'static str,
    payload: TypeId,
    element: Option<ElementKey>,
}

impl Key {
    /// Key of the abstract type `T` (sized or `dyn Trait`).
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            payload: TypeId::of::<Arc<T>>(),
            element: None,
        }
    }

    /// Key of the collection `C` of `Arc<T>` elements.
    pub fn collection<T, C>() -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        C: FromElements<T>,
    {
        Key {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            payload: TypeId::of::<Arc<C>>(),
            element: Some(ElementKey {
                id: TypeId::of::<T>(),
                name: std::any::type_name::<T>(),
                shape: C::SHAPE,
                collect: collect_elements::<T, C>,
            }),
        }
    }

    /// `TypeId` of the abstract type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// Element description when this key requests a collection.
    pub fn element(&self) -> Option<&ElementKey> {
        self.element.as_ref()
    }

    /// Whether `value` carries the shape this key hands out.
    pub fn accepts(&self, value: &AnyArc) -> bool {
        Any::type_id(&**value) == self.payload
    }
}

impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Collections buildable from resolved `Arc<T>` elements.
pub trait FromElements<T: ?Sized>: Send + Sync + Sized + 'static {
    /// Shape reported to the resolver.
    const SHAPE: CollectionShape;

    /// Builds the collection, preserving element order.
    fn from_elements(items: Vec<Arc<T>>) -> Self;
}

impl<T: ?Sized + Send + Sync + 'static> FromElements<T> for Vec<Arc<T>> {
    const SHAPE: CollectionShape = CollectionShape::Enumerable;

    fn from_elements(items: Vec<Arc<T>>) -> Self {
        items
    }
}

impl<T: ?Sized + Send + Sync + 'static> FromElements<T> for Box<[Arc<T>]> {
    const SHAPE: CollectionShape = CollectionShape::ReadOnlyCollection;

    fn from_elements(items: Vec<Arc<T>>) -> Self {
        items.into_boxed_slice()
    }
}

impl<T: ?Sized + Send + Sync + 'static> FromElements<T> for ServiceList<T> {
    const SHAPE: CollectionShape = CollectionShape::ReadOnlyList;

    fn from_elements(items: Vec<Arc<T>>) -> Self {
        ServiceList(items.into())
    }
}

/// Cheaply clonable, read-only list of every service bound to `T`.
///
/// ```rust
/// use covenant_di::{InjectorConfiguration, Resolver, ServiceList};
/// use std::sync::Arc;
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<u8>().to_instance(Arc::new(1));
/// config.bind::<u8>().to_instance(Arc::new(2));
/// let injector = config.build().unwrap();
///
/// let list = injector.resolve::<ServiceList<u8>>().unwrap();
/// assert_eq!(list.len(), 2);
/// assert_eq!(*list[1], 2);
/// ```
pub struct ServiceList<T: ?Sized>(Arc<[Arc<T>]>);

impl<T: ?Sized> ServiceList<T> {
    /// Shared slice backing the list.
    pub fn as_shared(&self) -> &Arc<[Arc<T>]> {
        &self.0
    }
}

impl<T: ?Sized> Clone for ServiceList<T> {
    fn clone(&self) -> Self {
        ServiceList(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::ops::Deref for ServiceList<T> {
    type Target = [Arc<T>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> std::fmt::Debug for ServiceList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceList").field("len", &self.0.len()).finish()
    }
}

fn collect_elements<T, C>(items: Vec<AnyArc>) -> Option<AnyArc>
where
    T: ?Sized + Send + Sync + 'static,
    C: FromElements<T>,
{
    let typed = items
        .iter()
        .map(|item| item.downcast_ref::<Arc<T>>().cloned())
        .collect::<Option<Vec<_>>>()?;
    let collection: Arc<C> = Arc::new(C::from_elements(typed));
    Some(Arc::new(collection))
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
