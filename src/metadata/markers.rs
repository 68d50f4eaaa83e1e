//! Injection markers attached to members at configuration time.

use std::any::TypeId;

use ahash::AHashSet;

/// Constructors and properties marked for injection outside of their type's
/// [`Injectable`](crate::Injectable) implementation.
///
/// Markers are the equivalent of annotating a member of a type that cannot be
/// edited. They are consulted alongside the markers a type declares itself.
#[derive(Debug, Default, Clone)]
pub struct Markers {
    constructors: AHashSet<(TypeId, &'static str)>,
    properties: AHashSet<(TypeId, &'static str)>,
}

impl Markers {
    /// Creates an empty marker set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the constructor `name` of `C` for injection.
    pub fn mark_constructor<C: 'static>(&mut self, name: &'static str) {
        self.constructors.insert((TypeId::of::<C>(), name));
    }

    /// Marks the property `name` of `C` for injection.
    pub fn mark_property<C: 'static>(&mut self, name: &'static str) {
        self.properties.insert((TypeId::of::<C>(), name));
    }

    /// Whether the constructor `name` of the type `owner` is marked.
    pub fn is_constructor_marked(&self, owner: TypeId, name: &'static str) -> bool {
        self.constructors.contains(&(owner, name))
    }

    /// Whether the property `name` of the type `owner` is marked.
    pub fn is_property_marked(&self, owner: TypeId, name: &'static str) -> bool {
        self.properties.contains(&(owner, name))
    }

    /// Whether no marker was recorded.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty() && self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn marks_are_scoped_to_owner_and_kind() {
        let mut markers = Markers::new();
        assert!(markers.is_empty());
        markers.mark_constructor::<Widget>("new");
        markers.mark_property::<Widget>("logger");

        let owner = TypeId::of::<Widget>();
        assert!(markers.is_constructor_marked(owner, "new"));
        assert!(!markers.is_constructor_marked(owner, "logger"));
        assert!(markers.is_property_marked(owner, "logger"));
        assert!(!markers.is_constructor_marked(TypeId::of::<u8>(), "new"));
    }
}
