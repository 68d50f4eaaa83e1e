//! Contract descriptors for introspection and diagnostics.

use std::any::TypeId;

use crate::lifetime::Lifetime;

/// Where a contract obtains its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Constructed through the selected constructor of the named concrete type
    Construct(&'static str),
    /// A fixed, pre-built instance
    Instance,
    /// A user factory
    Factory,
    /// A user-supplied instance source
    Custom,
    /// The injector itself
    Injector,
    /// Not yet bound (only observable before build)
    Unbound,
}

/// Contract descriptor for introspection and diagnostics
///
/// Describes one registered contract: the abstraction it serves, its position
/// in registration order, its caching and its instance source.
///
/// # Examples
///
/// ```rust
/// use covenant_di::{InjectorConfiguration, Lifetime, SourceKind};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<Database>()
///     .to_factory(|_| Arc::new(Database { url: "postgres://localhost".to_string() }))
///     .as_singleton();
/// config.bind::<u32>().to_instance(Arc::new(42));
///
/// let descriptors = config.descriptors();
/// let db = descriptors.iter()
///     .find(|d| d.type_name().contains("Database"))
///     .unwrap();
/// assert_eq!(db.lifetime, Some(Lifetime::Singleton));
/// assert_eq!(db.source, SourceKind::Factory);
/// assert_eq!(descriptors[1].ordinal, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    /// `TypeId` of the abstraction served
    pub type_id: TypeId,
    /// Name of the abstraction served
    pub type_name: &'static str,
    /// Position in global registration order
    pub ordinal: usize,
    /// Built-in lifetime, `None` for custom caching strategies
    pub lifetime: Option<Lifetime>,
    /// Instance source
    pub source: SourceKind,
}

impl ContractDescriptor {
    /// Name of the abstraction served.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the contract caches a single instance.
    pub fn is_singleton(&self) -> bool {
        self.lifetime == Some(Lifetime::Singleton)
    }

    /// Concrete implementation type, for constructed contracts.
    pub fn implementation(&self) -> Option<&'static str> {
        match self.source {
            SourceKind::Construct(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implementation_only_for_constructed() {
        let mut descriptor = ContractDescriptor {
            type_id: TypeId::of::<u8>(),
            type_name: "u8",
            ordinal: 0,
            lifetime: None,
            source: SourceKind::Construct("Widget"),
        };
        assert_eq!(descriptor.implementation(), Some("Widget"));
        assert!(!descriptor.is_singleton());

        descriptor.source = SourceKind::Factory;
        descriptor.lifetime = Some(Lifetime::Singleton);
        assert_eq!(descriptor.implementation(), None);
        assert!(descriptor.is_singleton());
    }
}
