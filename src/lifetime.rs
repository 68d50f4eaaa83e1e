//! Contract lifetime definitions.

/// Lifetimes selecting the caching strategy of a contract
///
/// A lifetime is shorthand for one of the built-in caching strategies.
/// Custom strategies are attached with
/// [`ContractBuilder::with_caching`](crate::ContractBuilder::with_caching).
///
/// # Examples
///
/// ```rust
/// use covenant_di::{InjectorConfiguration, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut config = InjectorConfiguration::new();
/// config.bind::<Database>()
///     .to_instance(Arc::new(Database { url: "postgres://localhost".to_string() }));
/// config.bind::<RequestModel>()
///     .to_factory(|_| Arc::new(RequestModel { id: 12345 }))
///     .with_lifetime(Lifetime::Transient);
///
/// let injector = config.build().unwrap();
///
/// let model1 = injector.get::<RequestModel>().unwrap();
/// let model2 = injector.get::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// Single instance per injector, cached forever
    ///
    /// The instance source runs at most once, even under concurrent first
    /// access. The cached instance is released when the injector is disposed.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Parses a lifetime name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "singleton" => Some(Lifetime::Singleton),
            "transient" => Some(Lifetime::Transient),
            _ => None,
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::Transient
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Singleton => f.write_str("singleton"),
            Lifetime::Transient => f.write_str("transient"),
        }
    }
}
