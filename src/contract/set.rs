//! Immutable, compiled contract lookup.

use std::any::TypeId;
use std::sync::Arc;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::contract::Contract;
use crate::descriptors::ContractDescriptor;

type Contracts = SmallVec<[Arc<dyn Contract>; 2]>;

/// Every contract of an injector, grouped by abstraction.
///
/// Built once when the injector is created and never modified afterwards, so
/// lookups need no locking.
pub struct ContractSet {
    by_type: AHashMap<TypeId, Contracts>,
    ordered: Vec<Arc<dyn Contract>>,
}

impl ContractSet {
    /// Builds the set from contracts in global registration order.
    pub(crate) fn new(contracts: Vec<Arc<dyn Contract>>) -> Self {
        let mut by_type: AHashMap<TypeId, Contracts> = AHashMap::new();
        for contract in &contracts {
            by_type
                .entry(contract.key().type_id())
                .or_default()
                .push(Arc::clone(contract));
        }
        Self {
            by_type,
            ordered: contracts,
        }
    }

    /// First registered contract of `type_id`.
    #[inline]
    pub(crate) fn first(&self, type_id: TypeId) -> Option<&Arc<dyn Contract>> {
        self.by_type.get(&type_id).and_then(|list| list.first())
    }

    /// Every contract of `type_id`, in registration order.
    #[inline]
    pub(crate) fn all(&self, type_id: TypeId) -> &[Arc<dyn Contract>] {
        self.by_type.get(&type_id).map(|list| list.as_slice()).unwrap_or(&[])
    }

    /// Every contract, in registration order.
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<dyn Contract>> {
        self.ordered.iter()
    }

    /// Whether any contract serves `type_id`.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    /// Number of contracts, the injector's own included.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Descriptors of every contract, in registration order.
    pub fn descriptors(&self) -> Vec<ContractDescriptor> {
        self.ordered.iter().map(|c| c.descriptor()).collect()
    }
}

impl std::fmt::Debug for ContractSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractSet")
            .field("types", &self.by_type.len())
            .field("contracts", &self.ordered.len())
            .finish()
    }
}
