//! Lookup of requested types in a compiled contract set.

use crate::contract::ContractSet;
use crate::error::{DiError, DiResult};
use crate::internal::StackGuard;
use crate::key::{ElementKey, Key};
use crate::registration::AnyArc;

/// Maps a requested key to an instance.
///
/// A direct contract of the requested type wins. Otherwise, if the key asks for
/// a collection whose element type has at least one contract, every contract of
/// the element type is resolved in registration order. Anything else is
/// [`DiError::NotFound`].
pub(crate) struct DependencyResolver {
    owner: usize,
    contracts: ContractSet,
    max_depth: usize,
}

impl DependencyResolver {
    /// `owner` identifies the injector in the cycle detection stack.
    pub(crate) fn new(owner: usize, contracts: ContractSet, max_depth: usize) -> Self {
        Self {
            owner,
            contracts,
            max_depth,
        }
    }

    pub(crate) fn contracts(&self) -> &ContractSet {
        &self.contracts
    }

    pub(crate) fn resolve(&self, key: &Key) -> DiResult<AnyArc> {
        let _guard = StackGuard::enter(self.owner, key.type_id(), key.display_name(), self.max_depth)?;

        if let Some(instance) = self.try_resolve_first(key)? {
            return Ok(instance);
        }
        if let Some(instance) = self.try_resolve_collection(key)? {
            return Ok(instance);
        }

        tracing::debug!(service = key.display_name(), "no contract found");
        Err(DiError::NotFound(key.display_name()))
    }

    fn try_resolve_first(&self, key: &Key) -> DiResult<Option<AnyArc>> {
        match self.contracts.first(key.type_id()) {
            Some(contract) => contract.resolve().map(Some),
            None => Ok(None),
        }
    }

    fn try_resolve_collection(&self, key: &Key) -> DiResult<Option<AnyArc>> {
        match key.element() {
            Some(element) => self.try_resolve_all(element),
            None => Ok(None),
        }
    }

    fn try_resolve_all(&self, element: &ElementKey) -> DiResult<Option<AnyArc>> {
        let contracts = self.contracts.all(element.type_id());
        if contracts.is_empty() {
            return Ok(None);
        }

        let items = contracts
            .iter()
            .map(|contract| contract.resolve())
            .collect::<DiResult<Vec<_>>>()?;
        tracing::trace!(service = element.display_name(), count = items.len(), "resolved collection");

        element
            .collect(items)
            .map(Some)
            .ok_or(DiError::TypeMismatch(element.display_name()))
    }
}
