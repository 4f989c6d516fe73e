//! Capability index
//!
//! Maps every capability identifier to the identifiers of the components that
//! implement it, in catalog order. A component without capabilities is bound
//! under its own identifier so it is always reachable by name.

use crate::catalog::Catalog;
use crate::{DiError, Result};
use ahash::RandomState;
use std::collections::{HashMap, HashSet};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Read-only capability → implementors table, built once before construction.
#[derive(Debug, Clone, Default)]
pub struct InterfaceIndex {
    bindings: HashMap<&'static str, Vec<&'static str>, RandomState>,
}

impl InterfaceIndex {
    /// Index every descriptor in the catalog.
    ///
    /// Marked and scanned descriptors are indexed alike. Declaring the same
    /// capability twice appends the component twice.
    ///
    /// Identifiers are simple names, so a capability-less component and a
    /// capability can end up under the same key (`app::Cache` and
    /// `dyn store::Cache`). That fails with [`DiError::IdentifierCollision`].
    pub fn build(catalog: &Catalog) -> Result<Self> {
        let mut bindings: HashMap<&'static str, Vec<&'static str>, RandomState> =
            HashMap::with_capacity_and_hasher(catalog.len(), RandomState::new());
        let mut self_bound: HashSet<&'static str, RandomState> = HashSet::default();

        for descriptor in catalog.iter() {
            let identifier = descriptor.identifier();

            if descriptor.capabilities().is_empty() {
                if bindings.contains_key(identifier) && !self_bound.contains(identifier) {
                    return Err(DiError::IdentifierCollision { identifier });
                }

                #[cfg(feature = "logging")]
                trace!(
                    target: crate::logging::TARGET,
                    component = identifier,
                    "Binding component under its own identifier"
                );

                // A repeated identifier is reported by the pool when constructed
                self_bound.insert(identifier);
                bindings.entry(identifier).or_insert_with(|| vec![identifier]);
                continue;
            }

            for &capability in descriptor.capabilities() {
                if self_bound.contains(capability) {
                    return Err(DiError::IdentifierCollision {
                        identifier: capability,
                    });
                }

                #[cfg(feature = "logging")]
                trace!(
                    target: crate::logging::TARGET,
                    component = identifier,
                    capability = capability,
                    "Binding component to capability"
                );

                bindings.entry(capability).or_default().push(identifier);
            }
        }

        #[cfg(feature = "logging")]
        debug!(
            target: crate::logging::TARGET,
            bindings = bindings.len(),
            components = catalog.len(),
            "Built interface index"
        );

        Ok(Self { bindings })
    }

    /// Implementors of a capability, empty when the identifier is unknown
    #[inline]
    pub fn implementors(&self, capability: &str) -> &[&'static str] {
        self.bindings
            .get(capability)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the identifier has at least one binding
    #[inline]
    pub fn contains(&self, capability: &str) -> bool {
        self.bindings.contains_key(capability)
    }

    /// Indexed identifiers, in no particular order
    pub fn capabilities(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.keys().copied()
    }

    /// Number of indexed identifiers
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
