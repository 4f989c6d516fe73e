//! Instance pool
//!
//! Uses DashMap for lock-free concurrent reads once the graph is wired.

use crate::descriptor::{View, ViewTable};
use crate::provider::Instance;
use crate::{DiError, Result};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// A pooled singleton with the views its descriptor declared
#[derive(Clone)]
pub(crate) struct PooledInstance {
    instance: Instance,
    views: Arc<ViewTable>,
}

impl PooledInstance {
    pub(crate) fn instance(&self) -> &Instance {
        &self.instance
    }

    /// See the instance as the type registered under `type_name`
    pub(crate) fn view(&self, type_name: &str) -> Option<View> {
        self.views
            .get(type_name)
            .and_then(|upcast| upcast(&self.instance))
    }
}

/// Identifier → singleton map. Each identifier is written at most once.
pub(crate) struct InstancePool {
    entries: DashMap<&'static str, PooledInstance, RandomState>,
}

impl InstancePool {
    /// Create with pre-allocated capacity; shard count scales with it.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let shard_amount = if capacity <= 16 {
            4
        } else if capacity <= 64 {
            8
        } else {
            16
        };
        Self {
            entries: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                shard_amount,
            ),
        }
    }

    /// Store a freshly constructed component
    pub(crate) fn insert(
        &self,
        identifier: &'static str,
        instance: Instance,
        views: Arc<ViewTable>,
    ) -> Result<()> {
        match self.entries.entry(identifier) {
            Entry::Occupied(_) => Err(DiError::AlreadyRegistered {
                component: identifier,
            }),
            Entry::Vacant(slot) => {
                slot.insert(PooledInstance { instance, views });
                Ok(())
            }
        }
    }

    /// Look up a component by identifier
    #[inline]
    pub(crate) fn get(&self, identifier: &str) -> Option<PooledInstance> {
        self.entries.get(identifier).map(|entry| entry.value().clone())
    }

    /// The raw instance under an identifier
    #[inline]
    pub(crate) fn instance(&self, identifier: &str) -> Option<Instance> {
        self.entries
            .get(identifier)
            .map(|entry| Arc::clone(&entry.value().instance))
    }

    /// The raw instance with the identifier it was pooled under
    pub(crate) fn keyed_instance(&self, identifier: &str) -> Option<(&'static str, Instance)> {
        self.entries
            .get(identifier)
            .map(|entry| (*entry.key(), Arc::clone(&entry.value().instance)))
    }

    /// Check if an identifier is pooled
    #[inline]
    pub(crate) fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// All pooled identifiers
    pub(crate) fn identifiers(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of pooled components
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for InstancePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstancePool")
            .field("count", &self.len())
            .finish()
    }
}
