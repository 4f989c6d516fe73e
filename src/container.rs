//! The wired object graph
//!
//! A `Container` is what the bootstrap hands back: the instance pool and the
//! interface index, frozen. Lookups follow the same selection rules as field
//! injection, so a consumer outside the graph sees exactly what an injected
//! field would.

use crate::bootstrap::Bootstrap;
use crate::catalog::Catalog;
use crate::index::InterfaceIndex;
use crate::injector::{select, Selection};
use crate::provider::identifier_of;
use crate::storage::InstancePool;
use crate::{DiError, Injectable, Result};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// A fully wired set of singletons.
///
/// Cloning is cheap and shares the same pool.
///
/// # Examples
///
/// ```rust
/// use autowire::{Catalog, ComponentDescriptor, Container, Inject};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// #[derive(Default)]
/// struct Frontend {
///     greeter: Inject<dyn Greeter>,
/// }
///
/// let catalog = Catalog::new()
///     .with(ComponentDescriptor::component(English::default).implements::<dyn Greeter>(|e| e))
///     .with(
///         ComponentDescriptor::component(Frontend::default)
///             .field::<dyn Greeter>("greeter", |f| &f.greeter),
///     );
///
/// let container = Container::start(catalog).unwrap();
///
/// let frontend = container.get::<Frontend>().unwrap();
/// assert_eq!(frontend.greeter.resolve().unwrap().greet(), "hello");
///
/// let greeter = container.resolve::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[derive(Clone)]
pub struct Container {
    pool: Arc<InstancePool>,
    index: Arc<InterfaceIndex>,
}

impl Container {
    /// Wire a catalog with the default configuration.
    ///
    /// Shorthand for `Bootstrap::new(catalog).start()`.
    #[inline]
    pub fn start(catalog: Catalog) -> Result<Self> {
        Bootstrap::new(catalog).start()
    }

    pub(crate) fn from_parts(pool: InstancePool, index: InterfaceIndex) -> Self {
        Self {
            pool: Arc::new(pool),
            index: Arc::new(index),
        }
    }

    /// Get the singleton registered under `T`'s own identifier.
    #[inline]
    pub fn get<T: Injectable>(&self) -> Result<Arc<T>> {
        self.get_named(identifier_of::<T>())
    }

    /// Get the singleton registered under an explicit identifier.
    pub fn get_named<T: Injectable>(&self, identifier: &str) -> Result<Arc<T>> {
        #[cfg(feature = "logging")]
        trace!(
            target: crate::logging::TARGET,
            component = identifier,
            "Looking up component by identifier"
        );

        let (component, instance) = self
            .pool
            .keyed_instance(identifier)
            .ok_or_else(|| DiError::not_found(identifier))?;

        instance
            .downcast::<T>()
            .map_err(|_| DiError::mismatch(component, std::any::type_name::<T>()))
    }

    /// Try to get a singleton, returning None if not found
    #[inline]
    pub fn try_get<T: Injectable>(&self) -> Option<Arc<T>> {
        self.get().ok()
    }

    /// Resolve a capability or concrete type by the field selection rules.
    ///
    /// Fails with [`DiError::AmbiguousBinding`] when several components
    /// implement `C`.
    #[inline]
    pub fn resolve<C>(&self) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.lookup(None)
    }

    /// Resolve a capability, choosing the implementor named by `qualifier`
    /// when there are several.
    #[inline]
    pub fn resolve_qualified<C>(&self, qualifier: &str) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.lookup(Some(qualifier))
    }

    fn lookup<C>(&self, qualifier: Option<&str>) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let type_name = identifier_of::<C>();

        #[cfg(feature = "logging")]
        trace!(
            target: crate::logging::TARGET,
            requested = type_name,
            qualifier = qualifier,
            "Resolving from container"
        );

        let identifier = match select(&self.index, type_name, qualifier)? {
            Selection::Component(identifier) => identifier,
            Selection::Unmatched(qualifier) => {
                return Err(DiError::UnknownQualifier {
                    type_name,
                    qualifier: qualifier.to_string(),
                });
            }
        };

        let view = self
            .pool
            .get(identifier)
            .ok_or_else(|| DiError::not_found(identifier))?
            .view(type_name)
            .ok_or_else(|| DiError::mismatch(identifier, type_name))?;

        view.downcast::<Arc<C>>()
            .map(|component| *component)
            .map_err(|_| DiError::mismatch(identifier, type_name))
    }

    /// Identifiers of the components implementing a capability, in catalog order
    #[inline]
    pub fn implementors(&self, capability: &str) -> &[&'static str] {
        self.index.implementors(capability)
    }

    /// The interface index the graph was wired with
    #[inline]
    pub fn index(&self) -> &InterfaceIndex {
        &self.index
    }

    /// Check if a component was constructed under an identifier
    #[inline]
    pub fn contains(&self, identifier: &str) -> bool {
        self.pool.contains(identifier)
    }

    /// Identifiers of every constructed component
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.pool.identifiers()
    }

    /// Number of constructed components
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Check if nothing was constructed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.len() == 0
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("component_count", &self.len())
            .field("binding_count", &self.index.len())
            .finish()
    }
}
