//! Bootstrap orchestration: index, construct, inject.

use crate::catalog::Catalog;
use crate::config::{BootstrapConfig, ResolutionPolicy};
use crate::container::Container;
use crate::factory::construct_all;
use crate::index::InterfaceIndex;
use crate::injector::inject_all;
use crate::storage::InstancePool;
use crate::Result;

#[cfg(feature = "logging")]
use tracing::{debug, info};

/// Wires a catalog into a [`Container`].
///
/// The phases run strictly in sequence over the catalog order:
///
/// 1. build the interface index from every descriptor
/// 2. construct every marked component
/// 3. inject the fields of every constructed component
///
/// The first error aborts the bootstrap and drops the partial graph.
///
/// # Examples
///
/// ```rust
/// use autowire::{Bootstrap, Catalog, ComponentDescriptor, ResolutionPolicy};
///
/// #[derive(Default)]
/// struct Metrics;
///
/// let container = Bootstrap::new(Catalog::new().with(ComponentDescriptor::component(Metrics::default)))
///     .policy(ResolutionPolicy::Lenient)
///     .start()
///     .unwrap();
///
/// assert!(container.contains("Metrics"));
/// ```
#[derive(Debug)]
pub struct Bootstrap {
    catalog: Catalog,
    config: BootstrapConfig,
}

impl Bootstrap {
    /// Prepare a bootstrap with the default configuration
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            config: BootstrapConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the policy for unresolved dependencies
    pub fn policy(mut self, policy: ResolutionPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Run every phase and return the wired container.
    pub fn start(self) -> Result<Container> {
        let Self { catalog, config } = self;
        let policy = config.policy;

        #[cfg(feature = "logging")]
        info!(
            target: crate::logging::TARGET,
            components = catalog.len(),
            policy = policy.as_str(),
            "Starting bootstrap"
        );

        let index = InterfaceIndex::build(&catalog)?;

        let pool = InstancePool::with_capacity(catalog.len());
        construct_all(&catalog, &pool, policy)?;

        #[cfg(feature = "logging")]
        debug!(
            target: crate::logging::TARGET,
            constructed = pool.len(),
            "Construction phase complete"
        );

        inject_all(&catalog, &index, &pool, policy)?;

        #[cfg(feature = "logging")]
        info!(
            target: crate::logging::TARGET,
            components = pool.len(),
            bindings = index.len(),
            "Bootstrap complete"
        );

        Ok(Container::from_parts(pool, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentDescriptor, DiError, Inject};
    use std::sync::Arc;

    #[derive(Default)]
    struct Repository;

    #[derive(Default)]
    struct Service {
        repository: Inject<Repository>,
    }

    fn catalog() -> Catalog {
        Catalog::new()
            .with(
                ComponentDescriptor::component(Service::default)
                    .field::<Repository>("repository", |service| &service.repository),
            )
            .with(ComponentDescriptor::component(Repository::default))
    }

    #[test]
    fn test_fields_injected_after_all_construction() {
        // Service precedes Repository, so this only works because field
        // injection waits for the whole construction phase.
        let container = Bootstrap::new(catalog()).start().unwrap();

        let service = container.get::<Service>().unwrap();
        let repository = container.get::<Repository>().unwrap();
        assert!(Arc::ptr_eq(&service.repository.resolve().unwrap(), &repository));
    }

    #[test]
    fn test_config_policy() {
        let catalog = Catalog::new().with(
            ComponentDescriptor::component(Service::default)
                .field::<Repository>("repository", |service| &service.repository),
        );
        let err = Bootstrap::new(catalog).start().unwrap_err();
        assert_eq!(err, DiError::unresolved("Service", "Repository"));

        let catalog = Catalog::new().with(
            ComponentDescriptor::component(Service::default)
                .field::<Repository>("repository", |service| &service.repository),
        );
        let container = Bootstrap::new(catalog)
            .config(BootstrapConfig::new().lenient())
            .start()
            .unwrap();
        assert!(!container.get::<Service>().unwrap().repository.is_injected());
    }

    #[test]
    fn test_duplicate_identifier_fails() {
        let catalog = catalog().with(ComponentDescriptor::component(Repository::default));
        let err = Bootstrap::new(catalog).start().unwrap_err();
        assert_eq!(err, DiError::AlreadyRegistered { component: "Repository" });
    }

    #[test]
    fn test_each_start_builds_an_independent_graph() {
        let first = Container::start(catalog()).unwrap();
        let second = Container::start(catalog()).unwrap();
        assert!(!Arc::ptr_eq(
            &first.get::<Repository>().unwrap(),
            &second.get::<Repository>().unwrap()
        ));
    }

    mod app {
        #[derive(Default)]
        pub struct Cache;
    }

    mod store {
        pub trait Cache: Send + Sync {}

        #[derive(Default)]
        pub struct Redis;
        impl Cache for Redis {}

        #[derive(Default)]
        pub struct Memcached;
        impl Cache for Memcached {}
    }

    #[test]
    fn test_component_named_like_a_capability_is_rejected() {
        #[derive(Default)]
        struct Session {
            cache: Inject<dyn store::Cache>,
        }

        let catalog = Catalog::new()
            .with(ComponentDescriptor::component(store::Redis::default).implements::<dyn store::Cache>(|c| c))
            .with(
                ComponentDescriptor::component(store::Memcached::default)
                    .implements::<dyn store::Cache>(|c| c),
            )
            .with(ComponentDescriptor::component(app::Cache::default))
            .with(
                ComponentDescriptor::component(Session::default)
                    .qualified_field::<dyn store::Cache>("cache", "Redis", |s| &s.cache),
            );

        let err = Bootstrap::new(catalog).start().unwrap_err();
        assert_eq!(err, DiError::IdentifierCollision { identifier: "Cache" });
    }
}
