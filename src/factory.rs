//! Construction phase
//!
//! Instantiates every marked component in catalog order. Components with a
//! designated constructor get their parameters from the instance pool, looked
//! up by each parameter type's own identifier; there is no capability fan-out
//! and no reordering, so a parameter that appears later in the catalog is
//! absent at construction time.

use crate::catalog::Catalog;
use crate::config::ResolutionPolicy;
use crate::descriptor::{ComponentDescriptor, Construction};
use crate::provider::Argument;
use crate::storage::InstancePool;
use crate::Result;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// Construct every marked component of the catalog, in order.
pub(crate) fn construct_all(
    catalog: &Catalog,
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Result<()> {
    for descriptor in catalog.iter() {
        construct(descriptor, pool, policy)?;
    }
    Ok(())
}

/// Construct one component and store it in the pool.
///
/// Unmarked descriptors are skipped.
pub(crate) fn construct(
    descriptor: &ComponentDescriptor,
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Result<()> {
    let component = descriptor.identifier();

    let Some(construction) = descriptor.construction() else {
        #[cfg(feature = "logging")]
        trace!(
            target: crate::logging::TARGET,
            component = component,
            "Skipping construction of unmarked type"
        );
        return Ok(());
    };

    let instance = match construction {
        Construction::Default(constructor) => {
            #[cfg(feature = "logging")]
            debug!(
                target: crate::logging::TARGET,
                component = component,
                "Constructing component with default construction"
            );

            constructor(Vec::new())
        }
        Construction::Injected {
            parameters,
            constructor,
        } => {
            #[cfg(feature = "logging")]
            debug!(
                target: crate::logging::TARGET,
                component = component,
                parameters = ?parameters,
                "Constructing component through its injectable constructor"
            );

            constructor(arguments(component, parameters, pool, policy))
        }
    }
    .map_err(|failure| failure.into_error(component))?;

    pool.insert(component, instance, Arc::new(descriptor.views().clone()))
}

/// Look up each parameter in the pool by identifier.
fn arguments(
    component: &'static str,
    parameters: &[&'static str],
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Vec<Argument> {
    parameters
        .iter()
        .enumerate()
        .map(|(position, &identifier)| {
            let instance = pool.instance(identifier);

            #[cfg(feature = "logging")]
            if instance.is_none() {
                warn!(
                    target: crate::logging::TARGET,
                    component = component,
                    parameter = identifier,
                    position = position,
                    policy = policy.as_str(),
                    "Constructor parameter is not constructed yet"
                );
            }

            Argument {
                component,
                identifier,
                position,
                instance,
                policy,
            }
        })
        .collect()
}
