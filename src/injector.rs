//! Binding selection and the field injection phase
//!
//! A requested type is resolved against the interface index:
//!
//! | bindings | result                                                      |
//! |----------|-------------------------------------------------------------|
//! | none     | the pool entry under the type's own identifier              |
//! | one      | the sole implementor, whatever the qualifier says           |
//! | several  | the implementor named by the qualifier; no qualifier fails  |
//!
//! The same rules back field injection and [`Container::resolve`](crate::Container::resolve).

use crate::catalog::Catalog;
use crate::config::ResolutionPolicy;
use crate::descriptor::{ComponentDescriptor, FieldDescriptor, SetError};
use crate::index::InterfaceIndex;
use crate::provider::Instance;
use crate::storage::InstancePool;
use crate::{DiError, Result};

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// Outcome of binding selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection<'q> {
    /// Resolve from the pool entry with this identifier
    Component(&'static str),
    /// Several implementors and the qualifier named none of them
    Unmatched(&'q str),
}

/// Pick the pool identifier a request for `type_name` resolves to.
pub(crate) fn select<'q>(
    index: &InterfaceIndex,
    type_name: &'static str,
    qualifier: Option<&'q str>,
) -> Result<Selection<'q>> {
    match index.implementors(type_name) {
        [] => Ok(Selection::Component(type_name)),
        [sole] => Ok(Selection::Component(*sole)),
        candidates => {
            let Some(qualifier) = qualifier else {
                return Err(DiError::AmbiguousBinding {
                    type_name,
                    candidates: candidates.to_vec(),
                });
            };

            Ok(candidates
                .iter()
                .find(|&&candidate| candidate == qualifier)
                .map_or(Selection::Unmatched(qualifier), |&candidate| {
                    Selection::Component(candidate)
                }))
        }
    }
}

/// Inject the fields of every pooled component, in catalog order.
///
/// Must run after every component has been constructed.
pub(crate) fn inject_all(
    catalog: &Catalog,
    index: &InterfaceIndex,
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Result<()> {
    for descriptor in catalog.iter() {
        inject_component(descriptor, index, pool, policy)?;
    }
    Ok(())
}

fn inject_component(
    descriptor: &ComponentDescriptor,
    index: &InterfaceIndex,
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Result<()> {
    let component = descriptor.identifier();

    let Some(owner) = pool.get(component) else {
        #[cfg(feature = "logging")]
        if !descriptor.fields().is_empty() {
            trace!(
                target: crate::logging::TARGET,
                component = component,
                "Skipping field injection of component without instance"
            );
        }
        return Ok(());
    };

    for field in descriptor.fields() {
        inject_field(component, owner.instance(), field, index, pool, policy)?;
    }
    Ok(())
}

fn inject_field(
    component: &'static str,
    owner: &Instance,
    field: &FieldDescriptor,
    index: &InterfaceIndex,
    pool: &InstancePool,
    policy: ResolutionPolicy,
) -> Result<()> {
    let type_name = field.type_name();

    let target = match select(index, type_name, field.qualifier())? {
        Selection::Component(target) => target,
        Selection::Unmatched(qualifier) => {
            if policy.is_lenient() {
                #[cfg(feature = "logging")]
                warn!(
                    target: crate::logging::TARGET,
                    component = component,
                    field = field.name(),
                    qualifier = qualifier,
                    "Qualifier matches no implementor, leaving field unset"
                );
                return Ok(());
            }
            return Err(DiError::UnknownQualifier {
                type_name,
                qualifier: qualifier.to_string(),
            });
        }
    };

    let Some(value) = pool.get(target).and_then(|entry| entry.view(type_name)) else {
        if policy.is_lenient() {
            #[cfg(feature = "logging")]
            warn!(
                target: crate::logging::TARGET,
                component = component,
                field = field.name(),
                dependency = target,
                "Field dependency is not in the pool, leaving field unset"
            );
            return Ok(());
        }
        return Err(DiError::unresolved(component, target));
    };

    #[cfg(feature = "logging")]
    debug!(
        target: crate::logging::TARGET,
        component = component,
        field = field.name(),
        field_type = type_name,
        resolved = target,
        "Injecting field"
    );

    field.set(owner, value).map_err(|err| match err {
        SetError::Owner => DiError::mismatch(component, component),
        SetError::Value => DiError::mismatch(target, type_name),
        SetError::Occupied => DiError::AlreadyInjected {
            component,
            field: field.name(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::construct_all;
    use crate::{ComponentDescriptor, Inject};
    use std::sync::Arc;

    trait Codec: Send + Sync {
        fn name(&self) -> &'static str;
    }

    #[derive(Default)]
    struct Json;
    impl Codec for Json {
        fn name(&self) -> &'static str {
            "json"
        }
    }

    #[derive(Default)]
    struct Yaml;
    impl Codec for Yaml {
        fn name(&self) -> &'static str {
            "yaml"
        }
    }

    #[derive(Default)]
    struct Encoder {
        codec: Inject<dyn Codec>,
    }

    fn codecs() -> Catalog {
        Catalog::new()
            .with(ComponentDescriptor::component(Json::default).implements::<dyn Codec>(|json| json))
            .with(ComponentDescriptor::component(Yaml::default).implements::<dyn Codec>(|yaml| yaml))
    }

    fn wire(catalog: &Catalog, policy: ResolutionPolicy) -> Result<InstancePool> {
        let index = InterfaceIndex::build(catalog)?;
        let pool = InstancePool::with_capacity(catalog.len());
        construct_all(catalog, &pool, policy)?;
        inject_all(catalog, &index, &pool, policy)?;
        Ok(pool)
    }

    fn encoder(pool: &InstancePool) -> Arc<Encoder> {
        pool.instance("Encoder").unwrap().downcast::<Encoder>().ok().unwrap()
    }

    #[test]
    fn test_select_rules() {
        let index = InterfaceIndex::build(&codecs()).unwrap();

        assert_eq!(select(&index, "Json", None).unwrap(), Selection::Component("Json"));
        assert_eq!(
            select(&index, "Codec", Some("Yaml")).unwrap(),
            Selection::Component("Yaml")
        );
        assert_eq!(
            select(&index, "Codec", Some("Toml")).unwrap(),
            Selection::Unmatched("Toml")
        );
        assert_eq!(
            select(&index, "Codec", None).unwrap_err(),
            DiError::AmbiguousBinding {
                type_name: "Codec",
                candidates: vec!["Json", "Yaml"],
            }
        );
    }

    #[test]
    fn test_single_implementor_ignores_qualifier() {
        let catalog = Catalog::new()
            .with(ComponentDescriptor::component(Json::default).implements::<dyn Codec>(|json| json))
            .with(
                ComponentDescriptor::component(Encoder::default)
                    .qualified_field::<dyn Codec>("codec", "Yaml", |encoder| &encoder.codec),
            );

        let pool = wire(&catalog, ResolutionPolicy::Strict).unwrap();
        assert_eq!(encoder(&pool).codec.resolve().unwrap().name(), "json");
    }

    #[test]
    fn test_qualified_field() {
        let catalog = codecs().with(
            ComponentDescriptor::component(Encoder::default)
                .qualified_field::<dyn Codec>("codec", "Yaml", |encoder| &encoder.codec),
        );

        let pool = wire(&catalog, ResolutionPolicy::Strict).unwrap();
        assert_eq!(encoder(&pool).codec.resolve().unwrap().name(), "yaml");
    }

    #[test]
    fn test_unqualified_field_is_ambiguous() {
        let catalog = codecs().with(
            ComponentDescriptor::component(Encoder::default)
                .field::<dyn Codec>("codec", |encoder| &encoder.codec),
        );

        let err = wire(&catalog, ResolutionPolicy::Lenient).unwrap_err();
        assert!(matches!(err, DiError::AmbiguousBinding { type_name: "Codec", .. }));
    }

    #[test]
    fn test_unknown_qualifier_follows_policy() {
        let catalog = || {
            codecs().with(
                ComponentDescriptor::component(Encoder::default)
                    .qualified_field::<dyn Codec>("codec", "Toml", |encoder| &encoder.codec),
            )
        };

        let err = wire(&catalog(), ResolutionPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            DiError::UnknownQualifier {
                type_name: "Codec",
                qualifier: "Toml".into(),
            }
        );

        let pool = wire(&catalog(), ResolutionPolicy::Lenient).unwrap();
        assert!(!encoder(&pool).codec.is_injected());
    }

    #[test]
    fn test_concrete_field_resolves_by_own_identifier() {
        #[derive(Default)]
        struct Pipeline {
            json: Inject<Json>,
        }

        let catalog = codecs().with(
            ComponentDescriptor::component(Pipeline::default)
                .field::<Json>("json", |pipeline| &pipeline.json),
        );

        let pool = wire(&catalog, ResolutionPolicy::Strict).unwrap();
        let pipeline = pool.instance("Pipeline").unwrap().downcast::<Pipeline>().ok().unwrap();
        let json = pool.instance("Json").unwrap().downcast::<Json>().ok().unwrap();
        assert!(Arc::ptr_eq(&pipeline.json.resolve().unwrap(), &json));
    }

    #[test]
    fn test_missing_target_follows_policy() {
        let catalog = || {
            Catalog::new()
                .with(ComponentDescriptor::scanned::<Json>().implements::<dyn Codec>(|json| json))
                .with(
                    ComponentDescriptor::component(Encoder::default)
                        .field::<dyn Codec>("codec", |encoder| &encoder.codec),
                )
        };

        let err = wire(&catalog(), ResolutionPolicy::Strict).unwrap_err();
        assert_eq!(err, DiError::unresolved("Encoder", "Json"));

        let pool = wire(&catalog(), ResolutionPolicy::Lenient).unwrap();
        assert!(encoder(&pool).codec.get().is_none());
    }

    #[test]
    fn test_scanned_owner_is_skipped() {
        let catalog = codecs().with(
            ComponentDescriptor::scanned::<Encoder>()
                .field::<dyn Codec>("codec", |encoder| &encoder.codec),
        );

        let pool = wire(&catalog, ResolutionPolicy::Strict).unwrap();
        assert!(!pool.contains("Encoder"));
    }

    #[test]
    fn test_field_declared_twice_is_already_injected() {
        let catalog = codecs().with(
            ComponentDescriptor::component(Encoder::default)
                .qualified_field::<dyn Codec>("codec", "Json", |encoder| &encoder.codec)
                .qualified_field::<dyn Codec>("codec", "Yaml", |encoder| &encoder.codec),
        );

        let err = wire(&catalog, ResolutionPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            DiError::AlreadyInjected {
                component: "Encoder",
                field: "codec",
            }
        );
    }

    #[test]
    fn test_identifier_held_by_other_type_is_a_mismatch() {
        #[derive(Default)]
        struct Pipeline {
            json: Inject<Json>,
        }

        // Yaml registered under Json's identifier
        let catalog = Catalog::new()
            .with(ComponentDescriptor::component(Yaml::default).named("Json"))
            .with(
                ComponentDescriptor::component(Pipeline::default)
                    .field::<Json>("json", |pipeline| &pipeline.json),
            );

        let err = wire(&catalog, ResolutionPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            DiError::TypeMismatch {
                component: "Json",
                expected: "Json",
            }
        );
    }
}
