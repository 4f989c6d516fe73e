//! # autowire - Descriptor-Driven Dependency Injection
//!
//! Builds a fully wired singleton graph from an explicit list of component
//! descriptors. Each descriptor says what a component is called, which
//! capabilities (`dyn Trait`s) it implements, how it is constructed and which
//! of its fields must be injected.
//!
//! ## Features
//!
//! - 🧭 **Capability fan-out** - several components may implement one trait;
//!   qualifiers pick between them
//! - 🏗️ **Constructor injection** - parameters resolved from already built components
//! - 🪝 **Field injection** - `Inject<T>` slots filled after every component exists
//! - 🧾 **No reflection** - upcasts and field accessors are captured at registration
//! - 🛑 **Strict by default** - unresolved dependencies fail the bootstrap
//! - 📊 **Observable** - optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use autowire::{Catalog, ComponentDescriptor, Container, Inject};
//! use std::sync::Arc;
//!
//! trait Storage: Send + Sync {
//!     fn kind(&self) -> &'static str;
//! }
//!
//! #[derive(Default)]
//! struct Disk;
//! impl Storage for Disk {
//!     fn kind(&self) -> &'static str { "disk" }
//! }
//!
//! #[derive(Default)]
//! struct Memory;
//! impl Storage for Memory {
//!     fn kind(&self) -> &'static str { "memory" }
//! }
//!
//! #[derive(Default)]
//! struct Cache {
//!     backing: Inject<dyn Storage>,
//! }
//!
//! let catalog = Catalog::new()
//!     .with(ComponentDescriptor::component(Disk::default).implements::<dyn Storage>(|s| s))
//!     .with(ComponentDescriptor::component(Memory::default).implements::<dyn Storage>(|s| s))
//!     .with(
//!         ComponentDescriptor::component(Cache::default)
//!             .qualified_field::<dyn Storage>("backing", "Memory", |c| &c.backing),
//!     );
//!
//! let container = Container::start(catalog).unwrap();
//! let cache = container.get::<Cache>().unwrap();
//! assert_eq!(cache.backing.resolve().unwrap().kind(), "memory");
//! ```
//!
//! ## Resolution
//!
//! - Constructor parameters are looked up by their type's own identifier and
//!   must appear earlier in the catalog.
//! - Fields are resolved through the interface index after construction: no
//!   binding means the type's own identifier, one binding means that
//!   implementor, several bindings require a qualifier.
//! - [`ResolutionPolicy::Lenient`] leaves unresolvable fields unset instead of
//!   failing.

// Lets `#[derive(Component)]` output resolve `::autowire` inside this crate
extern crate self as autowire;

mod bootstrap;
mod catalog;
mod config;
mod container;
mod descriptor;
mod error;
mod factory;
mod index;
mod inject;
mod injector;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;
mod storage;

pub use bootstrap::*;
pub use catalog::*;
pub use config::*;
pub use container::*;
pub use descriptor::{ComponentDescriptor, Describe, DescriptorBuilder, FieldDescriptor};
pub use error::*;
pub use index::*;
pub use inject::*;
pub use provider::{identifier_of, Argument, Construct, Dependency, Injectable, Parameters};

#[cfg(feature = "derive")]
pub use autowire_derive::Component;

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bootstrap, Catalog, ComponentDescriptor, Construct, Container, Describe, DiError, Inject,
        ResolutionPolicy, Result,
    };
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Output = Arc<Mutex<Vec<String>>>;

    trait IServer: Send + Sync {
        fn print_data(&self, out: &mut Vec<String>);
    }

    #[derive(Default)]
    struct ServerA;

    impl IServer for ServerA {
        fn print_data(&self, out: &mut Vec<String>) {
            out.push("A".into());
        }
    }

    #[derive(Default)]
    struct ServerB;

    impl IServer for ServerB {
        fn print_data(&self, out: &mut Vec<String>) {
            out.push("B".into());
        }
    }

    struct ServerWithConstructor {
        server_a: Arc<ServerA>,
        server_b: Arc<ServerB>,
    }

    impl IServer for ServerWithConstructor {
        fn print_data(&self, out: &mut Vec<String>) {
            out.push("Data from Servers: ".into());
            self.server_a.print_data(out);
            self.server_b.print_data(out);
        }
    }

    #[derive(Default)]
    struct Consumer {
        server1: Inject<dyn IServer>,
        server2: Inject<dyn IServer>,
        composite: Inject<ServerWithConstructor>,
    }

    fn servers() -> Catalog {
        Catalog::new()
            .with(ComponentDescriptor::component(ServerA::default).implements::<dyn IServer>(|a| a))
            .with(ComponentDescriptor::component(ServerB::default).implements::<dyn IServer>(|b| b))
            .with(
                ComponentDescriptor::constructed(
                    |(server_a, server_b): (Arc<ServerA>, Arc<ServerB>)| ServerWithConstructor {
                        server_a,
                        server_b,
                    },
                )
                .implements::<dyn IServer>(|composite| composite),
            )
    }

    fn consumer() -> DescriptorBuilder<Consumer> {
        ComponentDescriptor::component(Consumer::default)
            .qualified_field::<dyn IServer>("server1", "ServerA", |c| &c.server1)
            .qualified_field::<dyn IServer>("server2", "ServerB", |c| &c.server2)
            .field::<ServerWithConstructor>("composite", |c| &c.composite)
    }

    fn printed(server: &dyn IServer) -> Vec<String> {
        let mut out = Vec::new();
        server.print_data(&mut out);
        out
    }

    #[test]
    fn test_end_to_end_servers() {
        let container = Container::start(servers().with(consumer())).unwrap();
        let consumer = container.get::<Consumer>().unwrap();

        assert_eq!(printed(&*consumer.server1.resolve().unwrap()), ["A"]);
        assert_eq!(printed(&*consumer.server2.resolve().unwrap()), ["B"]);
        assert_eq!(
            printed(&*consumer.composite.resolve().unwrap()),
            ["Data from Servers: ", "A", "B"]
        );
    }

    #[test]
    fn test_composite_shares_singletons() {
        let container = Container::start(servers().with(consumer())).unwrap();
        let composite = container.get::<ServerWithConstructor>().unwrap();

        assert!(Arc::ptr_eq(&composite.server_a, &container.get::<ServerA>().unwrap()));
        assert!(Arc::ptr_eq(&composite.server_b, &container.get::<ServerB>().unwrap()));
    }

    #[test]
    fn test_unqualified_capability_field_fails() {
        #[derive(Default)]
        struct Greedy {
            server: Inject<dyn IServer>,
        }

        let catalog = servers().with(
            ComponentDescriptor::component(Greedy::default)
                .field::<dyn IServer>("server", |g| &g.server),
        );

        let err = Container::start(catalog).unwrap_err();
        assert_eq!(
            err,
            DiError::AmbiguousBinding {
                type_name: "IServer",
                candidates: vec!["ServerA", "ServerB", "ServerWithConstructor"],
            }
        );
    }

    #[test]
    fn test_zero_capability_self_binding() {
        let container = Container::start(servers().with(consumer())).unwrap();
        assert_eq!(container.implementors("Consumer"), ["Consumer"]);
        assert!(container.implementors("ServerA").is_empty());
    }

    #[test]
    fn test_constructor_dependency_declared_later_is_absent() {
        let catalog = Catalog::new()
            .with(ComponentDescriptor::constructed(
                |(server_a, server_b): (Arc<ServerA>, Arc<ServerB>)| ServerWithConstructor {
                    server_a,
                    server_b,
                },
            ))
            .with(ComponentDescriptor::component(ServerA::default))
            .with(ComponentDescriptor::component(ServerB::default));

        let err = Bootstrap::new(catalog)
            .policy(ResolutionPolicy::Lenient)
            .start()
            .unwrap_err();
        assert_eq!(err, DiError::unresolved("ServerWithConstructor", "ServerA"));
    }

    #[test]
    fn test_fallible_constructor_aborts_bootstrap() {
        let catalog = servers().with(ComponentDescriptor::try_constructed(
            |(_a,): (Arc<ServerA>,)| Err::<Consumer, _>("refusing to start"),
        ));

        let err = Container::start(catalog).unwrap_err();
        assert_eq!(
            err,
            DiError::Instantiation {
                component: "Consumer",
                reason: "refusing to start".into(),
            }
        );
    }

    #[test]
    fn test_container_is_shareable_across_threads() {
        let container = Container::start(servers().with(consumer())).unwrap();
        let output: Output = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let container = container.clone();
                let output = Arc::clone(&output);
                std::thread::spawn(move || {
                    let server = container.resolve_qualified::<dyn IServer>("ServerB").unwrap();
                    server.print_data(&mut output.lock().unwrap());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(output.lock().unwrap().as_slice(), ["B", "B", "B", "B"]);
    }

    #[test]
    fn test_named_component_is_qualified_by_name() {
        let catalog = Catalog::new()
            .with(
                ComponentDescriptor::component(ServerA::default)
                    .named("primary")
                    .implements::<dyn IServer>(|a| a),
            )
            .with(ComponentDescriptor::component(ServerB::default).implements::<dyn IServer>(|b| b));

        let container = Container::start(catalog).unwrap();
        let primary = container.resolve_qualified::<dyn IServer>("primary").unwrap();
        assert_eq!(printed(&*primary), ["A"]);
        assert!(container.get_named::<ServerA>("primary").is_ok());
        assert!(container.get::<ServerA>().is_err());
    }

    #[test]
    fn test_fields_outliving_container_report_drop() {
        let consumer = Container::start(servers().with(consumer()))
            .unwrap()
            .get::<Consumer>()
            .unwrap();

        assert!(consumer.server1.is_injected());
        assert!(consumer.server1.get().is_none());
        assert_eq!(
            consumer.server1.resolve().err(),
            Some(DiError::ContainerDropped { type_name: "IServer" })
        );
        assert_eq!(
            consumer.composite.resolve().err(),
            Some(DiError::ContainerDropped {
                type_name: "ServerWithConstructor"
            })
        );
    }
}
