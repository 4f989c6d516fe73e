//! Capability fan-out with qualifiers and constructor injection
//!
//! Run with:
//!   cargo run --example servers

use autowire::{Catalog, ComponentDescriptor, Container, Inject};
use std::sync::Arc;

trait IServer: Send + Sync {
    fn print_data(&self);
}

#[derive(Default)]
struct ServerA;

impl IServer for ServerA {
    fn print_data(&self) {
        println!("A");
    }
}

#[derive(Default)]
struct ServerB;

impl IServer for ServerB {
    fn print_data(&self) {
        println!("B");
    }
}

struct ServerWithConstructor {
    server_a: Arc<ServerA>,
    server_b: Arc<ServerB>,
}

impl ServerWithConstructor {
    fn new((server_a, server_b): (Arc<ServerA>, Arc<ServerB>)) -> Self {
        Self { server_a, server_b }
    }
}

impl IServer for ServerWithConstructor {
    fn print_data(&self) {
        println!("Data from Servers: ");
        self.server_a.print_data();
        self.server_b.print_data();
    }
}

#[derive(Default)]
struct Frontend {
    server1: Inject<dyn IServer>,
    server2: Inject<dyn IServer>,
    composite: Inject<ServerWithConstructor>,
}

fn main() -> autowire::Result<()> {
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    autowire::logging::init();

    // Frontend precedes ServerWithConstructor: fields are injected only after
    // every component has been constructed.
    let catalog = Catalog::new()
        .with(ComponentDescriptor::component(ServerA::default).implements::<dyn IServer>(|a| a))
        .with(ComponentDescriptor::component(ServerB::default).implements::<dyn IServer>(|b| b))
        .with(
            ComponentDescriptor::component(Frontend::default)
                .qualified_field::<dyn IServer>("server1", "ServerA", |f| &f.server1)
                .qualified_field::<dyn IServer>("server2", "ServerB", |f| &f.server2)
                .field::<ServerWithConstructor>("composite", |f| &f.composite),
        )
        .with(
            ComponentDescriptor::constructed(ServerWithConstructor::new)
                .implements::<dyn IServer>(|s| s),
        );

    let container = Container::start(catalog)?;
    let frontend = container.get::<Frontend>()?;

    frontend.server1.resolve()?.print_data();
    println!("---------");
    frontend.server2.resolve()?.print_data();
    println!("---------");
    frontend.composite.resolve()?.print_data();

    // Several implementors and no qualifier: the lookup is refused
    match container.resolve::<dyn IServer>() {
        Ok(_) => println!("unexpected: unqualified lookup succeeded"),
        Err(err) => println!("\n{err}"),
    }

    Ok(())
}
