//! Example demonstrating logging capabilities
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use autowire::{Bootstrap, Catalog, ComponentDescriptor, Inject, ResolutionPolicy};
use std::sync::Arc;

trait Cache: Send + Sync {}

#[derive(Default)]
struct Redis;
impl Cache for Redis {}

#[derive(Default)]
struct Memcached;
impl Cache for Memcached {}

#[allow(dead_code)]
#[derive(Default)]
struct Database {
    url: String,
}

#[allow(dead_code)]
struct UserService {
    db: Arc<Database>,
    audit: Option<Arc<AuditLog>>,
    cache: Inject<dyn Cache>,
}

#[derive(Default)]
struct AuditLog;

fn catalog() -> Catalog {
    Catalog::new()
        .with(ComponentDescriptor::component(Redis::default).implements::<dyn Cache>(|c| c))
        .with(ComponentDescriptor::component(Memcached::default).implements::<dyn Cache>(|c| c))
        .with(ComponentDescriptor::component(Database::default))
        // AuditLog is declared after UserService, so its parameter is absent
        .with(
            ComponentDescriptor::constructed(
                |(db, audit): (Arc<Database>, Option<Arc<AuditLog>>)| UserService {
                    db,
                    audit,
                    cache: Inject::new(),
                },
            )
            .qualified_field::<dyn Cache>("cache", "Varnish", |s| &s.cache),
        )
        .with(ComponentDescriptor::component(AuditLog::default))
}

fn main() {
    // JSON if logging-json is enabled, pretty if logging-pretty
    autowire::logging::init();

    println!("=== autowire Logging Demo ===\n");

    // Strict: the absent AuditLog parameter aborts the bootstrap
    // (logs: "Constructor parameter is not constructed yet")
    match Bootstrap::new(catalog()).start() {
        Ok(_) => println!("strict bootstrap unexpectedly succeeded"),
        Err(err) => println!("strict: {err}"),
    }

    // Lenient: AuditLog becomes None and the unmatched qualifier leaves
    // the cache field unset (logs: "Qualifier matches no implementor")
    match Bootstrap::new(catalog()).policy(ResolutionPolicy::Lenient).start() {
        Ok(container) => {
            println!("lenient: wired {} components", container.len());
            if let Some(service) = container.try_get::<UserService>() {
                println!("  audit present: {}", service.audit.is_some());
                println!("  cache injected: {}", service.cache.is_injected());
            }
        }
        Err(err) => println!("lenient: {err}"),
    }

    println!("\n=== Demo Complete ===");
}
