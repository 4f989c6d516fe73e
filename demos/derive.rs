//! Example demonstrating the #[derive(Component)] macro
//!
//! Run with:
//!   cargo run --example derive --features derive

use autowire::{Catalog, Component, Construct, Container, Inject};
use std::sync::Arc;

trait Notifier: Send + Sync {
    fn notify(&self, user: &str) -> String;
}

#[derive(Default, Component)]
#[component(implements(dyn Notifier))]
struct Email;

impl Notifier for Email {
    fn notify(&self, user: &str) -> String {
        format!("email sent to {user}")
    }
}

#[derive(Default, Component)]
#[component(implements(dyn Notifier))]
struct Sms;

impl Notifier for Sms {
    fn notify(&self, user: &str) -> String {
        format!("sms sent to {user}")
    }
}

#[derive(Component)]
#[component(constructor)]
struct Database {
    url: String,
}

impl Construct for Database {
    type Parameters = ();

    fn construct((): ()) -> Self {
        Database {
            url: "postgres://localhost:5432/myapp".into(),
        }
    }
}

// Constructor parameters must appear earlier in the catalog
#[derive(Component)]
#[component(constructor)]
struct UserRepository {
    db: Arc<Database>,
}

impl Construct for UserRepository {
    type Parameters = (Arc<Database>,);

    fn construct((db,): Self::Parameters) -> Self {
        UserRepository { db }
    }
}

#[derive(Default, Component)]
struct SignupService {
    #[autowired]
    users: Inject<UserRepository>,
    #[autowired]
    #[qualifier("Sms")]
    notifier: Inject<dyn Notifier>,
    // Not injected; Default is used
    signups: u64,
}

impl SignupService {
    fn signup(&self, user: &str) -> autowire::Result<String> {
        let users = self.users.resolve()?;
        let notifier = self.notifier.resolve()?;
        Ok(format!(
            "{user} stored in {} ({}), {} signups so far",
            users.db.url,
            notifier.notify(user),
            self.signups
        ))
    }
}

fn main() -> autowire::Result<()> {
    println!("=== autowire Derive Macro Demo ===\n");

    let catalog = Catalog::new()
        .with_component::<Email>()
        .with_component::<Sms>()
        .with_component::<Database>()
        .with_component::<UserRepository>()
        .with_component::<SignupService>();

    let container = Container::start(catalog)?;
    println!("Wired {} components", container.len());
    println!("Notifier implementors: {:?}\n", container.implementors("Notifier"));

    let service = container.get::<SignupService>()?;
    println!("  {}", service.signup("ada")?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
