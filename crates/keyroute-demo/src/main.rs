//! Keyroute demo binary
//!
//! Loads a fixture, dispatches its transactions and prints the audit log.
//!
//! Usage: `keyroute-demo [fixture.json]`
//!
//! Environment:
//! - `KEYROUTE_FIXTURE`: fixture path when no argument is given
//! - `KEYROUTE_WORKERS`: concurrent workers (default 1)
//! - `KEYROUTE_AUDIT_TIMESTAMPS`, `KEYROUTE_AUDIT_CAPACITY`: audit log settings
//! - `RUST_LOG`: log filter (default `keyroute=info`)

use std::sync::Arc;

use keyroute_demo::{run, DemoConfig, Fixture};
use keyroute_dispatch::Coordinator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyroute=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DemoConfig::from_env()?;

    let fixture = match &config.fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading fixture");
            Fixture::load(path)?
        }
        None => {
            tracing::info!("Using built-in fixture");
            Fixture::scenario_a()?
        }
    };

    let (topology, fleet) = fixture.build()?;
    let coordinator = Arc::new(Coordinator::with_config(topology, fleet, config.dispatch.clone()));

    tracing::info!(
        transactions = fixture.transactions.len(),
        workers = config.workers,
        "Dispatching transactions"
    );

    let outcomes = run(Arc::clone(&coordinator), fixture.transactions, config.workers).await?;
    for outcome in &outcomes {
        println!("{}", outcome.summary());
    }

    println!();
    println!("Audit log:");
    for record in coordinator.audit_log().snapshot() {
        println!("{}", serde_json::to_string(&record)?);
    }

    println!();
    println!("Key status:");
    for server in coordinator.fleet().servers() {
        let keys = server.keys();
        if !keys.is_empty() {
            println!("{}: {}", server.id(), serde_json::to_string(&keys)?);
        }
    }

    Ok(())
}
