// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the resolution pipeline over a response read from JSON.
//!
//! This example demonstrates:
//! - Decoding a server response without any network access
//! - Fragment filtering and last-wins merging
//! - Provenance lookups
//! - Secret classification by key name and by fragment name
//!
//! To run this example:
//! ```bash
//! cargo run --example offline_resolution
//! ```

use cfgresolve::domain::MASKED_VALUE;
use cfgresolve::prelude::*;

const RESPONSE: &str = r#"{
  "name": "orders",
  "profiles": ["prod"],
  "label": "main",
  "version": "9b1e4aa",
  "state": null,
  "propertySources": [
    {
      "name": "git:main:orders.yml",
      "source": {
        "server.port": 8080,
        "db.host": "localhost",
        "db.pool.size": 10,
        "feature.regions": ["eu", "us"]
      }
    },
    {
      "name": "git:main:orders-prod.yml",
      "source": { "db.host": "orders-db.prod", "db.pool.size": 50 }
    },
    {
      "name": "vault:secret/orders",
      "source": { "db.user": "orders", "db.password": "s3cret" }
    }
  ]
}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Offline Resolution ===\n");

    let response = ConfigurationResponse::from_json(RESPONSE).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let inputs = ResolveInputs::new("http://config:8888", "orders", "prod")
        .with_label("main")
        .with_secret_sources(["vault"]);
    let state = Resolver::resolve_response(&inputs, response.clone())?;

    println!("--- Properties ---");
    for (key, value) in &state.properties {
        let shown = if state.is_secret(key) {
            MASKED_VALUE.to_string()
        } else {
            value.to_string()
        };
        println!(
            "{:<18} = {:<16} (from {})",
            key,
            shown,
            state.winning_source(key).unwrap_or("?")
        );
    }

    println!("\n--- Provenance of db.host ---");
    for source in &state.provenance["db.host"] {
        println!("  {}", source);
    }

    println!("\n--- Only the vault fragment ---");
    let vault_only = inputs.clone().with_property_sources(["vault"]);
    let filtered = Resolver::resolve_response(&vault_only, response)?;
    println!(
        "{} propert(ies), {} secret",
        filtered.properties.len(),
        filtered.secret_keys.len()
    );

    Ok(())
}
