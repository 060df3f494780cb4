// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves configuration from a live server and prints the result.
//!
//! Secret values are masked unless `--show-secrets` is given.
//!
//! To run this example:
//! ```bash
//! cargo run --example resolve --features cli -- \
//!     --url http://localhost:8888 --application orders --profile prod \
//!     --secret-source vault
//!
//! # or from a settings file
//! cargo run --example resolve --features cli -- --settings resolve.yaml
//! ```

use cfgresolve::adapters::load_inputs_file;
use cfgresolve::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "resolve", about = "Resolve configuration server properties")]
struct Args {
    /// Read all inputs from a YAML or JSON settings file
    #[arg(long, conflicts_with_all = ["application", "profile"])]
    settings: Option<PathBuf>,

    /// Configuration server base URL
    #[arg(long, env = "CFGRESOLVE_URL", required_unless_present = "settings")]
    url: Option<String>,

    /// Application name
    #[arg(long, short, required_unless_present = "settings")]
    application: Option<String>,

    /// Profile, possibly comma-separated
    #[arg(long, short, required_unless_present = "settings")]
    profile: Option<String>,

    /// Label (branch, tag or commit)
    #[arg(long, short)]
    label: Option<String>,

    /// Basic-auth user name
    #[arg(long, env = "CFGRESOLVE_USERNAME")]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "CFGRESOLVE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Keep only fragments whose name contains this (repeatable)
    #[arg(long = "property-source")]
    property_sources: Vec<String>,

    /// Treat every key from fragments containing this as secret (repeatable)
    #[arg(long = "secret-source")]
    secret_sources: Vec<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Total attempts before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Print secret values instead of masking them
    #[arg(long)]
    show_secrets: bool,
}

impl Args {
    fn inputs(&self) -> Result<ResolveInputs> {
        let mut inputs = match &self.settings {
            Some(path) => load_inputs_file(path)?,
            None => ResolveInputs::new(
                self.url.clone().unwrap_or_default(),
                self.application.clone().unwrap_or_default(),
                self.profile.clone().unwrap_or_default(),
            ),
        };

        if let Some(label) = &self.label {
            inputs.label = Some(label.clone());
        }
        if self.username.is_some() {
            inputs.username = self.username.clone();
        }
        if self.password.is_some() {
            inputs.password = self.password.clone();
        }
        if !self.property_sources.is_empty() {
            inputs.property_sources = Some(self.property_sources.clone());
        }
        if !self.secret_sources.is_empty() {
            inputs.secret_sources = Some(self.secret_sources.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            inputs.timeout_ms = Some(timeout_ms);
        }
        if let Some(max_attempts) = self.max_attempts {
            inputs.retry.max_attempts = max_attempts;
        }
        Ok(inputs)
    }
}

async fn run(args: &Args) -> Result<PersistableState> {
    let inputs = args.inputs()?;
    tracing::info!("Resolving {:?}", inputs);
    Resolver::http()?.resolve(&inputs).await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let state = match run(&args).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let printable = if args.show_secrets {
        state
    } else {
        state.masked()
    };
    match serde_json::to_string_pretty(&printable) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
