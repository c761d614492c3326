//! PrintPreview - destination selection and print ticket engine
//!
//! Main entry point for the PrintPreview CLI.

mod cli;
mod service;
mod session;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use printpreview_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use printpreview_core::Destination;
use printpreview_protocols::Policies;

use crate::cli::{Cli, Commands};
use crate::service::FixtureService;
use crate::session::{read_sticky_settings, write_sticky_settings, Session};

/// Initialize tracing. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(path).context("failed to load configuration")?;
    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        eprintln!("config warning: {}: {}", warning.path, warning.message);
    }
    for error in &validation.errors {
        eprintln!("config error: {}: {}", error.path, error.message);
    }
    validation.into_result().context("invalid configuration")?;
    Ok(config)
}

fn load_policies(path: Option<&Path>) -> anyhow::Result<Option<Policies>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policies {}", path.display()))?;
    let policies = Policies::from_json(&content)
        .with_context(|| format!("invalid policies {}", path.display()))?;
    Ok(Some(policies))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);
    info!("Running as {}", config.platform.kind);

    let service = Arc::new(FixtureService::load(&cli.printers)?);
    let policies = load_policies(cli.policies.as_deref())?;
    let sticky_path = config.sticky.resolved_path();
    let sticky = sticky_path.as_deref().and_then(read_sticky_settings);

    let mut session = Session::new(config, service, policies.as_ref(), sticky.as_deref());

    match cli.command.unwrap_or(Commands::Ticket {
        destination: None,
        settings: Vec::new(),
        open_pdf_in_preview: false,
        system_dialog: false,
        no_save: false,
    }) {
        Commands::List { format } => {
            if let Err(e) = session.start().await {
                warn!("No initial destination: {}", e);
            }
            session.load_all().await?;
            print_destinations(&session.destinations(), &format)
        }
        Commands::Ticket {
            destination,
            settings,
            open_pdf_in_preview,
            system_dialog,
            no_save,
        } => {
            let mut selected = session.start().await?;
            if let Some(id) = destination {
                selected = session.select(&id).await?;
            }
            session.configure(selected);
            session.apply_assignments(&settings)?;
            let ticket = session.print(open_pdf_in_preview, system_dialog)?;
            println!("{}", ticket.to_json()?);

            match sticky_path {
                Some(path) if !no_save => write_sticky_settings(&path, &session.sticky_settings())?,
                Some(_) => {}
                None => warn!("No location for sticky settings, not saving"),
            }
            Ok(())
        }
    }
}

fn print_destinations(destinations: &[Destination], format: &str) -> anyhow::Result<()> {
    if destinations.is_empty() {
        println!("No destinations found.");
        return Ok(());
    }

    match format {
        "json" => {
            let listing: Vec<_> = destinations
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id(),
                        "name": d.display_name(),
                        "type": d.printer_type(),
                        "origin": d.origin(),
                        "state": d.printer_state(),
                        "icon": d.icon(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        _ => {
            println!("{:<28} {:<28} {:<10} {:<10} {}", "ID", "NAME", "TYPE", "ORIGIN", "STATE");
            println!("{}", "-".repeat(90));
            for d in destinations {
                println!(
                    "{:<28} {:<28} {:<10} {:<10} {:?}",
                    d.id(),
                    d.display_name(),
                    d.printer_type().to_string(),
                    d.origin().as_str(),
                    d.printer_state()
                );
            }
        }
    }

    Ok(())
}
