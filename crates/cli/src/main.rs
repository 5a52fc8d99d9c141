//! Flight Probe CLI - runs the health, ping, search and order probes
//! against the flight ticketing API and prints every exchange

mod console;
mod logging;

use anyhow::Result;
use clap::Parser;
use console::{summary_table, ConsoleReporter};
use flight_probe_core::config::{DEFAULT_BASE_URL, ENV_BASE_URL, ENV_FLIGHT_ID, ENV_SEARCH_PROXY};
use flight_probe_core::{ProbeConfig, ProbeRunner, VERSION};
use flight_probe_infra_http::ReqwestTransport;
use logging::LogFormat;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "flight-probe")]
#[command(about = "Flight ticketing API probe (health, ping, search, order)", long_about = None)]
#[command(version)]
struct Cli {
    /// API base URL
    #[arg(long, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Proxy URL for the ticket search request only
    #[arg(long, env = ENV_SEARCH_PROXY)]
    search_proxy: Option<String>,

    /// Flight id to order with when search yields none
    #[arg(long, env = ENV_FLIGHT_ID)]
    flight_id: Option<String>,

    /// Ignore HTTP_PROXY/HTTPS_PROXY for direct requests
    #[arg(long, env = "API_NO_SYSTEM_PROXY")]
    no_system_proxy: bool,

    /// Log format for diagnostics on stderr
    #[arg(long, value_enum, env = "FLIGHT_PROBE_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Do not print the summary table
    #[arg(long)]
    no_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_format)?;
    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("Flight Probe v{} starting...", VERSION);

    let config = ProbeConfig::new(&cli.base_url)
        .with_search_proxy(cli.search_proxy.clone())
        .with_fallback_flight_id(cli.flight_id.clone().filter(|id| !id.trim().is_empty()))?;

    let system_proxy = !cli.no_system_proxy;
    let transport = match ReqwestTransport::new(config.search_proxy.as_deref(), system_proxy) {
        Ok(transport) => transport,
        Err(e) => {
            // Search then goes out directly
            warn!(error = %e, "Search proxy rejected (continuing without it)");
            ReqwestTransport::new(None, system_proxy)?
        }
    };

    info!(
        base_url = %config.base_url(),
        search_proxy = ?config.search_proxy,
        "Probe configuration loaded"
    );

    let runner = ProbeRunner::new(config, Arc::new(transport), Arc::new(ConsoleReporter));
    let summary = runner.run().await;

    if !cli.no_summary {
        println!();
        println!("{}", summary_table(&summary));
    }
    runner.report_finished();

    Ok(())
}
