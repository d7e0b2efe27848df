mod config;
mod render;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dex_core::{DexController, HttpGateway};
use shared::region::ALL_REGIONS;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

const BOOT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "pokedex", about = "Browse Pokémon from the terminal")]
struct Cli {
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the resulting state as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Search {
        query: String,
    },
    Random {
        #[arg(long)]
        region: Option<String>,
    },
    Browse {
        region: String,
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    Regions,
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter_handle = init_tracing();

    let mut settings = config::load_settings(cli.config.as_deref());
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    if let Some(filter) = configured_filter(rust_log.as_deref(), &settings.log_filter) {
        if let Err(err) = filter_handle.reload(filter) {
            warn!("pokedex: keeping boot log filter err={err}");
        }
    }

    info!(
        "pokedex: starting api_base_url={} page_size={}",
        settings.api_base_url, settings.page_size
    );

    let gateway = HttpGateway::new(&settings.api_base_url)?;
    let controller = DexController::new(Arc::new(gateway), settings.controller_config());

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => return shell::run(controller, settings.startup_query).await,
        Command::Regions => {
            println!("{}", shell::region_listing(&controller));
            return Ok(());
        }
        Command::Search { query } => controller.search(&query).await,
        Command::Random { region } => {
            let region = region.unwrap_or_else(|| ALL_REGIONS.to_string());
            if controller.regions().get(&region).is_none() {
                bail!("unknown region: {region}");
            }
            controller.change_region(&region).await;
            if needs_name_index(&region) {
                controller.load_name_index().await;
            }
            controller.pick_random().await;
        }
        Command::Browse { region, pages } => {
            controller.enter_browse(&region).await;
            for _ in 1..pages {
                controller.load_more_browse().await;
            }
        }
    }

    let state = controller.snapshot().await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render::render(&state, controller.regions()));
    }

    if let Some(error) = state.last_error {
        bail!(error);
    }
    Ok(())
}

/// Installs the subscriber before settings load so config warnings are kept.
/// `RUST_LOG` wins; otherwise the boot filter applies until settings swap it.
fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOT_LOG_FILTER));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

fn configured_filter(rust_log: Option<&str>, log_filter: &str) -> Option<EnvFilter> {
    match rust_log {
        Some(value) if !value.trim().is_empty() => None,
        _ => Some(EnvFilter::new(log_filter)),
    }
}

/// Only the unrestricted random pick draws from the name index.
fn needs_name_index(region: &str) -> bool {
    region.trim().eq_ignore_ascii_case(ALL_REGIONS)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
