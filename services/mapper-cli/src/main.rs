//! Methane Mapper command-line client.
//!
//! Drives the layer controller against a running Methane Mapper API:
//! - One-shot rendering of a layer for a set of parameters
//! - An interactive session that reacts to parameter changes as they are typed
//! - A listing of the global prediction plumes

mod config;
mod report;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use layer_controller::LayerController;
use mapper_api::{HttpMapperApi, MapperApi};
use methane_common::{Basemap, LayerKind, ParameterUpdate};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::MapperConfig;
use report::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "methane-mapper")]
#[command(about = "Client for the Methane Mapper satellite methane API")]
struct Args {
    /// Configuration file
    #[arg(long, global = true, env = "MAPPER_CONFIG", default_value = "config/mapper.yaml")]
    config: PathBuf,

    /// API base URL (overrides the configuration file)
    #[arg(long, global = true, env = "MAPPER_API_URL")]
    api_url: Option<String>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one layer and print what the map would show
    Show {
        /// Layer to display (heatmap, plumes, prediction)
        #[arg(short, long)]
        layer: Option<LayerKind>,

        /// Date to display (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "latest")]
        date: Option<NaiveDate>,

        /// Use the latest available data
        #[arg(long)]
        latest: bool,

        /// Heatmap threshold in ppb
        #[arg(short, long)]
        threshold: Option<u16>,

        /// Basemap (satellite, roadmap)
        #[arg(short, long)]
        basemap: Option<Basemap>,

        /// Load and show the factory overlay
        #[arg(long)]
        factories: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Interactive session
    Interactive {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// List the plumes of the global prediction
    GlobalPredictions {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let mut config = MapperConfig::load_or_default(&args.config)?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    config.validate().context("Invalid configuration")?;

    let api = Arc::new(
        HttpMapperApi::new(&config.client_config()).context("Failed to build HTTP client")?,
    );
    info!(base_url = %api.base_url(), "Using Methane Mapper API");

    match args.command {
        Commands::Show {
            layer,
            date,
            latest,
            threshold,
            basemap,
            factories,
            output,
        } => {
            let mut controller = build_controller(&config, api)?;

            let mut update = ParameterUpdate::new();
            update.active_layer = layer;
            update.threshold = threshold;
            update.basemap = basemap;
            if let Some(date) = date {
                update = update.date(date);
            } else if latest {
                update = update.latest();
            }
            controller.set_parameters(update)?;

            if controller.in_flight().is_none() {
                controller.evaluate();
            }
            controller.settle().await;

            if factories {
                if let Err(err) = controller.load_factories() {
                    warn!(error = %err, "Factory overlay unavailable");
                }
            }

            println!("{}", report::render(&controller.view(), output)?);
        }
        Commands::Interactive { output } => {
            let controller = build_controller(&config, api)?;
            session::run(controller, output).await?;
        }
        Commands::GlobalPredictions { output } => {
            let response = api
                .global_prediction()
                .await
                .context("Failed to fetch global prediction")?;
            if let Some(message) = response.error_message() {
                warn!(error = %message, "Global prediction reported an error");
            }

            let plumes = response.into_plumes();
            if plumes.is_empty() {
                println!("No predicted plumes found.");
            } else {
                let predicted = plumes.iter().filter(|p| p.is_predicted).count();
                info!(total = plumes.len(), predicted, "Global prediction loaded");
                println!("{}", report::render_plumes(&plumes, output)?);
            }
        }
    }

    Ok(())
}

fn build_controller(config: &MapperConfig, api: Arc<HttpMapperApi>) -> Result<LayerController> {
    let catalog = config.factory_catalog()?;
    let controller = LayerController::new(api, config.controller_settings(), catalog)
        .with_parameters(config.initial_parameters()?);
    debug!(
        factories = controller.factories().catalog_len(),
        "Factory catalog ready"
    );
    Ok(controller)
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Reports go to stdout; keep logs out of the way.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
