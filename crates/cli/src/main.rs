//! deepscan - image authenticity checks from the terminal
//!
//! Sends an image to the detection service and prints the verdict.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deepscan_engine::{DetectionConfig, HttpClassifier, LimitsConfig, Phase};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod console;
mod media;
mod session;

use console::ConsoleSink;

/// deepscan - check whether an image is authentic or AI-generated
#[derive(Parser, Debug)]
#[command(name = "deepscan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the detection service (overrides DEEPSCAN_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one image and print the verdict
    Detect {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// Check that the detection service is up
    Health,

    /// Interactive session: select, submit, clear
    Session,
}

fn config_from(cli: &Cli) -> Result<DetectionConfig> {
    let config = match &cli.api_url {
        Some(url) => DetectionConfig::new(url.clone(), LimitsConfig::defaults()),
        None => DetectionConfig::from_env(),
    };
    config.context("invalid detection service URL")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let config = config_from(&cli)?;

    match cli.command {
        Commands::Detect { image } => run_detect(config, image).await,
        Commands::Health => run_health(config).await,
        Commands::Session => session::run(config).await,
    }
}

async fn run_detect(config: DetectionConfig, image: PathBuf) -> Result<ExitCode> {
    let sink = Arc::new(ConsoleSink::default());
    let mut workflow = deepscan_engine::http_workflow(config, sink)?;

    let candidate = media::load_candidate(&image).await?;
    if workflow.select_file(candidate).is_err() {
        return Ok(ExitCode::FAILURE);
    }

    match workflow.submit().await {
        Phase::Completed => {
            if let Some(verdict) = workflow.verdict() {
                console::print_verdict(verdict);
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn run_health(config: DetectionConfig) -> Result<ExitCode> {
    let classifier = HttpClassifier::new(&config)?;
    match classifier.health().await {
        Ok(health) => {
            println!(
                "{}: {} (device: {})",
                config.base_url(),
                health.status,
                health.device.as_deref().unwrap_or("unknown")
            );
            Ok(if health.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Err(e) => {
            eprintln!("{}: unreachable ({})", config.base_url(), e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
