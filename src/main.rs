//! Movement Classifier - command-line front end
//!
//! Scores request windows against a LightGBM model dump and inspects the
//! feature pipeline.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use movement_classifier::{
    extract_features, handle_predict_movement, load_model, mock_request, AppConfig, Predictor,
    SensorWindow, FEATURE_NAMES, FEATURE_SCHEMA_VERSION,
};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pedestrian movement classification from IMU + GPS windows
#[derive(Parser, Debug)]
#[command(name = "movement-classifier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a request body and print the response
    Predict {
        /// Model dump (overrides the config file)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Request body file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the named feature vector of a request body
    Features {
        /// Request body file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the feature schema
    Schema,

    /// Print a synthetic request body
    Mock {
        /// Number of samples
        #[arg(short, long, default_value = "10")]
        samples: usize,

        /// Sampling interval in milliseconds
        #[arg(short, long, default_value = "500")]
        interval: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Predict { model, input } => run_predict(&config, model.as_deref(), input.as_deref()),
        Commands::Features { input } => run_features(&config, input.as_deref()),
        Commands::Schema => run_schema(),
        Commands::Mock { samples, interval } => {
            println!("{}", serde_json::to_string_pretty(&mock_request(samples, interval))?);
            Ok(())
        }
    }
}

fn read_body(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("reading stdin")?;
            Ok(body)
        }
    }
}

fn run_predict(config: &AppConfig, model: Option<&Path>, input: Option<&Path>) -> anyhow::Result<()> {
    let model_path = model.unwrap_or(config.model.path.as_path());
    let handle = load_model(model_path);
    let predictor = Predictor::new(handle, config.pipeline.clone())
        .context("model does not match the feature schema")?;

    let body = read_body(input)?;
    let response = handle_predict_movement(&predictor, &body);
    info!(status = response.status, "request handled");
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_features(config: &AppConfig, input: Option<&Path>) -> anyhow::Result<()> {
    let body = read_body(input)?;
    let window = SensorWindow::from_json_str(&body, &config.pipeline)?;
    let features = extract_features(&window, &config.pipeline)?;
    let out = json!({
        "schema_version": FEATURE_SCHEMA_VERSION,
        "features": features.named(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_schema() -> anyhow::Result<()> {
    let out = json!({
        "schema_version": FEATURE_SCHEMA_VERSION,
        "feature_names": &FEATURE_NAMES[..],
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
