use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use detoxic::config::Config;
use detoxic::inference::OnnxModel;
use detoxic::service::PredictionService;
use detoxic::tokenizer::{TextEncoder, TokenizerConfig};
use detoxic::trusted::TrustedOriginStore;
use detoxic::web::{self, AppState};

/// detoxic: toxic comment classification over HTTP.
///
/// Loads a pre-trained classifier and its tokenizer config at startup and
/// serves predictions as JSON.
#[derive(Parser)]
#[command(name = "detoxic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Classify a single comment from the command line
    Predict {
        /// The comment text to classify
        comment: String,
    },

    /// Verify that every startup artifact loads (model, tokenizer, origins)
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("detoxic=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let service = Arc::new(load_service(&config)?);
            let trusted = Arc::new(TrustedOriginStore::load(
                &config.trusted_urls_path,
                &config.trusted_urls_password,
            )?);

            web::run_server(AppState { service, trusted }, port, &bind).await?;
        }

        Commands::Predict { comment } => {
            let config = Config::load()?;
            let service = load_service(&config)?;

            let prediction = service.predict_one(&comment).await?;
            let verdict = if prediction.is_toxic {
                "TOXIC".red().bold()
            } else {
                "clean".green()
            };
            println!(
                "{verdict}  (probability {:.4})",
                prediction.toxic_probability
            );
        }

        Commands::Check => {
            let config = Config::load()?;
            load_service(&config)?;
            let trusted = TrustedOriginStore::load(
                &config.trusted_urls_path,
                &config.trusted_urls_password,
            )?;

            println!("Model:           {}", config.model_path.display());
            println!("Tokenizer:       {}", config.tokenizer_config_path.display());
            println!(
                "Trusted origins: {} ({} entries)",
                config.trusted_urls_path.display(),
                trusted.origins().await.len()
            );
            println!("\n{}", "All startup artifacts loaded.".green());
        }
    }

    Ok(())
}

/// Load the tokenizer config and model artifact and assemble the pipeline.
/// Any failure here must abort startup — serving without a model is not an
/// option.
fn load_service(config: &Config) -> Result<PredictionService> {
    let tokenizer_config = TokenizerConfig::load(&config.tokenizer_config_path)?;
    let encoder = TextEncoder::from_config(&tokenizer_config)?;
    let model = OnnxModel::load(&config.model_path)?;
    info!(
        vocab = encoder.vocabulary().len(),
        max_sequence_length = encoder.max_sequence_length(),
        "Prediction pipeline ready"
    );
    Ok(PredictionService::new(encoder, Arc::new(model)))
}
