mod config;
mod deezer_rs;
mod http_server;
mod huggingface;
mod logging;
mod ports;
mod services;
mod speech;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    http_server::app::{mood_router, playlist_router, serve},
    logging::init_tracing,
    services::{
        mood::{
            MoodService, classifier_client::HuggingFaceClassifier,
            transcriber_client::GoogleSpeechTranscriber,
        },
        playlist::{PlaylistService, client::DeezerHttpAdapter},
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "MOODTUNE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `moodtune=debug,tower_http=info`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, global = true, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the playlist search API
    Playlist {
        /// The port to run the server on
        #[arg(short, long, default_value = "5000", env = "MOODTUNE_PLAYLIST_PORT")]
        port: u16,
    },
    /// Serve the mood analysis API
    Mood {
        /// The port to run the server on
        #[arg(short, long, default_value = "8000", env = "MOODTUNE_MOOD_PORT")]
        port: u16,

        /// Hugging Face API token for the emotion model
        #[arg(long, env = "HF_API_TOKEN")]
        hf_token: Option<String>,

        /// Google Speech-to-Text API key
        #[arg(long, env = "GOOGLE_SPEECH_API_KEY")]
        speech_api_key: String,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracing_guard = init_tracing("moodtune", args.otlp_endpoint.as_deref(), &args.log_level)?;

    let result = run(args).await;
    tracing_guard.shutdown();
    result
}

async fn run(args: Args) -> Result<()> {
    tracing::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load moodtune config")?;

    match args.command {
        Commands::Playlist { port } => {
            let provider = DeezerHttpAdapter::new(&config.playlist)?;
            let service = Arc::new(PlaylistService::new(provider, config.playlist.clone()));
            tracing::info!("Starting playlist service on port: {}", port);
            serve(playlist_router(service), port).await?;
        }
        Commands::Mood {
            port,
            hf_token,
            speech_api_key,
        } => {
            // Adapters are built once and shared read-only by every request
            let classifier = HuggingFaceClassifier::new(&config.mood, hf_token)?;
            let transcriber = GoogleSpeechTranscriber::new(&config.mood, speech_api_key)?;
            let service = Arc::new(MoodService::new(classifier, transcriber, &config.mood));
            tracing::info!("Starting mood service on port: {}", port);
            serve(mood_router(service), port).await?;
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
