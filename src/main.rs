use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use narrator::annotator::Annotator;
use narrator::config::{ServiceConfig, load_dotenv};
use narrator::generator::GenerationOptions;
use narrator::generator::gemini::GeminiGenerator;
use narrator::logging::init_tracing;
use narrator::server::{self, AppState};

#[derive(Parser)]
#[command(
    name = "narrator",
    version,
    about = "Annotate manuscripts with narration cues via Gemini."
)]
struct Cli {
    /// Address to bind (overrides NARRATOR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides NARRATOR_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Gemini model name (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    load_dotenv();

    let mut config = ServiceConfig::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let generator = GeminiGenerator::new(config.api_key.clone(), Some(config.model.clone()))
        .with_base_url(config.api_base.clone());
    let annotator = Annotator::new(Arc::new(generator), GenerationOptions::default());
    let state = AppState::new(annotator);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %listener.local_addr()?,
        model = %config.model,
        "narrator listening"
    );

    server::serve(listener, state).await?;

    info!("server shutdown complete");
    Ok(())
}
