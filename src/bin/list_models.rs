use std::process::ExitCode;

use clap::Parser;

use narrator::config::{API_BASE_VAR, lister_api_key, load_dotenv};
use narrator::consts::DEFAULT_API_BASE;
use narrator::generator::gemini::GeminiGenerator;
use narrator::lister::render_report;
use narrator::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "list-models",
    version,
    about = "List Gemini models that support content generation."
)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    Cli::parse();

    init_tracing();
    load_dotenv();

    let env = |key: &str| std::env::var(key).ok();

    let api_key = match lister_api_key(env) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Please set it to your actual API key before running this program.");
            return ExitCode::FAILURE;
        }
    };
    let api_base = env(API_BASE_VAR)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let generator = GeminiGenerator::new(api_key, None).with_base_url(api_base);

    match generator.list_models().await {
        Ok(models) => {
            print!("{}", render_report(&models));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("An error occurred while listing models: {e:#}");
            eprintln!("Please check your API key and network connection.");
            ExitCode::FAILURE
        }
    }
}
