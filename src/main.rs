use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use azgentica::config::{self, ModelBackend, Settings};
use azgentica::llm::{AzureOpenAiClient, ImageAttachment, LlmClient, OllamaClient};
use azgentica::pipeline::dot::to_dot;
use azgentica::pipeline::ReviewWorkflow;
use azgentica::store::RecommendationStore;

#[derive(Parser)]
#[command(name = "azgentica")]
#[command(about = "Architecture-diagram review assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review an architecture diagram image and write a markdown report
    Review {
        /// Path to the diagram image (JPEG/PNG)
        #[arg(long, default_value = "sample_images/azure_architecture_basic.png")]
        image_path: PathBuf,

        /// Destination markdown file (default: summaryYYYYMMDD-HHMMSS.md)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write the extracted graph as Graphviz DOT
        #[arg(long)]
        dot_output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Review {
            image_path,
            output,
            dot_output,
        } => review(image_path, output, dot_output),
    }
}

fn review(
    image_path: PathBuf,
    output: Option<PathBuf>,
    dot_output: Option<PathBuf>,
) -> Result<()> {
    let settings = Settings::from_env()?;

    let store = RecommendationStore::load(&settings.store_path)?;
    tracing::info!(
        rows = store.len(),
        path = %settings.store_path.display(),
        "Loaded recommendation store"
    );

    let image = ImageAttachment::from_path(&image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;

    println!(
        "{} v{} reviewing {}",
        config::APP_NAME,
        config::APP_VERSION,
        image_path.display()
    );

    let workflow = ReviewWorkflow::new(build_client(&settings)?, store);
    let state = workflow.run_with_progress(image, |step, message| {
        println!("[{step}] {message}");
    })?;

    if let Some(dot_path) = dot_output {
        let dot = to_dot(&state.nodes, &state.edges);
        std::fs::write(&dot_path, dot)
            .with_context(|| format!("Failed to write graph to {}", dot_path.display()))?;
        println!("Graph written to {}", dot_path.display());
    }

    let summary = state.summary.unwrap_or_default();
    let output = output.unwrap_or_else(default_summary_path);
    std::fs::write(&output, &summary)
        .with_context(|| format!("Failed to write summary to {}", output.display()))?;

    println!("\n{summary}\n");
    println!("Summary written to {}", output.display());
    println!("Workflow completed.");
    Ok(())
}

fn build_client(settings: &Settings) -> Result<Box<dyn LlmClient + Send + Sync>> {
    match settings.backend {
        ModelBackend::Ollama => Ok(Box::new(OllamaClient::new(
            &settings.ollama_base_url,
            &settings.ollama_model,
            settings.timeout_secs,
        ))),
        ModelBackend::Azure => {
            let endpoint = settings
                .azure_endpoint
                .as_deref()
                .ok_or_else(|| anyhow!("AZURE_OPENAI_ENDPOINT is not set"))?;
            let api_key = settings
                .azure_api_key
                .as_deref()
                .ok_or_else(|| anyhow!("AZURE_OPENAI_API_KEY is not set"))?;
            Ok(Box::new(AzureOpenAiClient::new(
                endpoint,
                &settings.azure_deployment,
                api_key,
                settings.timeout_secs,
            )))
        }
    }
}

fn default_summary_path() -> PathBuf {
    PathBuf::from(format!(
        "summary{}.md",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}
