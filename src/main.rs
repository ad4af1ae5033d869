use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use artgen_client::{Field, HttpGenerationService, Phase, RequestWorkflow};

/// Submit one code generation request and print the outcome.
#[derive(Parser, Debug)]
#[command(name = "artgen", version, about = "ART code generation client")]
struct Cli {
    /// Target resource to analyze
    #[arg(long)]
    url: String,

    /// Target platform/framework, e.g. shopify
    #[arg(long)]
    platform: String,

    /// Form/artifact to generate code for
    #[arg(long = "form-name")]
    form_name: String,

    /// Output language: python, java or csharp
    #[arg(long)]
    language: String,

    /// Probe the service's /health endpoint before submitting
    #[arg(long)]
    check_health: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let service = Arc::new(HttpGenerationService::from_env());
    tracing::info!("Using generation service at {}", service.base_url());

    if cli.check_health {
        let health = service.health().await?;
        tracing::info!("Service is {} (version {})", health.status, health.version);
    }

    let workflow = RequestWorkflow::new(service);
    workflow.update_field(Field::Url, cli.url);
    workflow.update_field(Field::Platform, cli.platform);
    workflow.update_field(Field::FormName, cli.form_name);
    workflow.update_field(Field::Language, cli.language);

    match workflow.submit().await? {
        Phase::Succeeded => {
            if let Some(result) = workflow.result() {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(())
        }
        Phase::Failed => {
            let message = workflow
                .error_message()
                .unwrap_or_else(|| "An error occurred".to_string());
            eprintln!("{}", message);
            std::process::exit(1);
        }
        phase => anyhow::bail!("submission settled in unexpected phase: {}", phase),
    }
}
