use clap::Parser;

use bananagen::{
    cli::Cli,
    config::{GeminiConfig, API_KEY_ENV},
    error::{Error, Result},
    logger,
    models::ModelRun,
    orchestrator, GeminiClient,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logger_config = if cli.verbose {
        logger::LoggerConfig::verbose()
    } else {
        logger::LoggerConfig::default()
    };
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match dotenv::dotenv() {
        Ok(_) => log::debug!("✅ .env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    let ok = match run(cli).await {
        Ok(runs) => runs.iter().any(ModelRun::succeeded),
        Err(e) => {
            log::error!("{}", e);
            if matches!(e, Error::MissingApiKey) {
                log::error!("Please either:");
                log::error!("  1. Provide the --api-key argument");
                log::error!("  2. Set the {} environment variable", API_KEY_ENV);
            }
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Resolve configuration and inputs, then dispatch one or both models.
/// Per-model generation failures are reported inside the runs; an `Err`
/// here means the run was aborted before any network call.
async fn run(cli: Cli) -> Result<Vec<ModelRun>> {
    let config = GeminiConfig::resolve(cli.api_key.clone())?;
    let request = orchestrator::resolve_request(&cli)?;
    let client = GeminiClient::new(config)?;

    if !request.images.is_empty() {
        log::info!(
            "🖼️  Processing {} image{} with resolution {}...",
            request.images.len(),
            if request.images.len() > 1 { "s" } else { "" },
            request.resolution
        );
    } else {
        log::info!("🎨 Generating image with resolution {}...", request.resolution);
    }

    let runs = if cli.ab_test {
        orchestrator::run_ab_test(client.image(), &request, &cli.filename).await
    } else {
        vec![orchestrator::run_model(client.image(), cli.model, &request, &cli.filename).await]
    };

    Ok(runs)
}
