use anyhow::{bail, Context, Result};
use clap::Parser;
use screenshot_cache::{setup_logging, Cli, CliRunner, Config};
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    info!("Starting screenshot-cache v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&args).await?;

    // Create CLI runner
    let cli_runner = CliRunner::new(config, &args);

    if let Err(e) = cli_runner.run(args.command).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn load_config(args: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Load from file
        let config_content = tokio::fs::read_to_string(config_path)
            .await
            .with_context(|| format!("reading {}", config_path.display()))?;
        serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", config_path.display()))?
    } else {
        // Use default configuration
        Config::default()
    };

    // Override with CLI arguments
    if let Some(storage) = &args.storage {
        config.storage = storage.clone();
    }

    if let Some(timeout) = args.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    if let Some(engine) = &args.engine {
        config.engine = engine.clone();
    }

    if let Some(renderer) = &args.renderer {
        config.command = Some(renderer.clone());
    }

    // Validate configuration
    validate_config(&config)?;

    info!("Configuration loaded successfully");
    info!("Storage root: {}", config.storage.display());
    info!("Engine: {}", config.engine);
    info!("Render timeout: {:?}", config.timeout);

    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.storage.as_os_str().is_empty() {
        bail!("Storage root must not be empty");
    }

    if config.timeout.as_millis() == 0 {
        bail!("Render timeout must be greater than 0");
    }

    if config.engine.is_empty() && config.command.is_none() {
        bail!("Either an engine or an explicit command must be configured");
    }

    Ok(())
}
