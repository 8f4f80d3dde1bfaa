use crate::{CaptureRequest, CaptureService, Config, Format};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "screenshot-cache")]
#[command(about = "URL screenshot capture with filesystem caching")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Storage root for cached artifacts")]
    pub storage: Option<PathBuf>,

    #[arg(long, help = "Render timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Rendering engine name")]
    pub engine: Option<String>,

    #[arg(long, help = "Explicit renderer command line")]
    pub renderer: Option<String>,

    #[arg(long, help = "Rewrite artifacts through the optimizer chain")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a screenshot of a URL, serving from cache when possible
    Capture {
        #[arg(short, long, help = "URL to capture")]
        url: String,

        #[arg(long, help = "Output format (png, jpeg, gif, svg)")]
        format: Option<String>,

        #[arg(long, help = "Bypass the cache and re-render")]
        force: bool,

        #[arg(long, help = "Namespace tenant id")]
        tid: Option<String>,

        #[arg(long, help = "Namespace section")]
        section: Option<String>,

        #[arg(long, help = "Namespace version token")]
        updated: Option<String>,

        #[arg(long, help = "Viewport width")]
        width: Option<u32>,

        #[arg(long, help = "Viewport height")]
        height: Option<u32>,

        #[arg(long, help = "Page zoom factor")]
        zoom: Option<f64>,

        #[arg(long, help = "Delay in milliseconds before the engine captures")]
        delay: Option<u64>,

        #[arg(long, help = "Custom User-Agent string for the renderer")]
        user_agent: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        #[arg(short, long, help = "Configuration file to validate")]
        config: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub url: String,
    pub format: Option<String>,
    pub force: bool,
    pub tid: Option<String>,
    pub section: Option<String>,
    pub updated: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub zoom: Option<f64>,
    pub delay: Option<u64>,
    pub user_agent: Option<String>,
}

pub struct CliRunner {
    pub config: Config,
    pub service: CaptureService,
}

impl CliRunner {
    pub fn new(mut config: Config, args: &Cli) -> Self {
        // Override config with CLI args
        if let Some(storage) = &args.storage {
            config.storage = storage.clone();
        }
        if let Some(timeout) = args.timeout {
            config.timeout = std::time::Duration::from_secs(timeout);
        }
        if let Some(engine) = &args.engine {
            config.engine = engine.clone();
        }
        if let Some(renderer) = &args.renderer {
            config.command = Some(renderer.clone());
        }
        if args.compress {
            config.compress = true;
        }

        let service = CaptureService::new(config.clone());
        Self { config, service }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Capture {
                url,
                format,
                force,
                tid,
                section,
                updated,
                width,
                height,
                zoom,
                delay,
                user_agent,
            } => {
                self.run_capture(CaptureOptions {
                    url,
                    format,
                    force,
                    tid,
                    section,
                    updated,
                    width,
                    height,
                    zoom,
                    delay,
                    user_agent,
                })
                .await
            }
            Commands::Validate { config } => self.validate_config(config).await,
        }
    }

    pub async fn run_capture(&self, options: CaptureOptions) -> Result<()> {
        info!("Capturing screenshot of: {}", options.url);

        // The renderer writes into the storage root; make sure it exists.
        fs::create_dir_all(&self.config.storage)
            .await
            .with_context(|| format!("creating storage root {}", self.config.storage.display()))?;

        let format = match options.format.as_deref() {
            Some(value) => Some(value.parse::<Format>().map_err(|e| anyhow!(e))?),
            None => None,
        };

        let request = CaptureRequest {
            url: options.url,
            format,
            force: options.force,
            tid: options.tid,
            section: options.section,
            updated: options.updated,
            width: options.width,
            height: options.height,
            zoom: options.zoom,
            delay: options.delay,
            user_agent: options.user_agent,
            ..Default::default()
        };

        let outcome = self.service.screenshot(&request).await;
        println!("{}", outcome.path.display());

        if let Some(e) = outcome.error {
            error!("Capture failed: {}", e);
            return Err(e.into());
        }

        info!("Screenshot ready: {}", outcome.path.display());
        Ok(())
    }

    pub async fn validate_config(&self, config_path: PathBuf) -> Result<()> {
        println!("Validating configuration: {}", config_path.display());

        let config_content = fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        println!("Configuration is valid:");
        println!("  Storage root: {}", config.storage.display());
        println!("  Engine: {}", config.engine);
        println!("  Timeout: {:?}", config.timeout);
        println!("  Cache: {}", config.cache);
        println!("  Compress: {}", config.compress);
        println!(
            "  Default viewport: {}x{}",
            config.options.width, config.options.height
        );

        Ok(())
    }
}

pub fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
