use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use scenegen::llm::{GeminiClient, GeminiConfig, GenerationRequest, TextGenerator};
use scenegen::pipeline::{ScenePipeline, persist};
use scenegen::prompt::PromptLoader;

fn setup_logging(config_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scenegen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("scenegen.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let mut builder = env_logger::Builder::new();
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else if let Some(level) = config_level {
        builder.parse_filters(level);
    } else {
        builder.parse_filters("info");
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            request,
            output,
            raw,
            no_filter,
            chain,
        } => {
            handle_generate_command(request, output.as_deref(), *raw, *no_filter, *chain, config)
                .await
        }
        Commands::Filter { request } => handle_filter_command(request, config).await,
        Commands::Templates => handle_templates_command(config),
    }
}

/// Build a Gemini client from the loaded configuration
fn build_generator(config: &Config) -> Result<Arc<GeminiClient>> {
    let gemini_config = GeminiConfig {
        model: config.llm.model.clone(),
        max_output_tokens: config.llm.max_output_tokens,
        timeout: Duration::from_millis(config.llm.timeout_ms),
        base_url: config.llm.base_url.clone(),
    };

    let client = GeminiClient::new(gemini_config).context("Failed to create Gemini client")?;
    Ok(Arc::new(client))
}

async fn handle_generate_command(
    request: &str,
    output: Option<&Path>,
    raw: bool,
    no_filter: bool,
    chain: bool,
    config: &Config,
) -> Result<()> {
    info!("Generating animation code for: {}", request);

    let loader = PromptLoader::new(&config.prompts.dir);
    let system_template = loader
        .load(&config.prompts.system)
        .context("Failed to load system template")?;

    let mut pipeline = ScenePipeline::new(build_generator(config)?, system_template)
        .with_chain_filter(chain || config.output.chain_filter)
        .with_extract_code(config.output.extract_code && !raw);

    if config.output.use_filter && !no_filter {
        let filter_template = loader
            .load(&config.prompts.filter)
            .context("Failed to load filter template")?;
        pipeline = pipeline.with_filter_template(filter_template);
    }

    let outcome = pipeline
        .execute(request)
        .await
        .context("Generation failed")?;

    if let Some(filtered) = &outcome.filtered_request {
        println!("{}", "Filtered request:".cyan());
        println!("{}", filtered);
        println!();
    }
    println!("{}", outcome.text);

    // Echo first, then persist
    let destination = output.unwrap_or(&config.output.path);
    persist(destination, &outcome.text).context("Failed to write output file")?;

    info!(
        "Wrote {} bytes to {}",
        outcome.text.len(),
        destination.display()
    );
    println!("{} {}", "Saved:".green(), destination.display());
    Ok(())
}

async fn handle_filter_command(request: &str, config: &Config) -> Result<()> {
    info!("Running filter pass for: {}", request);

    let loader = PromptLoader::new(&config.prompts.dir);
    let filter_template = loader
        .load(&config.prompts.filter)
        .context("Failed to load filter template")?;

    let generator = build_generator(config)?;
    let response = generator
        .generate(GenerationRequest::new(&filter_template, request))
        .await
        .context("Filter pass failed")?;

    println!("{}", response.text);
    Ok(())
}

fn handle_templates_command(config: &Config) -> Result<()> {
    info!("Listing templates in {:?}", config.prompts.dir);

    let loader = PromptLoader::new(&config.prompts.dir);
    let templates = loader
        .list_available()
        .context("Failed to read templates directory")?;

    if templates.is_empty() {
        println!("{}", "No templates found".yellow());
        return Ok(());
    }

    for name in &templates {
        println!("{}", name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
