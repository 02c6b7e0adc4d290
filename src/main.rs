//! Provisioning CLI for the Ultra Car Rental voice agent on Vapi.
//!
//! Usage:
//!   vapi-provisioner                 Upload files, create agent and tools
//!   vapi-provisioner provision       Same as above
//!   vapi-provisioner plan            Print the requests without sending them
//!   vapi-provisioner init            Write the default config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

use vapi_provisioner::config::{self, ProvisionConfig};
use vapi_provisioner::types::StepEvent;
use vapi_provisioner::Provisioner;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "vapi-provisioner")]
#[command(version = "0.1.0")]
#[command(about = "Provision the Ultra Car Rental voice agent on Vapi")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the provisioner config (defaults are used if it does not exist).
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,

    /// Log level (debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Override the Vapi API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload knowledge files, create the agent and its tools, then attach them.
    Provision,

    /// Print the requests a provisioning run would send.
    Plan,

    /// Write the default configuration to --config.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    if let Ok(path) = dotenv::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let config_path = PathBuf::from(shellexpand::tilde(&cli.config).into_owned());

    let api_url = cli.api_url;

    match cli.command.unwrap_or(Commands::Provision) {
        Commands::Provision => cmd_provision(&config_path, api_url).await,
        Commands::Plan => cmd_plan(&config_path, api_url),
        Commands::Init { force } => cmd_init(&config_path, force),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

async fn cmd_provision(config_path: &Path, api_url: Option<String>) -> Result<()> {
    let cfg = match load(config_path, api_url) {
        Ok(cfg) => cfg,
        Err(e) => fail(&format!("{:#}", e)),
    };

    let provisioner = match Provisioner::from_config(cfg) {
        Ok(p) => p,
        Err(e) => fail(&e.to_string()),
    };

    let result = provisioner.run(print_step).await;
    if let Err(e) = result {
        println!("{}", e.to_string().red());
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_plan(config_path: &Path, api_url: Option<String>) -> Result<()> {
    let cfg = load(config_path, api_url)?;

    // Planning needs no credential; the client is never used.
    let provisioner = Provisioner::new(
        vapi_provisioner::vapi::VapiClient::new(&cfg.api_url, ""),
        cfg,
    )?;
    let plan = provisioner.plan()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("Failed to render plan")?
    );
    Ok(())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    config::save_config(&ProvisionConfig::default(), config_path)?;
    println!(
        "{} Wrote default config to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load(config_path: &Path, api_url: Option<String>) -> Result<ProvisionConfig> {
    let mut cfg = config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(url) = api_url {
        cfg.api_url = url;
    }
    Ok(cfg)
}

/// Report a fatal error on stdout and exit with status 1.
fn fail(message: &str) -> ! {
    println!("{} {}", "Error:".red().bold(), message);
    std::process::exit(1);
}

const RULE: &str = "--------------------------------";

fn print_step(event: StepEvent<'_>) {
    let step = event.step();
    println!("{}", RULE);
    println!(
        "{}",
        format!("Step {}: {}", step.number(), step.success_message())
            .green()
            .bold()
    );
    match event {
        StepEvent::FilesUploaded(files) => {
            for file in files {
                println!("{}_file_id: {}", file.key, file.id);
            }
        }
        StepEvent::AssistantCreated(id) => println!("assistant_id: {}", id),
        StepEvent::ToolsCreated(ids) => println!("tool_ids: {:?}", ids),
        StepEvent::ToolsAttached {
            assistant_id,
            tool_ids,
        } => println!("assistant {} now uses {} tools", assistant_id, tool_ids.len()),
    }
    println!("{}", RULE);
}
