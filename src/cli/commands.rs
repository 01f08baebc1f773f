use crate::config::{ServiceConfig, StoreConfig};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer, ServerHandle};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for the contact-us service
#[derive(Parser)]
#[command(name = "contact-us")]
#[command(about = "Contact-us form service", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that needs a configuration
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long, env = "CONTACT_US_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long)]
    pub addr: Option<String>,

    /// Persist requests to this JSON lines file instead of memory
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    /// Directory with template overrides
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the contact-us pages
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the effective configuration as YAML and exit
    CheckConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl ConfigArgs {
    /// File, then environment, then these flags.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::load(self.config.as_deref())?;
        config.apply_env();
        if let Some(addr) = &self.addr {
            config.bind_addr = addr.clone();
        }
        if let Some(path) = &self.store_path {
            config.store = StoreConfig::JsonLines { path: path.clone() };
        }
        if let Some(dir) = &self.templates_dir {
            config.templates_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { config } => {
            let log_config = LogConfig::from_env();
            init_logging_with_config(&log_config)?;
            let config = config.resolve()?;
            serve(&config, &log_config)
        }
        Commands::CheckConfig { config } => {
            let config = config.resolve()?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

/// Start the server for `config` and block until it exits or a shutdown
/// signal arrives.
pub fn serve(config: &ServiceConfig, log_config: &LogConfig) -> Result<()> {
    let runtime = RuntimeConfig::from_env();
    runtime.apply();

    let service = AppService::from_config(config, log_config.redact_level)?;
    let handle = HttpServer(service)
        .start(config.bind_addr.as_str())
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        addr = %handle.local_addr(),
        stack_size = runtime.stack_size,
        store = ?config.store,
        "contact-us service started"
    );

    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, addr = %handle.local_addr(), "Shutdown signal received");
    }
    // Release builds abort on panic, so the accept coroutine is not cancelled;
    // returning ends the process and closes the listener.
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("Server failed: {:?}", e))
}
