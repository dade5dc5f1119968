use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::node::config::NodeConfig;
use crate::node::Node;
use crate::utils::init_logging;

/// CLI for the node debug API.
#[derive(Parser)]
#[clap(name = "node-debug-api", version)]
pub struct Cli {
    /// Path to the node configuration file
    #[clap(long, default_value = "./node.toml")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Write a default configuration file
    Init {
        /// overwrite an existing file
        #[clap(long)]
        force: bool,
    },
    /// Run the node and serve the debug API
    Run {
        /// debug API bind address (host:port), overrides rpc.bind
        #[clap(long)]
        bind: Option<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Init { force } => {
            if cli.config.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", cli.config.display());
            }
            if let Some(dir) = cli.config.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&cli.config, NodeConfig::default().to_toml()?)?;
            println!("wrote default config to {}", cli.config.display());
            Ok(())
        }
        Cmd::Run { bind } => {
            let found = cli.config.exists();
            let mut cfg = if found {
                NodeConfig::load(&cli.config)?
            } else {
                NodeConfig::default()
            };
            if let Some(bind) = bind {
                cfg.rpc.bind = bind;
                cfg.validate()?;
            }
            init_logging(&cfg.rpc.log_level);
            if !found {
                warn!("config {} not found, using defaults", cli.config.display());
            }

            let svc = Node::new(cfg)?.start().await?;
            tokio::signal::ctrl_c().await?;
            println!("Shutting down node...");
            svc.shutdown().await?;
            println!("Node stopped");
            Ok(())
        }
    }
}
