mod cli;
mod commands;
mod config;
mod error;
mod inputs;
mod mcp;
mod model;
mod partition;
mod pdf;
mod queue;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries command output and the MCP transport
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { paths } => {
            commands::info::run(&paths)?;
        }
        Commands::Plan {
            path,
            pages,
            fallback,
        } => {
            commands::plan::run(&path, pages.as_deref(), fallback)?;
        }
        Commands::Split {
            inputs,
            output_dir,
            pages,
            chunks,
            fallback,
            json,
        } => {
            let options = commands::split::SplitOptions {
                pages,
                chunks,
                config: config::SplitConfig {
                    fallback_chunk_size: fallback,
                    ..Default::default()
                },
                json,
            };
            commands::split::run(&inputs, &output_dir, &options)?;
        }
    }

    Ok(())
}
