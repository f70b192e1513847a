use clap::{Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

use crate::config::DEFAULT_CHUNK_SIZE;

#[derive(Parser)]
#[command(name = "pdfchunk")]
#[command(about = "Split PDF files into parts of a fixed page count")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Show name, size and page count of PDF files
    Info {
        /// PDF files to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show how a PDF would be split, without writing anything
    Plan {
        /// PDF file to inspect
        path: PathBuf,

        /// Pages per part (defaults to the page count, i.e. no split)
        #[arg(short, long)]
        pages: Option<String>,

        /// Chunk size used when --pages is not a positive number
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        fallback: NonZeroU32,
    },

    /// Split PDF files into parts of N pages
    Split {
        /// PDF files or directories containing PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory in which a timestamped session folder is created
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Pages per part for every input (defaults to each file's page count)
        #[arg(short, long)]
        pages: Option<String>,

        /// Pages per part for one file, e.g. --chunk report.pdf=10
        #[arg(long = "chunk", value_name = "FILE=PAGES", value_parser = parse_chunk_override)]
        chunks: Vec<(PathBuf, String)>,

        /// Chunk size used when a requested one is not a positive number
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        fallback: NonZeroU32,

        /// Print the session report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_chunk_override(s: &str) -> Result<(PathBuf, String), String> {
    match s.rsplit_once('=') {
        Some((path, pages)) if !path.is_empty() => Ok((PathBuf::from(path), pages.to_string())),
        _ => Err(format!("expected FILE=PAGES, got {:?}", s)),
    }
}
