//! kgrag CLI: build a knowledge graph from text and ask it questions.

mod commands;
mod config;
mod pdf;
mod setup;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kgrag_rag::Strategy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "kgrag")]
#[command(author, version, about = "kgrag - Knowledge-graph retrieval over extracted entities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: kgrag.toml in the current or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default kgrag.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Extract entity/relationship records from a text or PDF file with the LLM
    Extract {
        /// Input text or .pdf (default: graph.input_file)
        input: Option<PathBuf>,

        /// First PDF page to read, 1-based
        #[arg(long, default_value_t = 1)]
        start_page: u32,

        /// Last PDF page to read, inclusive (default: last page)
        #[arg(long)]
        end_page: Option<u32>,

        /// Output records file (default: graph.data_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a records file, build the index and report counts
    Load {
        /// Records file (default: graph.data_file)
        file: Option<PathBuf>,
    },

    /// Answer a question
    Query {
        question: String,

        /// Nodes to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Ranking strategy: precomputed or naive
        #[arg(short, long)]
        strategy: Option<Strategy>,
    },

    /// Start the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        command => {
            let config = Config::load(cli.config.as_deref())?;
            dispatch(&config, command)
        }
    }
}

fn dispatch(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Extract {
            input,
            start_page,
            end_page,
            output,
        } => {
            let pages = pdf::PageRange {
                start: start_page,
                end: end_page,
            };
            commands::extract::run(config, input, pages, output)
        }
        Commands::Load { file } => commands::load::run(config, file),
        Commands::Query {
            question,
            top_k,
            strategy,
        } => commands::query::run(config, &question, top_k, strategy),
        Commands::Serve { host, port } => commands::serve::run(config, host, port),
    }
}
