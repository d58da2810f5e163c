// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compile a shader graph document to GLSL.
//!
//! ```text
//! shadergraph <graph.ron> [--options <options.ron>] [--header <path>] [--body <path>]
//! ```
//!
//! Without `--header`/`--body` both streams are printed to stdout.
//! Logs go to stderr and honor `RUST_LOG`.

use clap::Parser;
use shadergraph::{create_default_registry, GenerateError, GeneratorOptions, GraphDocument};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse options '{path}': {source}")]
    Options {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error(transparent)]
    Document(#[from] shadergraph::DocumentError),

    #[error("Code generation failed: {0}")]
    Generate(#[from] GenerateError),
}

/// Compile a shader graph document to GLSL
#[derive(Parser, Debug)]
#[command(name = "shadergraph", version)]
struct Args {
    /// Graph document (RON)
    graph: PathBuf,

    /// Generator options (RON)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Write the header stream here instead of stdout
    #[arg(long)]
    header: Option<PathBuf>,

    /// Write the body stream here instead of stdout
    #[arg(long)]
    body: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<(), CliError> {
    std::fs::write(path, content).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let options = match &args.options {
        Some(path) => ron::from_str(&read(path)?).map_err(|source| CliError::Options {
            path: path.clone(),
            source,
        })?,
        None => GeneratorOptions::default(),
    };

    let document = GraphDocument::from_ron(&read(&args.graph)?)?;
    let graph = document.into_graph(Arc::new(create_default_registry()))?;
    tracing::info!(graph = %graph.name, nodes = graph.node_count(), "loaded graph");

    let code = graph.generate_code_with(&options)?;

    match (&args.header, &args.body) {
        (None, None) => {
            print!("{}", code.header);
            print!("{}", code.body);
        }
        (header, body) => {
            match header {
                Some(path) => write(path, &code.header)?,
                None => print!("{}", code.header),
            }
            match body {
                Some(path) => write(path, &code.body)?,
                None => print!("{}", code.body),
            }
        }
    }
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shadergraph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
