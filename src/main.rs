//! glm - GLM feeder file tool
//!
//! Parses GLM into its JSON tree form and writes trees back out as GLM.
//!
//! # Usage
//!
//! ```bash
//! glm parse feeder.glm > feeder.json
//! glm write feeder.json > feeder.glm
//! glm deembed feeder.glm --indent 4 -o flat.glm
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use glm_core::{
    error::{GlmError, Result},
    feeder,
    glm::{self, WriterConfig},
    json,
};
use tracing_subscriber::EnvFilter;

/// GLM feeder parser and writer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Spaces of indentation per nesting level in GLM output
    #[arg(long, global = true, default_value_t = 0)]
    indent: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a GLM file and print its tree as JSON
    Parse {
        /// Path to the GLM file
        #[arg(value_name = "GLM_FILE")]
        file: PathBuf,
    },
    /// Write a JSON tree back out as GLM
    Write {
        /// Path to the JSON tree
        #[arg(value_name = "JSON_FILE")]
        file: PathBuf,
    },
    /// Parse a GLM file and write it back out normalized
    Fmt {
        /// Path to the GLM file
        #[arg(value_name = "GLM_FILE")]
        file: PathBuf,
    },
    /// Lift nested objects and embedded configurations to the top level
    Deembed {
        /// Path to the GLM file
        #[arg(value_name = "GLM_FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = WriterConfig::new().with_indent(args.indent);

    let output = match &args.command {
        Command::Parse { file } => {
            let tree = glm::parse_file(file)?;
            json::to_string_pretty(&tree)?
        }
        Command::Write { file } => {
            let tree = json::read_file(file)?;
            glm::write_with(&tree, config)
        }
        Command::Fmt { file } => {
            let tree = glm::parse_file(file)?;
            glm::write_with(&tree, config)
        }
        Command::Deembed { file } => {
            let mut tree = glm::parse_file(file)?;
            let lifted = feeder::fully_de_embed(&mut tree)?;
            tracing::info!(lifted, "de-embedded nested blocks");
            glm::write_with(&tree, config)
        }
    };

    emit(args.output.as_deref(), &output)
}

fn emit(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, output).map_err(|e| GlmError::file_write(path, e)),
        None => {
            print!("{output}");
            Ok(())
        }
    }
}
