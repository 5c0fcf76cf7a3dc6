//! Command-line front end: extract one or more legacy Sketch documents.
//!
//! Each path may be a document or a directory of documents. One status line
//! is printed per document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use sketchx::sketch::batch::process_directory_with_ledger;
use sketchx::sketch::{ExtractOptions, Extractor, OutputLedger};

#[derive(Parser, Debug)]
#[command(name = "sketchx", version, about = "Export legacy Sketch document data to JSON and XML")]
struct Cli {
    /// Documents or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Expected document extension
    #[arg(long, default_value = sketchx::sketch::config::DEFAULT_EXTENSION)]
    extension: String,

    /// Payload entry to decode (repeatable); defaults to main and UIMetadata
    #[arg(long = "allow", value_name = "NAME")]
    allow: Vec<String>,

    /// Directory for the exported files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON indentation width
    #[arg(long, default_value_t = 4)]
    indent: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut options = ExtractOptions::new()
        .with_extension(cli.extension)
        .with_output_dir(&cli.output_dir)
        .with_json_indent(cli.indent);
    if !cli.allow.is_empty() {
        options = options.with_allow_list(cli.allow);
    }

    let extractor = Extractor::new(options);
    let mut ledger = OutputLedger::new();
    let mut status = ExitCode::SUCCESS;

    for path in &cli.paths {
        if path.is_dir() {
            match process_directory_with_ledger(path, &extractor, &mut ledger) {
                Ok(entries) => {
                    for entry in entries {
                        println!("{}", entry);
                    }
                },
                Err(e) => {
                    error!("Failed to list directory '{}': {}", path.display(), e);
                    status = ExitCode::FAILURE;
                },
            }
        } else {
            let result = extractor.process_with_ledger(path, &mut ledger);
            println!("{}", result.status_message());
        }
    }

    status
}
