//! MailBlock CLI - Bridge interface for the visual editor shell
//!
//! Commands: fields, validate, resolve, render
//! Outputs JSON to stdout (render outputs HTML)
//! Returns exit code 2 on validation failure

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use mailblock_core::{
    controls_for, resolve_for, BlockKind, Document, StyleSchema,
};

#[derive(Parser)]
#[command(name = "mailblock-cli")]
#[command(about = "MailBlock CLI - Visual Email Template Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BlockArg {
    Container,
    Layout,
}

impl From<BlockArg> for BlockKind {
    fn from(arg: BlockArg) -> Self {
        match arg {
            BlockArg::Container => BlockKind::Container,
            BlockArg::Layout => BlockKind::Layout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the editable fields and their controls for a block variant
    Fields {
        /// Block variant
        #[arg(short, long)]
        block: BlockArg,
    },

    /// Validate a style object
    Validate {
        /// Block variant
        #[arg(short, long)]
        block: BlockArg,

        /// JSON payload (style object)
        #[arg(short, long)]
        payload: String,
    },

    /// Validate then resolve a style object to its rendering properties
    Resolve {
        /// Block variant
        #[arg(short, long)]
        block: BlockArg,

        /// JSON payload (style object)
        #[arg(short, long)]
        payload: String,
    },

    /// Load a saved document, validate it, and print its HTML
    Render {
        /// Path to the document JSON file
        document: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields { block } => {
            let controls = controls_for(block.into());
            println!("{}", serde_json::to_string_pretty(&controls).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Validate { block, payload } => {
            let candidate: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            match StyleSchema::for_kind(block.into()).validate(&candidate) {
                Ok(spec) => {
                    let output = serde_json::json!({
                        "valid": true,
                        "style": spec,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(report) => {
                    let output = serde_json::json!({
                        "valid": false,
                        "violations": report.violations,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::from(2)
                }
            }
        }

        Commands::Resolve { block, payload } => {
            let candidate: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let kind: BlockKind = block.into();
            match StyleSchema::for_kind(kind).validate(&candidate) {
                Ok(spec) => {
                    let resolved = resolve_for(kind, &spec);
                    let inline_css = resolved.to_inline_css();
                    let output = serde_json::json!({
                        "valid": true,
                        "resolved": resolved,
                        "inlineCss": inline_css,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(report) => {
                    let output = serde_json::json!({
                        "valid": false,
                        "violations": report.violations,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::from(2)
                }
            }
        }

        Commands::Render { document } => {
            let document = match Document::load_from_file(&document) {
                Ok(document) => document,
                Err(e) => {
                    eprintln!(r#"{{"error": "Failed to load document: {}"}}"#, e);
                    return ExitCode::from(2);
                }
            };

            match document.validate().and_then(|validated| validated.render()) {
                Ok(html) => {
                    println!("{html}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!(r#"{{"error": "{}"}}"#, e);
                    ExitCode::from(2)
                }
            }
        }
    }
}
