// ABOUTME: CLI argument definitions for the wcl application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wcl")]
#[command(about = "A CLI for the Warcraft Logs API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read configuration from this file only
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate Rust type definitions from the live schema
    Generate {
        /// Directory enums.rs and objects.rs are written to
        #[arg(long, short, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Run a query tree read from a JSON file
    Query {
        /// JSON file holding a query tree, or a full query with `tree`, `variables` and `paginator`
        file: PathBuf,

        /// Response field carrying the next-page cursor
        #[arg(long, requires = "overrides")]
        pagination_field: Option<String>,

        /// Query variable the cursor is written to
        #[arg(long)]
        overrides: Option<String>,

        /// Serve repeated identical queries from the in-process cache
        #[arg(long)]
        cacheable: bool,

        /// Bind a query variable (value parsed as JSON, else taken as a string)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Pretty print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the introspection schema as JSON
    Schema {
        /// Pretty print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Fetch a fresh access token and store it
    Auth,
}
