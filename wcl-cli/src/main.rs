// ABOUTME: Main entry point for the wcl CLI application
// ABOUTME: Parses arguments, loads configuration and dispatches to command handlers

use anyhow::{Context, Result};
use clap::Parser;
use wcl_cli::cli::{Cli, Commands};
use wcl_cli::commands::{self, QueryOptions};
use wcl_cli::config::Config;
use wcl_cli::output::{FileSourceWriter, JsonFormatter};
use wcl_sdk::storage;
use wcl_sdk::{QueryExecutor, TokenProvider, WclError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        if let Some(help) = err.downcast_ref::<WclError>().and_then(WclError::help_text) {
            eprintln!();
            eprintln!("{help}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    let (provider, client) = commands::build_client(&config)?;
    let executor: Box<dyn QueryExecutor> = commands::build_executor(&config, client)?;

    match cli.command {
        Commands::Generate { output_dir } => {
            let mut writer = FileSourceWriter::new(output_dir.unwrap_or_else(|| config.output_dir()));
            commands::generate(executor.as_ref(), &mut writer).await?;
            for path in writer.written() {
                println!("Wrote {}", path.display());
            }
        }
        Commands::Query {
            file,
            pagination_field,
            overrides,
            cacheable,
            vars,
            pretty,
        } => {
            let options = QueryOptions {
                pagination_field,
                overrides,
                cacheable,
                vars,
            };
            let mut query = commands::load_query(&file, options)?;
            let body = executor
                .execute(&mut query)
                .await
                .context("Query failed")?;
            println!("{}", JsonFormatter::new(pretty).format(&body)?);
        }
        Commands::Schema { pretty } => {
            let schema = commands::dump_schema(executor.as_ref()).await?;
            println!("{}", JsonFormatter::new(pretty).format(&schema)?);
        }
        Commands::Auth => {
            storage::clear(&config.token_path()).context("Failed to remove cached token")?;
            provider.refresh().await.context("Token refresh failed")?;
            println!(
                "Stored a new access token at {}",
                config.token_path().display()
            );
        }
    }

    Ok(())
}
