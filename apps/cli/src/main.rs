//! groove - compile and run faceted catalog searches
//!
//! ```text
//! groove compile keywords=coltrane status=in-stock,on-sale sorting=newest
//! groove search --pretty taxon=12 format=vinyl page=2
//! ```

mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use groove_client::{ElasticsearchBackend, SearchRequest, Searcher};
use groove_query::{Clock, QueryCompiler, SearchCriteria};
use serde::Serialize;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "groove", version, about = "Compile and run faceted catalog searches")]
struct Cli {
    /// Configuration file (defaults to ./groove.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the request body for the given search parameters
    Compile(QueryArgs),
    /// Run the search against the configured backend and print the results
    Search(QueryArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Search parameters, e.g. keywords=coltrane status=in-stock,on-sale
    #[arg(value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Resolve dates against this instant instead of backend date math
    #[arg(long, value_name = "RFC3339", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Extra filter clause as JSON (repeatable)
    #[arg(long = "raw", value_name = "JSON")]
    raw_clauses: Vec<String>,
}

impl QueryArgs {
    fn criteria(&self) -> anyhow::Result<SearchCriteria> {
        let mut criteria = SearchCriteria::from_items(&self.params);
        for raw in &self.raw_clauses {
            criteria = criteria
                .with_raw_clause_str(raw)
                .with_context(|| format!("Invalid --raw clause: {raw}"))?;
        }
        Ok(criteria)
    }

    fn clock(&self) -> Clock {
        self.now.map(Clock::fixed).unwrap_or_default()
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        index = %config.backend.index,
        "Configuration loaded"
    );

    let compiler = QueryCompiler::new(config.compiler.clone());

    match &cli.command {
        Command::Compile(args) => {
            let criteria = args.criteria()?;
            let request = SearchRequest {
                query: compiler.compile_at(&criteria, args.clock()),
                from: criteria.offset(),
                size: criteria.page_size,
            };
            print_json(&request.to_body(), cli.pretty)?;
        }
        Command::Search(args) => {
            let criteria = args.criteria()?;
            let backend = ElasticsearchBackend::new(&config.backend)
                .context("Failed to create search backend client")?;
            tracing::info!(url = backend.search_url(), "Running search");

            let searcher = Searcher::new(compiler, backend);
            let results = searcher
                .search_at(&criteria, args.clock())
                .await
                .context("Search failed")?;
            for warning in &results.schema_warnings {
                tracing::warn!(warning = %warning, "Schema mismatch in search response");
            }
            print_json(&results, cli.pretty)?;
        }
        Command::Config => print_json(&config, cli.pretty)?,
    }

    Ok(())
}
