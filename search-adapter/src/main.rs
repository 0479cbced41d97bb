use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use search_adapter::{load_config, Dependencies};
use search_adapter_repository::SearchAdapter;
use search_adapter_shared::{Criteria, Record};

#[derive(Parser)]
#[command(name = "search-adapter")]
#[command(about = "Run ORM operations against an Elasticsearch-compatible index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (environment variables are used without one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the index or bring its settings and mappings up to date
    Provision,
    /// Fetch records matching the criteria
    Select {
        collection: String,
        #[arg(default_value = "{}")]
        criteria: String,
    },
    /// Fetch the raw backend response for the criteria
    Query {
        collection: String,
        #[arg(default_value = "{}")]
        criteria: String,
    },
    /// Count records matching the criteria
    Count {
        collection: String,
        #[arg(default_value = "{}")]
        criteria: String,
    },
    /// Insert a record keyed by its id
    Insert { collection: String, values: String },
    /// Update the record addressed by id
    Update {
        collection: String,
        criteria: String,
        values: String,
    },
    /// Delete the record addressed by where.id
    Destroy { collection: String, criteria: String },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);

        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(config.log.as_deref(), cli.json_logs);

    let Dependencies { adapter } = Dependencies::new(config).await?;
    let output = execute(&adapter, cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(adapter: &SearchAdapter, command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Provision => {
            info!(index = adapter.index_name(), "Index provisioned");
            json!({ "index": adapter.index_name(), "status": "ready" })
        }
        Commands::Select { collection, criteria } => adapter
            .select(&collection, &parse_criteria(&criteria)?)
            .await?
            .into_value(),
        Commands::Query { collection, criteria } => {
            adapter
                .query(&collection, &parse_criteria(&criteria)?)
                .await?
        }
        Commands::Count { collection, criteria } => {
            let count = adapter
                .count(&collection, &parse_criteria(&criteria)?)
                .await?;
            json!(count)
        }
        Commands::Insert { collection, values } => adapter
            .insert(&collection, parse_record(&values)?)
            .await?
            .into_value(),
        Commands::Update {
            collection,
            criteria,
            values,
        } => {
            let updated = adapter
                .update(&collection, &parse_criteria(&criteria)?, parse_record(&values)?)
                .await?;
            records_value(updated)
        }
        Commands::Destroy { collection, criteria } => {
            let destroyed = adapter
                .destroy(&collection, &parse_criteria(&criteria)?)
                .await?;
            records_value(destroyed)
        }
    };

    Ok(output)
}

fn init_tracing(configured: Option<&str>, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_criteria(raw: &str) -> Result<Criteria> {
    serde_json::from_str(raw).with_context(|| format!("Invalid criteria JSON: {}", raw))
}

fn parse_record(raw: &str) -> Result<Record> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("Invalid values JSON: {}", raw))?;
    Record::try_from(value).context("Values must be a JSON object")
}

fn records_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Record::into_value).collect())
}
