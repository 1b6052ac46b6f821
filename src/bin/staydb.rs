use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use staydb::database::{check_status, initialize, ConnectionManager, SchemaStatus, TABLE_NAMES};
use staydb::StaydbConfig;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::Level;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.staydb/staydb.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all reservation tables in dependency order (safe to re-run)
    Provision,

    /// Show schema status: version and per-table presence
    Status {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show the resolved configuration (password redacted)
    Config,
}

#[derive(Tabled, Serialize)]
struct TableStatus {
    #[tabled(rename = "table")]
    name: String,
    #[tabled(rename = "present")]
    present: bool,
}

#[derive(Serialize)]
struct StatusReport {
    schema: SchemaStatus,
    tables: Vec<TableStatus>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = StaydbConfig::new(&cli.config)?;

    match cli.command {
        Commands::Provision => run_provision(config).await,
        Commands::Status { json } => run_status(config, json).await,
        Commands::Config => {
            println!("{}", config.summary());
            println!("Config file:    {}", StaydbConfig::config_file_path());
            Ok(())
        }
    }
}

async fn run_provision(config: StaydbConfig) -> Result<()> {
    let mut manager = ConnectionManager::new(config);
    // the connection is released on every exit path, error included
    let result = initialize(&mut manager).await;
    manager.disconnect().await;
    result?;

    println!("all {} tables created", TABLE_NAMES.len());
    Ok(())
}

async fn run_status(config: StaydbConfig, json: bool) -> Result<()> {
    let mut manager = ConnectionManager::new(config);
    let result = collect_status(&mut manager).await;
    manager.disconnect().await;
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Schema status: {}", report.schema);
        println!("{}", Table::new(&report.tables).with(Style::rounded()));
    }
    Ok(())
}

async fn collect_status(manager: &mut ConnectionManager) -> Result<StatusReport> {
    let schema = check_status(manager).await?;
    let mut tables = Vec::with_capacity(TABLE_NAMES.len());
    for name in TABLE_NAMES {
        tables.push(TableStatus {
            name: name.to_string(),
            present: manager.table_exists(name).await?,
        });
    }
    Ok(StatusReport { schema, tables })
}
