mod config;
mod logging;
mod server;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram::Foodgram;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Foodgram Server - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram Server - recipe sharing backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use mock database (sqlite::memory:)
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply database migrations and exit
    Migrate,
    /// Import the ingredient catalog from a JSON file
    LoadIngredients {
        /// JSON array of `{"name", "measurement_unit"}` records
        #[arg(short, long, default_value = "data/ingredients.json")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.mock);

    logging::init_logging(&config.logging, cli.verbose);
    tracing::info!("Foodgram Server starting");

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
        Commands::Migrate => migrate(&config).await,
        Commands::LoadIngredients { file } => load_ingredients(&config, &file).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Connect and bring the schema up to date.
async fn open_database(config: &AppConfig) -> Result<DatabaseConnection> {
    if foodgram_db::is_memory_dsn(&config.database.dsn) {
        tracing::info!("Mock mode: using in-memory SQLite");
    }
    let db = foodgram_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    Foodgram::migrate(&db).await?;
    Ok(db)
}

async fn migrate(config: &AppConfig) -> Result<()> {
    open_database(config).await?;
    println!("Migrations applied");
    Ok(())
}

async fn load_ingredients(config: &AppConfig, file: &Path) -> Result<()> {
    let db = open_database(config).await?;
    let module = Foodgram::new(db, &config.foodgram, config.server.public_base()?);
    let report = module.load_ingredients(file).await?;
    println!(
        "Loaded ingredients from {}: {} created, {} skipped (already present)",
        file.display(),
        report.created,
        report.skipped
    );
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    tracing::info!("Initializing Foodgram module...");
    let db = open_database(config).await?;
    let module = Foodgram::new(db, &config.foodgram, config.server.public_base()?);
    let router = server::build_router(&module, config);
    server::serve(router, &config.server.bind_addr).await
}
