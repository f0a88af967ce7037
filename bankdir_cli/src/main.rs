mod commands;
mod output;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bankdir_lib::{Db, Directory, DirectoryConfig};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "bankdir")]
#[command(about = "Browse the financial institution directory")]
struct Cli {
    /// SQLite database path (overrides the config file and BANKDIR_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Search institutions in each state's latest publication
    Search(commands::search::SearchArgs),
    /// Show one institution with its branches, officers and figures
    Institution(commands::institution::InstitutionArgs),
    /// Show figures for one publication of an institution
    Figures(commands::figures::FiguresArgs),
    /// Show an institution's figures across every publication
    History(commands::history::HistoryArgs),
    /// List members of a membership organization
    Membership(commands::membership::MembershipArgs),
    /// List available states, years and seasons
    Publications(commands::publications::PublicationsArgs),
    /// Serve the JSON HTTP API
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bankdir=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let mut config = DirectoryConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    match &cli.command {
        Commands::InitDb => commands::init_db::run(&config.database_path)?,
        Commands::Search(args) => {
            commands::search::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::Institution(args) => {
            commands::institution::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::Figures(args) => {
            commands::figures::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::History(args) => {
            commands::history::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::Membership(args) => {
            commands::membership::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::Publications(args) => {
            commands::publications::run(args, &open_directory(&config.database_path)?, &format)?
        }
        Commands::Serve(args) => {
            let directory = open_directory(&config.database_path)?;
            commands::serve::run(args, directory, &config.bind_addr).await?
        }
    }

    Ok(())
}

fn open_directory(path: &Path) -> Result<Directory> {
    let db = Db::open_read_only(path)
        .with_context(|| format!("cannot open database {}", path.display()))?;
    Ok(Directory::new(db)?)
}
