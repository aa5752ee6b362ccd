//! # SneakPeak CLI (`sneakpeak`)
//!
//! ## Usage
//!
//! ```bash
//! sneakpeak --config ./config/sneakpeak.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sneakpeak init` | Create the SQLite database and run schema migrations |
//! | `sneakpeak search` | Filter the catalog |
//! | `sneakpeak trending` | Show the trending selection |
//! | `sneakpeak get <id>` | Print one catalog record |
//! | `sneakpeak designs list` | List saved designs |
//! | `sneakpeak alerts list` | List alerts |
//! | `sneakpeak serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! sneakpeak search --brand nike --max-price 200
//! sneakpeak search --q "air jordan" --release-from 2015-01-01 --json
//! sneakpeak trending --limit 5
//! sneakpeak serve
//! ```

use clap::{Parser, Subcommand};
use sneakpeak::documents::{self, OwnerFilter};
use sneakpeak::{config, migrate, search, server};
use sneakpeak_core::catalog::Criteria;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SneakPeak CLI: sneaker catalog search and user-data service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "sneakpeak",
    about = "SneakPeak: sneaker catalog search, trending, designs and alerts",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/sneakpeak.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Filter the catalog. All filters are optional and combine with AND.
    Search {
        /// Case-insensitive substring of "brand model colorway".
        #[arg(long)]
        q: Option<String>,

        /// Case-insensitive exact brand.
        #[arg(long)]
        brand: Option<String>,

        /// Case-insensitive substring of the model name.
        #[arg(long)]
        model: Option<String>,

        /// Minimum last sale price. Records with unknown price are excluded.
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum last sale price. Records with unknown price are excluded.
        #[arg(long)]
        max_price: Option<f64>,

        /// Earliest release date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        release_from: Option<String>,

        /// Latest release date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        release_to: Option<String>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show trending sneakers: tagged first, then by last sale price.
    Trending {
        /// Number of records. Defaults to `[trending].default_limit`.
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a catalog record by id. Exits non-zero if not found.
    Get {
        id: String,
    },

    /// Saved custom designs.
    Designs {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Price-drop and restock alerts.
    Alerts {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Start the HTTP API server on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum ListAction {
    /// List stored documents, optionally filtered.
    List {
        #[arg(long)]
        user_id: Option<String>,

        #[arg(long)]
        sneaker_id: Option<String>,
    },
}

impl ListAction {
    fn into_filter(self) -> OwnerFilter {
        match self {
            ListAction::List {
                user_id,
                sneaker_id,
            } => OwnerFilter {
                user_id,
                sneaker_id,
            },
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Search {
            q,
            brand,
            model,
            min_price,
            max_price,
            release_from,
            release_to,
            json,
        } => {
            let criteria = Criteria {
                q,
                brand,
                model,
                min_price,
                max_price,
                release_from,
                release_to,
            };
            search::run_search(&cfg, &criteria, json)?;
        }
        Commands::Trending { limit, json } => {
            search::run_trending(&cfg, limit, json)?;
        }
        Commands::Get { id } => {
            search::run_get(&cfg, &id)?;
        }
        Commands::Designs { action } => {
            documents::run_list_designs(&cfg, &action.into_filter()).await?;
        }
        Commands::Alerts { action } => {
            documents::run_list_alerts(&cfg, &action.into_filter()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
