//! Sweet Bites CLI - Catalog and database management tools.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog JSON file
//! sb-cli catalog check ./catalog.json
//!
//! # Print the built-in catalog
//! sb-cli catalog show
//!
//! # Create the PostgreSQL session table
//! sb-cli migrate sessions
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Sweet Bites CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect product catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog JSON file and print it
    Check {
        /// Path to the catalog file
        path: PathBuf,
    },
    /// Print the built-in catalog as JSON
    Show,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the session storage table
    Sessions,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(&path)?,
            CatalogAction::Show => commands::catalog::show()?,
        },
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
    }
    Ok(())
}
