//! CLI administration tool for snaplink.
//!
//! Inspects the code registry directly, bypassing the cache.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show server version
//! cargo run --bin admin -- db info
//!
//! # Count mappings
//! cargo run --bin admin -- stats
//!
//! # Look up a short code in the registry
//! cargo run --bin admin -- lookup aB3dE9
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components, as for the server

use snaplink::config::Config;
use snaplink::domain::entities::ShortCode;
use snaplink::domain::repositories::UrlMappingRepository;
use snaplink::infrastructure::persistence::PgUrlMappingRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting the snaplink registry.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show registry statistics
    Stats,

    /// Look up a short code in the registry
    Lookup {
        /// 6-character short code
        short_code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let registry = PgUrlMappingRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Stats => handle_stats(&registry).await?,
        Commands::Lookup { short_code } => handle_lookup(&registry, &short_code).await?,
        Commands::Db { action } => handle_db_action(action, &registry, &pool).await?,
    }

    Ok(())
}

/// Displays the number of stored mappings.
async fn handle_stats(registry: &PgUrlMappingRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = registry
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!("  Mappings: {}", count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Prints the registry row for a short code.
async fn handle_lookup(registry: &PgUrlMappingRepository, raw: &str) -> Result<()> {
    let short_code = ShortCode::parse(raw)
        .with_context(|| format!("'{}' is not a 6-character alphanumeric code", raw))?;

    let mapping = registry
        .find_by_code(&short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match mapping {
        Some(mapping) => {
            println!("{}", "🔗 Mapping".bright_blue().bold());
            println!();
            println!("  ID:       {}", mapping.id.to_string().bright_black());
            println!("  Code:     {}", mapping.short_code.as_str().cyan());
            println!("  URL:      {}", mapping.original_url.bright_white());
            println!(
                "  Created:  {}",
                mapping
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            println!();
        }
        None => {
            println!("{}", format!("  No mapping for '{}'", short_code).yellow());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(
    action: DbAction,
    registry: &PgUrlMappingRepository,
    pool: &PgPool,
) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            registry
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
