//! CLI administration tool for shortkey.
//!
//! Inspects and seeds the PostgreSQL mapping store without going through
//! the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # List the newest mappings
//! cargo run --bin admin -- mappings list --limit 20
//!
//! # Resolve a short key
//! cargo run --bin admin -- mappings lookup aZbQk
//!
//! # Shorten a URL directly
//! cargo run --bin admin -- mappings add https://example.com/some/page
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection string

use shortkey::application::services::{KeyGenerator, MappingService};
use shortkey::config::{self, Config, StorageBackend};
use shortkey::domain::entities::Mapping;
use shortkey::domain::{ALPHABET, KEY_LENGTH};
use shortkey::infrastructure::persistence::{self, MIGRATOR, PgMappingRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortkey.
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
    /// Inspect and create mappings
    Mappings {
        #[command(subcommand)]
        action: MappingAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// List mappings, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },

    /// Show the long URL behind a short key
    Lookup {
        /// Five-letter short key
        short: String,
    },

    /// Shorten a long URL, reusing an existing mapping if there is one
    Add {
        /// Long URL, stored verbatim
        long: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!(
            "admin requires STORAGE_BACKEND=postgres, got '{}'",
            config.storage_backend
        );
    }

    let pool = persistence::connect_pool(&config).await?;

    match cli.command {
        Commands::Mappings { action } => handle_mapping_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches mapping commands.
async fn handle_mapping_action(action: MappingAction, config: &Config, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));
    let service = MappingService::new(repo, KeyGenerator::new(config.keygen_max_attempts));

    match action {
        MappingAction::List { limit, offset } => {
            println!("{}", "📋 Mappings".bright_blue().bold());
            println!();

            let mappings = service
                .list(i64::from(limit), i64::from(offset))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list mappings: {}", e))?;

            if mappings.is_empty() {
                println!("{}", "  No mappings found".yellow());
                return Ok(());
            }

            println!(
                "  {:<6} {:<7} {:<18} {}",
                "ID".bright_white().bold(),
                "Short".bright_white().bold(),
                "Created".bright_white().bold(),
                "Long URL".bright_white().bold()
            );
            println!("  {}", "─".repeat(75).bright_black());

            for mapping in &mappings {
                print_row(mapping);
            }

            println!();
            println!(
                "  Shown: {}",
                mappings.len().to_string().bright_white().bold()
            );
            println!();
        }
        MappingAction::Lookup { short } => {
            let mapping = service
                .resolve(&short)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("Short key not found")?;

            print_details(&mapping, &config.base_url);
        }
        MappingAction::Add { long } => {
            anyhow::ensure!(!long.is_empty(), "Long URL must not be empty");

            let mapping = service
                .submit(&long)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to shorten: {}", e))?;

            println!("{}", "✅ Mapping ready".green().bold());
            println!();
            print_details(&mapping, &config.base_url);
        }
    }

    Ok(())
}

fn print_row(mapping: &Mapping) {
    println!(
        "  {:<6} {:<7} {:<18} {}",
        mapping.id.to_string().bright_black(),
        mapping.short.cyan(),
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black(),
        mapping.long
    );
}

fn print_details(mapping: &Mapping, base_url: &str) {
    println!("  Short:   {}", mapping.short.bright_yellow().bold());
    println!(
        "  URL:     {}/{}",
        base_url.trim_end_matches('/'),
        mapping.short
    );
    println!("  Long:    {}", mapping.long.cyan());
    println!(
        "  Created: {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays store statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let mappings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mappings")
        .fetch_one(pool)
        .await?;

    let distinct_long: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT long_url) FROM mappings")
        .fetch_one(pool)
        .await?;

    println!(
        "  Mappings:       {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Distinct URLs:  {}",
        distinct_long.to_string().bright_green().bold()
    );
    println!(
        "  Key space used: {:.6}%",
        mappings_count as f64 / (ALPHABET.len() as f64).powi(KEY_LENGTH as i32) * 100.0
    );
    println!();

    Ok(())
}

/// Handles database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            MIGRATOR
                .run(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Schema up to date".green().bold());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("admin").chain(args.iter().copied()))
    }

    #[test]
    fn test_list_defaults() {
        let cli = parse(&["mappings", "list"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Mappings {
                action: MappingAction::List {
                    limit: 20,
                    offset: 0
                }
            }
        ));
    }

    #[test]
    fn test_list_rejects_negative_pagination() {
        assert!(parse(&["mappings", "list", "--limit", "-5"]).is_err());
        assert!(parse(&["mappings", "list", "--offset=-1"]).is_err());
    }

    #[test]
    fn test_lookup_takes_key() {
        let cli = parse(&["mappings", "lookup", "aZbQk"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Mappings { action: MappingAction::Lookup { ref short } } if short == "aZbQk"
        ));
    }
}
