//! CLI administration tool for cleanlink.
//!
//! Runs link operations directly against the database, without going through
//! the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten "https://example.com/?utm_source=mail"
//!
//! # Show the canonical form of a URL without storing it
//! cargo run --bin admin -- canonicalize "<https://l.google.com/url?url=...>"
//!
//! # Look up a code
//! cargo run --bin admin -- resolve aB3xYz
//!
//! # Run the retention sweep once
//! cargo run --bin admin -- sweep --days 30
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL`, `SHORT_DOMAIN`, `CACHE_EXPIRY`, `CODE_LENGTH`.

use cleanlink::application::services::{LinkService, LinkStore};
use cleanlink::config::{self, Config};
use cleanlink::infrastructure::persistence::{SqliteLinkRepository, open_database, run_migrations};
use cleanlink::utils::url_canonicalizer::canonicalize;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing cleanlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Canonicalize and store a URL, printing the short URL
    Shorten {
        /// Raw URL as a user would submit it
        url: String,
    },

    /// Print the canonical form of a URL without storing it
    Canonicalize {
        /// Raw URL as a user would submit it
        url: String,
    },

    /// Print the URL stored under a short code
    Resolve {
        /// Short code
        code: String,
    },

    /// Delete links older than the retention window
    Sweep {
        /// Retention window in days (defaults to CACHE_EXPIRY)
        #[arg(short, long)]
        days: Option<u32>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

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

    /// Apply pending migrations
    Migrate,
}

type Service = LinkService<SqliteLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Canonicalize { url } => print_canonical(&url),
        command => run_with_database(command).await,
    }
}

/// Runs a command that needs the link database.
async fn run_with_database(command: Commands) -> Result<()> {
    let config = config::load_from_env()?;

    let pool = open_database(&config.database_url, 1).await?;

    match command {
        Commands::Shorten { url } => shorten(&service(&pool, &config), &url).await?,
        Commands::Resolve { code } => resolve(&service(&pool, &config), &code).await?,
        Commands::Sweep { days, yes } => {
            let days = days.unwrap_or(config.retention_days);
            sweep(&service(&pool, &config), days, yes).await?
        }
        Commands::Stats => handle_stats(&service(&pool, &config), &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Canonicalize { url } => print_canonical(&url)?,
    }

    Ok(())
}

fn service(pool: &SqlitePool, config: &Config) -> Service {
    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));
    let store = Arc::new(LinkStore::new(repository, config.code_length));
    LinkService::new(store, config.short_domain.clone())
}

fn print_canonical(url: &str) -> Result<()> {
    let canonical = canonicalize(url).context("URL cannot be canonicalized")?;
    println!("{}", canonical.bright_white());
    Ok(())
}

async fn shorten(service: &Service, url: &str) -> Result<()> {
    let link = service.shorten(url).await?;

    println!("{}", "✨ Short link created".green().bold());
    println!();
    println!("  Short URL:   {}", link.short_url.bright_green().bold());
    println!("  Code:        {}", link.code.bright_white());
    println!("  Destination: {}", link.canonical_url);
    println!();

    Ok(())
}

async fn resolve(service: &Service, code: &str) -> Result<()> {
    match service.store().resolve(code).await? {
        Some(url) => println!("{}", url.bright_white()),
        None => {
            println!("{}", format!("❌ No link found for '{code}'").red());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Runs the retention sweep once, after confirmation.
async fn sweep(service: &Service, days: u32, skip_confirm: bool) -> Result<()> {
    println!(
        "{}",
        format!("🧹 Deleting links older than {days} days").bright_blue()
    );

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Proceed?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let deleted = service.store().sweep_expired(days).await?;

    println!(
        "{}",
        format!("✅ Deleted {deleted} links").green().bold()
    );

    Ok(())
}

/// Shows stored link count and retention settings.
async fn handle_stats(service: &Service, config: &Config) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count = service.store().count().await?;

    println!(
        "  Links:       {}",
        links_count.to_string().bright_green().bold()
    );
    println!("  Retention:   {} days", config.retention_days);
    println!("  Code length: {}", service.store().code_length());
    println!();

    Ok(())
}

/// Handles database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
        DbAction::Migrate => {
            run_migrations(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
