//! CLI administration tool for link-board.
//!
//! Provides commands for managing user roles, viewing statistics and the
//! notification failure log, and performing database checks without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Grant or revoke the admin role
//! cargo run --bin admin -- user promote ada@example.com
//! cargo run --bin admin -- user demote ada@example.com --yes
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Show the latest notification failures
//! cargo run --bin admin -- failures --limit 50
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use link_board::domain::entities::Role;
use link_board::domain::repositories::{NotificationRepository, UserRepository};
use link_board::infrastructure::persistence::{PgNotificationRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-board.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Show recent notification failures
    Failures {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Grant the admin role
    Promote {
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Revoke the admin role
    Demote {
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Failures { limit } => list_failures(&pool, limit).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::List => list_users(repo).await?,
        UserAction::Promote { email, yes } => change_role(repo, &email, Role::Admin, yes).await?,
        UserAction::Demote { email, yes } => {
            change_role(repo, &email, Role::Subscriber, yes).await?
        }
    }

    Ok(())
}

/// Lists all users, newest first.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID  Email                          Name                 Role        Joined
///   ─────────────────────────────────────────────────────────────────────────────────
///   2   ada@example.com                Ada                  admin       2026-03-01 10:30
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<20} {:<11} {}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold(),
        "Joined".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for user in &users {
        let role = match user.role {
            Role::Admin => user.role.as_str().bright_magenta(),
            Role::Subscriber => user.role.as_str().normal(),
        };

        println!(
            "  {:<4} {:<30} {:<20} {:<11} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name,
            role,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Sets a user's role after confirmation.
async fn change_role(
    repo: Arc<PgUserRepository>,
    email: &str,
    role: Role,
    skip_confirm: bool,
) -> Result<()> {
    let email = email.trim().to_lowercase();

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    if user.role == role {
        println!(
            "{}",
            format!("⚠️  {} already has the {} role", user.email, role).yellow()
        );
        return Ok(());
    }

    println!("  User: {} ({})", user.name.cyan(), user.email);
    println!("  Role: {} → {}", user.role.to_string().bright_black(), role.to_string().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Change role?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let changed = repo
        .set_role(&email, role)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to change role: {}", e))?;

    if !changed {
        anyhow::bail!("User disappeared before the role could be changed");
    }

    println!("{}", "✅ Role updated".green().bold());
    Ok(())
}

/// Displays system statistics.
///
/// Shows counts of users, categories, links, recorded clicks and
/// notification failures.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(pool)
        .await?;

    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM link_clicks")
        .fetch_one(pool)
        .await?;

    let failures: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notification_failures")
        .fetch_one(pool)
        .await?;

    println!("  Users:                 {}", users.to_string().bright_green().bold());
    println!("  Admins:                {}", admins.to_string().bright_green().bold());
    println!("  Categories:            {}", categories.to_string().bright_green().bold());
    println!("  Links:                 {}", links.to_string().bright_green().bold());
    println!("  Clicks:                {}", clicks.to_string().bright_green().bold());
    println!("  Notification failures: {}", failures.to_string().bright_red().bold());
    println!();

    Ok(())
}

async fn list_failures(pool: &PgPool, limit: i64) -> Result<()> {
    println!("{}", "📭 Notification failures".bright_blue().bold());
    println!();

    let repo = PgNotificationRepository::new(Arc::new(pool.clone()));
    let failures = repo
        .list_recent(limit.clamp(1, 1000))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list failures: {}", e))?;

    if failures.is_empty() {
        println!("{}", "  No failures recorded".green());
        return Ok(());
    }

    for failure in &failures {
        println!(
            "  {} link {:<6} {:<30} {}",
            failure
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            failure.link_id.to_string().cyan(),
            failure.recipient.as_deref().unwrap_or("-"),
            failure.reason.red()
        );
    }

    println!();
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
