//! CLI administration tool for merchant-store-api.
//!
//! Provides commands for managing users and API tokens, listing stores,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user attached to a store
//! cargo run --bin admin -- user create --name alice --store DEFAULT --superadmin
//!
//! # Create a new API token for a user
//! cargo run --bin admin -- token create --user alice
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # List stores
//! cargo run --bin admin -- stores
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use merchant_store_api::application::services::auth_service::hash_token_with_secret;
use merchant_store_api::domain::entities::NewUser;
use merchant_store_api::domain::repositories::{
    ReferenceRepository, StoreCriteria, StoreRepository, TokenRepository, UserRepository,
};
use merchant_store_api::infrastructure::persistence::{
    PgReferenceRepository, PgStoreRepository, PgTokenRepository, PgUserRepository,
};
use merchant_store_api::utils::token::generate_token;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing merchant-store-api.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// List stores
    Stores {
        /// Only stores whose code or name contains this value
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of stores shown
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        /// User name
        #[arg(short, long)]
        name: Option<String>,

        /// Code of the user's store
        #[arg(short, long)]
        store: Option<String>,

        /// Grant access to every store
        #[arg(long)]
        superadmin: bool,
    },

    /// List all users
    List,
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Production API", "Back office")
        #[arg(short, long)]
        name: Option<String>,

        /// Name of the user the token authenticates as
        #[arg(short, long)]
        user: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stores { search, limit } => list_stores(&pool, search, limit).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            name,
            store,
            superadmin,
        } => {
            println!("{}", "👤 Create User".bright_blue().bold());
            println!();

            let user_name = match name {
                Some(n) => n,
                None => Input::new().with_prompt("User name").interact_text()?,
            };
            let store_code = match store {
                Some(s) => s,
                None => Input::new()
                    .with_prompt("Store code")
                    .with_initial_text("DEFAULT")
                    .interact_text()?,
            };

            let user = repo
                .create(NewUser {
                    user_name,
                    store_code,
                    superadmin,
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!(
                "{} {} (store {})",
                "✅ User created:".green().bold(),
                user.user_name.cyan(),
                user.store_code.bright_white()
            );
        }
        UserAction::List => {
            println!("{}", "📋 Users".bright_blue().bold());
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
                "  {:<4} {:<24} {:<20} {:<12} {:<8}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Store".bright_white().bold(),
                "Role".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(72).bright_black());

            for user in &users {
                let role = if user.superadmin {
                    "superadmin".magenta()
                } else if user.store_retailer {
                    "retailer".cyan()
                } else {
                    "store".normal()
                };
                let status = if user.active {
                    "ACTIVE".green()
                } else {
                    "INACTIVE".red()
                };

                println!(
                    "  {:<4} {:<24} {:<20} {:<12} {}",
                    user.id.to_string().bright_black(),
                    user.user_name.cyan(),
                    user.store_code,
                    role,
                    status
                );
            }

            println!();
        }
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            user,
            token,
            yes,
        } => {
            let users = PgUserRepository::new(Arc::new(pool.clone()));
            create_token(repo, &users, name, user, token, yes).await?;
        }
        TokenAction::List => {
            list_tokens(repo).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(repo, name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for token name and owning user (or use provided)
/// 2. Generate random token or use provided value
/// 3. Display token details with warning
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash token with HMAC-SHA256 (`TOKEN_SIGNING_SECRET`)
/// 6. Store in database
///
/// # Security
///
/// - Only the HMAC of the token is stored in the database
/// - Raw token is displayed once and cannot be retrieved later
async fn create_token(
    repo: Arc<PgTokenRepository>,
    users: &PgUserRepository,
    name: Option<String>,
    user: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let user_name = match user {
        Some(u) => u,
        None => Input::new().with_prompt("User name").interact_text()?,
    };

    let owner = users
        .find_by_name(&user_name)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token().context("Failed to generate token")?;
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  User:  {}", owner.user_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token_with_secret(&signing_secret, &token_value);

    repo.create_token(&token_name, &token_hash, owner.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/v1/private/stores",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 API Tokens
///
///   ID  Name                      User             Created            Status
///   ──────────────────────────────────────────────────────────────────────────
///   1   Production API            alice            2025-01-15 10:30   ACTIVE
/// ```
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<25} {:<16} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "User".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<3} {:<25} {:<16} {:<18} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.user_name,
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// # Lookup
///
/// - If input is numeric, lookup by ID
/// - Otherwise, lookup by name (exact match)
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Lists stores in the platform default language.
async fn list_stores(pool: &PgPool, search: Option<String>, limit: i64) -> Result<()> {
    println!("{}", "🏬 Stores".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let stores = PgStoreRepository::new(pool.clone());
    let references = PgReferenceRepository::new(pool);

    let default_language =
        std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string());
    let language = references
        .find_language(&default_language)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Default language not found")?;

    let mut criteria = StoreCriteria::new(0, limit.clamp(1, 1000));
    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        criteria = criteria.with_search(search);
    }

    let page = stores
        .find_by_criteria(criteria, language.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list stores: {}", e))?;

    println!(
        "  {:<5} {:<20} {:<30} {:<8} {:<10}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Name".bright_white().bold(),
        "Country".bright_white().bold(),
        "Parent".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for store in &page.items {
        let code = if store.retailer {
            store.code.magenta()
        } else {
            store.code.cyan()
        };

        println!(
            "  {:<5} {:<20} {:<30} {:<8} {}",
            store.id.to_string().bright_black(),
            code,
            store.name,
            store.address.country,
            store.parent_code.as_deref().unwrap_or("-").bright_black()
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        page.items.len().to_string().bright_white().bold(),
        page.total_count.to_string().bright_white().bold()
    );
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

            let stores_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM merchant_stores")
                .fetch_one(pool)
                .await?;

            let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            let tokens_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!(
                "  Stores:        {}",
                stores_count.to_string().bright_green().bold()
            );
            println!(
                "  Users:         {}",
                users_count.to_string().bright_green().bold()
            );
            println!(
                "  Active tokens: {}",
                tokens_count.to_string().bright_green().bold()
            );
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations").run(pool).await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
