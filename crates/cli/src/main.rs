//! Ventaro CLI - operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Create the session store schema
//! ventaro migrate
//!
//! # Check whether a user can open the e-book
//! ventaro access check --user-id u_123 --email buyer@example.com
//!
//! # List products and their legacy identifiers
//! ventaro catalog
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ventaro_core::ProductKey;

mod commands;

#[derive(Parser)]
#[command(name = "ventaro")]
#[command(author, version, about = "Ventaro storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session store schema
    Migrate,
    /// Inspect access decisions
    Access {
        #[command(subcommand)]
        action: AccessAction,
    },
    /// List catalog products and their identifiers
    Catalog {
        /// Resolve a raw purchase identifier instead of listing
        #[arg(long)]
        resolve: Option<String>,
    },
}

#[derive(Subcommand)]
enum AccessAction {
    /// Run the download gate for one user
    Check {
        /// Upstream user ID
        #[arg(short, long)]
        user_id: String,

        /// User's email address (exact case matters for the admin bypass)
        #[arg(short, long)]
        email: String,

        /// Product key or legacy identifier
        #[arg(short, long, default_value = ProductKey::AiToolsMasteryGuide2025.as_str())]
        product: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ventaro=info,ventaro_storefront=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Access { action } => match action {
            AccessAction::Check {
                user_id,
                email,
                product,
            } => {
                let decision = commands::access::check(&user_id, &email, &product).await?;
                if decision.has_access() {
                    tracing::info!("ACCESS GRANTED ({decision:?})");
                } else {
                    tracing::warn!("ACCESS DENIED ({decision:?})");
                }
            }
        },
        Commands::Catalog { resolve } => match resolve {
            Some(raw) => match commands::catalog::resolve(&raw) {
                Some(key) => tracing::info!("{raw} -> {key}"),
                None => tracing::warn!("{raw} does not resolve to any product"),
            },
            None => {
                for line in commands::catalog::lines() {
                    tracing::info!("{line}");
                }
            }
        },
    }

    Ok(())
}
