use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use tally_core::models::NewUser;
use tally_core::password;
use tally_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "tally", version, about = "Tally back-office administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        /// Email address (login identifier)
        #[arg(long)]
        email: String,

        /// Full display name
        #[arg(long)]
        fullname: String,

        /// Monthly salary, e.g. "1800.00"
        #[arg(long)]
        salary: Decimal,

        /// Grant the admin role
        #[arg(long, default_value_t = false)]
        admin: bool,

        /// Password (reads from TALLY_USER_PASSWORD env var if not provided)
        #[arg(long, env = "TALLY_USER_PASSWORD")]
        password: String,
    },

    /// List all user accounts
    ListUsers,

    /// Reset a user's password
    SetPassword {
        /// Email address of the account
        #[arg(long)]
        email: String,

        /// New password (reads from TALLY_USER_PASSWORD env var if not provided)
        #[arg(long, env = "TALLY_USER_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tally=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = connect_db().await?;

    match cli.command {
        Commands::CreateUser {
            email,
            fullname,
            salary,
            admin,
            password,
        } => {
            if password.chars().count() < 8 {
                anyhow::bail!("password must be at least 8 characters");
            }
            let new_user = NewUser {
                fullname,
                email,
                salary,
                admin,
                active: true,
                password_hash: password::hash(&password)?,
            };
            let user = db.user_repo().create(&new_user).await?;
            println!(
                "Created user {} ({})",
                user.email,
                if user.admin { "admin" } else { "staff" }
            );
        }

        Commands::ListUsers => {
            let users = db.user_repo().list().await?;
            if users.is_empty() {
                println!("No users.");
                return Ok(());
            }
            println!(
                "{:<32} {:<24} {:>12} {:>6} {:>7}  HIRED",
                "EMAIL", "FULLNAME", "SALARY", "ADMIN", "ACTIVE"
            );
            for user in users {
                println!(
                    "{:<32} {:<24} {:>12} {:>6} {:>7}  {}",
                    user.email,
                    user.fullname,
                    user.salary.to_string(),
                    user.admin,
                    user.active,
                    user.hiring_date.format("%Y-%m-%d")
                );
            }
        }

        Commands::SetPassword { email, password } => {
            if password.chars().count() < 8 {
                anyhow::bail!("password must be at least 8 characters");
            }
            let hash = password::hash(&password)?;
            if !db.user_repo().update_password(&email, &hash).await? {
                anyhow::bail!("no user with email {email}");
            }
            println!("Password updated for {email}");
        }
    }

    Ok(())
}

async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env().context("Database configuration")?;
    let db = Database::connect(&config).await?;
    db.migrate().await?;
    tracing::debug!("connected and migrated");
    Ok(db)
}
