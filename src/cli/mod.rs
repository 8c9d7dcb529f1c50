use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::identity;
use crate::database::manager::DatabaseManager;
use crate::database::security;

#[derive(Parser)]
#[command(name = "basevault")]
#[command(about = "BaseVault CLI - catalog maintenance and admin provisioning")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations")]
    Init,

    #[command(about = "Purge login-attempt audit rows past retention")]
    Cleanup,

    #[command(about = "Admin roster management")]
    Admin {
        #[command(subcommand)]
        cmd: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an account and register it as an active admin")]
    Add {
        #[arg(help = "Login email")]
        email: String,

        #[arg(help = "Initial password")]
        password: String,

        #[arg(long, help = "Allow-listed IPv4 address (repeatable; none = unrestricted)")]
        allow_ip: Vec<String>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => {
            let pool = DatabaseManager::pool().await?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to apply migrations")?;
            println!("Migrations applied");
            Ok(())
        }
        Commands::Cleanup => {
            let retention_hours = crate::config::config().security.attempt_retention_hours;
            let pool = DatabaseManager::pool().await?;
            security::cleanup_old_attempts(&pool, retention_hours).await?;
            println!("Login attempts older than {retention_hours}h purged");
            Ok(())
        }
        Commands::Admin { cmd } => match cmd {
            AdminCommands::Add {
                email,
                password,
                allow_ip,
            } => {
                for ip in &allow_ip {
                    ip.parse::<std::net::Ipv4Addr>()
                        .with_context(|| format!("invalid IPv4 address: {}", ip))?;
                }

                let pool = DatabaseManager::pool().await?;
                let account = identity::create_account(&pool, &email, &password)
                    .await
                    .context("failed to create account")?;
                let admin = security::create_admin(&pool, account.id, &allow_ip).await?;

                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "account": account,
                        "admin": admin,
                    }))?
                );
                Ok(())
            }
        },
    }
}
