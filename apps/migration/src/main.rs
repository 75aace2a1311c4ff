//! Migration CLI tool.

use clap::{Parser, Subcommand};
use folio_infra::database::{DatabaseAdapter, DatabaseConfig, create_adapter, seed};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "migration", version, about = "Manage the Folio database schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations
    Up {
        /// Apply at most this many
        #[arg(short = 'n', long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table, then reapply all migrations
    Fresh,
    /// List applied and pending migrations
    Status,
    /// Apply pending migrations and replace all content with sample data
    Seed,
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

async fn run(adapter: &DatabaseAdapter, command: Command) -> anyhow::Result<()> {
    let db = adapter.db()?;
    match command {
        Command::Up { steps } => {
            Migrator::up(db, steps).await?;
            tracing::info!("Migrations applied");
        }
        Command::Down { steps } => {
            Migrator::down(db, Some(steps)).await?;
            tracing::info!(steps, "Migrations rolled back");
        }
        Command::Fresh => {
            Migrator::fresh(db).await?;
            tracing::info!("Database recreated");
        }
        Command::Status => {
            for migration in Migrator::get_applied_migrations(db).await? {
                println!("applied  {}", migration.name());
            }
            for migration in Migrator::get_pending_migrations(db).await? {
                println!("pending  {}", migration.name());
            }
        }
        Command::Seed => {
            Migrator::up(db, None).await?;
            let summary = seed::seed(db).await?;
            println!(
                "Seeded {} users, {} categories, {} posts, {} comments",
                summary.users, summary.categories, summary.posts, summary.comments
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = DatabaseConfig::infer(
        env("DATABASE_TYPE").as_deref(),
        env("DATABASE_URL").as_deref(),
        env("SQLITE_PATH").as_deref(),
    );
    let mut adapter = create_adapter(&config)?;
    adapter.initialize().await?;
    tracing::info!(
        backend = %adapter.backend(),
        dialect = %adapter.dialect(),
        "Connected to database"
    );

    let result = run(&adapter, cli.command).await;
    adapter.close().await?;
    result
}
