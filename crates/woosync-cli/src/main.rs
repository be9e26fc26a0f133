use clap::{Parser, Subcommand};

mod sync;

#[derive(Debug, Parser)]
#[command(name = "woosync")]
#[command(about = "Mirrors a WooCommerce catalog into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one full catalog sync (the default when no command is given)
    Sync,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = woosync_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);

    let pool_config = woosync_db::PoolConfig::from_app_config(&config);
    let pool = woosync_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Some(Commands::Migrate) => {
            let applied = woosync_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
        Some(Commands::Sync) | None => {
            sync::run_sync(&pool, &config).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
