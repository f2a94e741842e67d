use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spy_cat_agency::api::{self, AppState};
use spy_cat_agency::breeds::{BreedCache, BreedValidator, TheCatApiClient};
use spy_cat_agency::config::Settings;
use spy_cat_agency::db::Database;

#[derive(Parser)]
#[command(name = "sca")]
#[command(about = "Spy Cat Agency record-keeping API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind (overrides SCA_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API (overrides SCA_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides DATABASE_PATH)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Apply pending database migrations and exit
    Migrate {
        /// SQLite database file (overrides DATABASE_PATH)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "spy_cat_agency=debug,sca=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate().context("Failed to run database migrations")?;
    Ok(db)
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let db = open_database(settings.database_path.clone())?;

    let client = TheCatApiClient::new(
        settings.thecatapi_url.clone(),
        settings.thecatapi_key.clone(),
        settings.breed_lookup_timeout,
    )
    .context("Failed to build breed lookup client")?;
    let breeds = BreedValidator::new(Arc::new(client), BreedCache::new(settings.breed_cache_ttl));

    let app = api::create_router(AppState::new(db, breeds));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Spy Cat Agency API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = Settings::from_env()?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            database,
        }) => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            if database.is_some() {
                settings.database_path = database;
            }
            serve(settings).await?;
        }
        Some(Commands::Migrate { database }) => {
            open_database(database.or(settings.database_path))?;
            tracing::info!("Database is up to date");
        }
        None => serve(settings).await?,
    }

    Ok(())
}
