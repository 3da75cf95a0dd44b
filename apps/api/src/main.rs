use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use inventory_api::api::{router, AppState};
use inventory_api::auth::DEFAULT_TOKEN_TTL_SECS;
use inventory_api::config::{
    AuthConfig, DatabaseConfig, ServerConfig, DEFAULT_DATABASE_URL, DEFAULT_PASSWORD_SECRET,
};
use inventory_api::infrastructure::database;

#[derive(Parser, Debug)]
#[command(name = "inventory-api")]
#[command(about = "Inventory management HTTP service", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database_url: String,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5, global = true)]
    max_connections: u32,

    /// Server-wide secret mixed into password digests
    #[arg(
        long,
        env = "PASSWORD_SECRET",
        default_value = DEFAULT_PASSWORD_SECRET,
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    password_secret: String,

    /// bcrypt cost factor for password hashes
    #[arg(long, env = "PASSWORD_HASH_COST", default_value_t = bcrypt::DEFAULT_COST, global = true)]
    password_hash_cost: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema if needed and serve HTTP
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "SERVER_PORT", default_value_t = 8000)]
        port: u16,

        /// Token signing secret (random per process when unset)
        #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
        token_secret: Option<String>,

        /// Token lifetime in seconds
        #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
        token_ttl_secs: i64,
    },
    /// Create or drop the schema
    Migrate {
        #[command(subcommand)]
        direction: Direction,
    },
}

#[derive(Subcommand, Debug)]
enum Direction {
    /// Create all tables
    Up {
        /// Also insert the demo categories, items and users
        #[arg(long)]
        seed: bool,
    },
    /// Drop all tables
    Down,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("inventory_api=info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env fallbacks
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let database_config = DatabaseConfig {
        url: cli.database_url,
        max_connections: cli.max_connections,
    };
    let mut auth_config = AuthConfig {
        password_secret: cli.password_secret,
        password_hash_cost: cli.password_hash_cost,
        ..AuthConfig::default()
    };

    tracing::info!(url = %database_config.url, "Connecting to database...");
    let pool = database::connect(&database_config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected successfully");

    match cli.command {
        Command::Serve {
            host,
            port,
            token_secret,
            token_ttl_secs,
        } => {
            auth_config.token_secret = token_secret;
            auth_config.token_ttl_secs = token_ttl_secs;
            serve(pool, ServerConfig { host, port }, &auth_config).await
        }
        Command::Migrate {
            direction: Direction::Up { seed },
        } => {
            database::migrate_up(&pool)
                .await
                .context("Failed to create schema")?;
            if seed {
                database::seed(&pool, &auth_config.password_hasher())
                    .await
                    .context("Failed to insert seed data")?;
            }
            Ok(())
        }
        Command::Migrate {
            direction: Direction::Down,
        } => database::migrate_down(&pool)
            .await
            .context("Failed to drop schema"),
    }
}

async fn serve(pool: SqlitePool, server: ServerConfig, auth: &AuthConfig) -> anyhow::Result<()> {
    let tokens = auth
        .token_service()
        .context("Invalid token configuration")?;

    database::migrate_up(&pool)
        .await
        .context("Failed to create schema")?;

    let state = AppState::new(pool, tokens, auth.password_hasher());
    let app = router(state);

    let addr = server.addr().context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
