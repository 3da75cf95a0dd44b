//! SQLite connection and schema management.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::auth::PasswordHasher;
use crate::config::DatabaseConfig;
use crate::domain::repositories::{CategoryRepository, ItemRepository, UserRepository};
use crate::domain::user::Username;
use crate::domain::{CategoryName, NewItem};
use crate::infrastructure::repositories::{
    SqliteCategoryRepository, SqliteItemRepository, SqliteUserRepository,
};

const CREATE_TABLES: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL REFERENCES categories (id),
        name TEXT NOT NULL,
        description TEXT,
        price TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_items_category_id ON items (category_id)",
];

// Children first so foreign keys never dangle mid-drop.
const DROP_TABLES: [&str; 3] = [
    "DROP TABLE IF EXISTS items",
    "DROP TABLE IF EXISTS categories",
    "DROP TABLE IF EXISTS users",
];

const SEED_CATEGORIES: [&str; 3] = ["Electronics", "Fashion", "Home"];

// (category index, name, description, price in cents)
const SEED_ITEMS: [(usize, &str, &str, i64); 6] = [
    (0, "Laptop", "A high-performance laptop", 99999),
    (0, "Smartphone", "A smartphone with advanced features", 59999),
    (1, "T-Shirt", "A high-quality T-shirt", 1999),
    (1, "Jeans", "A pair of stylish jeans", 4999),
    (2, "Sofa", "A comfortable sofa", 99999),
    (2, "Table", "A stylish table", 29999),
];

const SEED_USERS: [(&str, &str); 2] = [("user1", "password1"), ("user2", "password2")];

/// Opens a connection pool, creating the database file when missing.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Opens a private in-memory database.
///
/// Every SQLite connection to `:memory:` is its own database, so the pool
/// holds exactly one connection and never recycles it.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Creates all tables. Safe to run repeatedly.
pub async fn migrate_up(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Schema created");
    Ok(())
}

/// Drops all tables and their data.
pub async fn migrate_down(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in DROP_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Schema dropped");
    Ok(())
}

/// Inserts the demo categories, items and users.
///
/// Skipped when any category already exists.
pub async fn seed(pool: &SqlitePool, passwords: &PasswordHasher) -> anyhow::Result<()> {
    let categories = SqliteCategoryRepository::new(pool.clone());
    if !categories.list().await?.is_empty() {
        tracing::info!("Database already has categories, skipping seed data");
        return Ok(());
    }

    let mut category_ids = Vec::with_capacity(SEED_CATEGORIES.len());
    for name in SEED_CATEGORIES {
        let name = CategoryName::new(name).map_err(anyhow::Error::msg)?;
        category_ids.push(categories.create(&name).await?);
    }

    let items = SqliteItemRepository::new(pool.clone());
    for (category, name, description, cents) in SEED_ITEMS {
        let category_id = category_ids
            .get(category)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("seed item {} has no category", name))?;
        let item = NewItem::new(
            category_id,
            name,
            Some(description.to_string()),
            Decimal::new(cents, 2),
        )
        .map_err(anyhow::Error::msg)?;
        items.create(&item).await?;
    }

    let users = SqliteUserRepository::new(pool.clone());
    for (username, password) in SEED_USERS {
        let username = Username::new(username).map_err(anyhow::Error::msg)?;
        let password_hash = passwords.hash(password)?;
        users.create(&username, &password_hash).await?;
    }

    tracing::info!(
        categories = SEED_CATEGORIES.len(),
        items = SEED_ITEMS.len(),
        users = SEED_USERS.len(),
        "Seed data inserted"
    );
    Ok(())
}
