// Row shapes as stored in SQLite and their conversion into domain types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::repositories::RepositoryError;
use crate::domain::user::{User, Username};
use crate::domain::{Item, ItemSummary};

// Prices are stored as decimal text so they round-trip exactly.
pub(super) fn parse_price(id: i64, price: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(price).map_err(|e| RepositoryError::CorruptRow {
        column: "price",
        id,
        reason: e.to_string(),
    })
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ItemRow {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            price: parse_price(row.id, &row.price)?,
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ItemSummaryRow {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
}

impl TryFrom<ItemSummaryRow> for ItemSummary {
    type Error = RepositoryError;

    fn try_from(row: ItemSummaryRow) -> Result<Self, Self::Error> {
        Ok(ItemSummary {
            price: parse_price(row.id, &row.price)?,
            id: row.id,
            name: row.name,
            description: row.description,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(&row.username).map_err(|reason| RepositoryError::CorruptRow {
            column: "username",
            id: row.id,
            reason,
        })?;

        Ok(User {
            id: row.id,
            username,
            password_hash: row.password_hash,
        })
    }
}
