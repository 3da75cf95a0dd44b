use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// An inventory item
///
/// # Invariants
/// - `category_id` referenced an existing category when the item was created
/// - `updated_at` is refreshed on every mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating an item
///
/// # Business Rules Enforced
/// - Name must not be empty
/// - Price must not be negative
///
/// # Example
/// ```
/// use inventory_api::domain::NewItem;
/// use rust_decimal::Decimal;
///
/// let item = NewItem::new(1, "Laptop", None, Decimal::new(99999, 2)).expect("valid item");
/// assert_eq!(item.name(), "Laptop");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    category_id: i64,
    changes: ItemChanges,
}

impl NewItem {
    pub fn new(
        category_id: i64,
        name: impl AsRef<str>,
        description: Option<String>,
        price: Decimal,
    ) -> Result<Self, String> {
        Ok(Self {
            category_id,
            changes: ItemChanges::new(name, description, price)?,
        })
    }

    pub fn category_id(&self) -> i64 {
        self.category_id
    }

    pub fn name(&self) -> &str {
        self.changes.name()
    }

    pub fn description(&self) -> Option<&str> {
        self.changes.description()
    }

    pub fn price(&self) -> Decimal {
        self.changes.price()
    }
}

/// Validated replacement values for an existing item
///
/// Updates replace name, description and price together; the category
/// of an item is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChanges {
    name: String,
    description: Option<String>,
    price: Decimal,
}

impl ItemChanges {
    pub fn new(
        name: impl AsRef<str>,
        description: Option<String>,
        price: Decimal,
    ) -> Result<Self, String> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err("Item name cannot be empty".to_string());
        }

        if price.is_sign_negative() && !price.is_zero() {
            return Err("Item price cannot be negative".to_string());
        }

        Ok(Self {
            name: name.to_string(),
            description,
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}
