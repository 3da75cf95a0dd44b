use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A named bucket of items
///
/// Categories are created once and never renamed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Category name value object
///
/// # Invariants
/// - Not empty once surrounding whitespace is trimmed
/// - Stored trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    /// Creates a new CategoryName
    ///
    /// # Example
    /// ```
    /// use inventory_api::domain::CategoryName;
    ///
    /// let name = CategoryName::new("  Electronics ").expect("valid name");
    /// assert_eq!(name.as_str(), "Electronics");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err("Category name cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item fields shown when items are nested under their category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A category together with every item filed under it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithItems {
    pub id: i64,
    pub name: String,
    pub items: Vec<ItemSummary>,
}
