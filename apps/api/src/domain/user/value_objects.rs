use serde::{Deserialize, Serialize};
use std::fmt;

/// Username value object
///
/// # Invariants
/// - Not empty once surrounding whitespace is trimmed
/// - Stored trimmed
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a new Username value object
    ///
    /// # Returns
    /// * `Ok(Username)` - If the username is usable
    /// * `Err(String)` - If it is blank
    ///
    /// # Example
    /// ```
    /// use inventory_api::domain::user::Username;
    ///
    /// let username = Username::new("user1").expect("valid username");
    /// assert_eq!(username.as_str(), "user1");
    /// ```
    pub fn new(username: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        Ok(Username(trimmed.to_string()))
    }

    /// Returns the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
