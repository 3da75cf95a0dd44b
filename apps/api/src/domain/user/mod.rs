pub mod value_objects;

pub use value_objects::Username;

/// A registered account
///
/// The password is only ever held as a keyed digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: Username,
    pub password_hash: String,
}
