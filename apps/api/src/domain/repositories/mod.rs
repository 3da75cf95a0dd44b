// Repository contracts (ports)
// Infrastructure provides the adapters

pub mod category_repository;
pub mod errors;
pub mod item_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use errors::{RepositoryError, RepositoryResult};
pub use item_repository::ItemRepository;
pub use user_repository::UserRepository;
