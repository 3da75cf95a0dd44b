// Domain layer module exports
// Entities, value objects and repository contracts for the inventory
// Domain is independent of infrastructure concerns

pub mod category;
pub mod item;
pub mod pagination;
pub mod repositories;
pub mod user;

pub use category::{Category, CategoryName, CategoryWithItems, ItemSummary};
pub use item::{Item, ItemChanges, NewItem};
pub use pagination::PageRequest;
