//! Food reference provider
//!
//! The read-only composition table and the name matcher used to resolve
//! identified foods against it.

pub mod matcher;
pub mod table;

pub use matcher::{FirstSegmentMatcher, FoodMatcher};
pub use table::FoodTable;
