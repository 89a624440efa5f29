//! Model category catalog.

mod category;

pub use category::{parse_category, Category, ParseCategoryError};
