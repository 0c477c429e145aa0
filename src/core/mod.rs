//! Core types - pure abstractions shared across the codebase.

mod category;
mod mode;

pub use category::FileCategory;
pub use mode::BuildMode;
