//! Configuration utility types.
//!
//! | Module    | Purpose                                   |
//! |-----------|-------------------------------------------|
//! | `error`   | Configuration errors and diagnostics      |
//! | `field`   | Field paths used in diagnostics           |
//! | `ordered` | Tables that keep declaration order        |

mod error;
mod field;
mod ordered;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use ordered::OrderedTable;
