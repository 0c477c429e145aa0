//! Configuration section definitions.
//!
//! Each module corresponds to a section in `forge.toml`:
//!
//! | Module      | TOML Section   | Purpose                                |
//! |-------------|----------------|----------------------------------------|
//! | `build`     | `[build]`      | Output paths, naming, workers, minify  |
//! | `resolve`   | `[resolve]`    | Extensions, search paths, aliases      |
//! | `rules`     | `[[rules]]`    | External-command transform stages      |
//! | `statics`   | `[static]`     | Referenced binary sub-resources        |
//! | `copy`      | `[[copy]]`     | Copy-through directories               |
//! | `templates` | `[templates]`  | Page templates                         |

mod build;
mod copy;
mod resolve;
mod rules;
mod statics;
mod templates;

pub use build::BuildSectionConfig;
pub use copy::CopyConfig;
pub use resolve::ResolveConfig;
pub use rules::RuleConfig;
pub use statics::StaticConfig;
pub use templates::TemplatesConfig;
