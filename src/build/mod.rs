//! Build executor and its artifacts.
//!
//! | Module     | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `artifact` | `Entry`, `Artifact`, `BuildResult`               |
//! | `emit`     | Static sub-resources emitted during transforms   |
//! | `executor` | `Builder`: resolve, transform, hash, write       |
//! | `hash`     | Content and bundle hashes per mode               |
//! | `naming`   | `[name].[hash].[ext]` templates                  |
//! | `output`   | Clean-before-write and artifact writing          |
//! | `copy`     | Copy-through patterns                            |
//! | `manifest` | `manifest.json`                                  |

mod artifact;
mod copy;
mod emit;
mod executor;
pub mod hash;
mod manifest;
mod naming;
mod output;

pub use artifact::{Artifact, ArtifactKind, BuildResult, Entry};
pub use copy::CopyPattern;
pub use emit::{AssetEmitter, DEFAULT_STATIC_TEST, StaticRule};
pub use executor::{BuildError, BuildOptions, Builder};
pub use naming::NameTemplate;
pub use output::clean_dir;

#[cfg(test)]
pub(crate) use executor::list_relative;
