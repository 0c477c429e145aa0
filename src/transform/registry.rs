//! Ordered transform chains keyed by file category.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::FileCategory;

use super::{TransformContext, TransformError, TransformStage};

/// Registration rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two stages of one category share an order, so the chain would be ambiguous.
    #[error("stages `{existing}` and `{added}` both use order {order} in the {category} chain")]
    DuplicateOrder {
        category: FileCategory,
        order: i32,
        existing: String,
        added: String,
    },
}

/// Holds one strictly ordered chain per category.
#[derive(Debug, Default)]
pub struct TransformRegistry {
    chains: FxHashMap<FileCategory, Vec<TransformStage>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `stage` into the chain for `category`, keeping ascending order.
    pub fn register(
        &mut self,
        category: FileCategory,
        stage: TransformStage,
    ) -> Result<(), RegistryError> {
        let chain = self.chains.entry(category).or_default();
        let pos = chain.partition_point(|s| s.order() < stage.order());

        if let Some(existing) = chain.get(pos).filter(|s| s.order() == stage.order()) {
            return Err(RegistryError::DuplicateOrder {
                category,
                order: stage.order(),
                existing: existing.name().to_string(),
                added: stage.name().to_string(),
            });
        }

        chain.insert(pos, stage);
        Ok(())
    }

    /// Stages for `category` in invocation order.
    pub fn chain_for(&self, category: FileCategory) -> &[TransformStage] {
        self.chains.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Pipe `bytes` through every stage of the chain that matches the file.
    ///
    /// The first failing stage aborts the chain.
    pub fn run(
        &self,
        category: FileCategory,
        bytes: Vec<u8>,
        ctx: &TransformContext<'_>,
    ) -> Result<Vec<u8>, TransformError> {
        let mut current = bytes;
        for stage in self.chain_for(category) {
            if !stage.matches(ctx.source) {
                continue;
            }
            crate::debug!("transform"; "{} {} ← {}", category, stage.name(), ctx.source.display());
            current = stage.apply(current, ctx)?;
        }
        Ok(current)
    }

    /// Names of the stages per category, for diagnostics.
    pub fn describe(&self) -> Vec<(FileCategory, Vec<String>)> {
        FileCategory::ALL
            .iter()
            .map(|&category| {
                let names = self
                    .chain_for(category)
                    .iter()
                    .map(|s| format!("{}@{}", s.name(), s.order()))
                    .collect();
                (category, names)
            })
            .collect()
    }
}
