//! Assembling units from named labels.

use asm_block::{Block, Instruction};
use asm_label::Label;
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::blocks::{BlockMap, BlockMapError};
use crate::unit::{AsmUnit, UnitError};

/// Errors that can occur when assembling a unit from named labels.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A name was declared twice.
    #[error("label {0:?} is declared more than once")]
    DuplicateLabel(String),

    /// A block refers to a name that isn't a hidden label or an exit.
    #[error("unknown label {0:?}")]
    UnknownLabel(String),

    /// A hidden label or entry was declared, but never given a block.
    #[error("no block for label {0:?}")]
    MissingBlock(String),

    /// A hidden label or entry was given more than one block.
    #[error("label {0:?} already has a block")]
    DuplicateBlock(String),

    /// The assembled code was rejected.
    #[error("invalid block map: {0}")]
    BlockMap(#[from] BlockMapError),

    /// The assembled unit was rejected.
    #[error("invalid unit: {0}")]
    Unit(#[from] UnitError),
}

/// A builder for [`AsmUnit`]s whose labels are referred to by name.
///
/// Hidden labels, entries, and exits are numbered in declaration order.
/// Blocks may branch to hidden labels and exits, but not to entries: control
/// only enters a unit from outside.
#[derive(Debug)]
pub struct UnitBuilder<I: Instruction> {
    internal: IndexMap<String, Option<Block<I, String>>>,
    entries: IndexMap<String, Option<Block<I, String>>>,
    exits: IndexSet<String>,
}

impl<I: Instruction> Default for UnitBuilder<I> {
    fn default() -> Self {
        Self {
            internal: IndexMap::new(),
            entries: IndexMap::new(),
            exits: IndexSet::new(),
        }
    }
}

impl<I: Instruction> UnitBuilder<I> {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.internal.contains_key(name)
            || self.entries.contains_key(name)
            || self.exits.contains(name)
    }

    fn fresh(&self, name: impl Into<String>) -> Result<String, BuildError> {
        let name = name.into();

        if self.is_declared(&name) {
            Err(BuildError::DuplicateLabel(name))
        } else {
            Ok(name)
        }
    }

    /// Declare a hidden label.
    pub fn internal(&mut self, name: impl Into<String>) -> Result<&mut Self, BuildError> {
        let name = self.fresh(name)?;
        self.internal.insert(name, None);
        Ok(self)
    }

    /// Declare an external entry.
    pub fn entry(&mut self, name: impl Into<String>) -> Result<&mut Self, BuildError> {
        let name = self.fresh(name)?;
        self.entries.insert(name, None);
        Ok(self)
    }

    /// Declare an external exit.
    pub fn exit(&mut self, name: impl Into<String>) -> Result<&mut Self, BuildError> {
        let name = self.fresh(name)?;
        self.exits.insert(name);
        Ok(self)
    }

    /// Attach a block to a previously declared hidden label or entry.
    pub fn block(&mut self, name: &str, block: Block<I, String>) -> Result<&mut Self, BuildError> {
        let slot = match self.internal.get_mut(name) {
            Some(slot) => slot,
            None => self
                .entries
                .get_mut(name)
                .ok_or_else(|| BuildError::UnknownLabel(name.into()))?,
        };

        if slot.is_some() {
            return Err(BuildError::DuplicateBlock(name.into()));
        }

        *slot = Some(block);
        Ok(self)
    }

    fn resolve(&self, name: String) -> Result<Label, BuildError> {
        self.internal
            .get_index_of(&name)
            .or_else(|| {
                self.exits
                    .get_index_of(&name)
                    .map(|i| self.internal.len() + i)
            })
            .map(Label::new)
            .ok_or(BuildError::UnknownLabel(name))
    }

    /// Assemble the unit.
    pub fn build(&self) -> Result<AsmUnit<I>, BuildError> {
        let blocks = self
            .internal
            .iter()
            .chain(self.entries.iter())
            .map(|(name, block)| {
                block
                    .clone()
                    .ok_or_else(|| BuildError::MissingBlock(name.clone()))?
                    .try_map_labels(|target| self.resolve(target))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "build: {} hidden, {} entries, {} exits",
            self.internal.len(),
            self.entries.len(),
            self.exits.len()
        );

        let code = BlockMap::new(self.internal.len() + self.exits.len(), blocks)?;

        Ok(AsmUnit::new(
            self.internal.len(),
            self.entries.len(),
            self.exits.len(),
            code,
        )?)
    }
}
