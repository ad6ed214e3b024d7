//! Asm units: control-flow graph fragments with hidden and visible labels.

use std::collections::VecDeque;

use asm_block::{Block, Instruction};
use asm_label::{sum_size, Label, Renaming};
use hashbrown::HashSet;
use thiserror::Error;

use crate::blocks::{BlockMap, BlockMapError};

/// Errors that can occur when constructing or combining units.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum UnitError {
    /// A label space doesn't have the size the unit's interface requires.
    #[error("{what}: expected size {expected}, got {actual}")]
    SizeMismatch {
        /// The label space being checked.
        what: &'static str,
        /// The size the interface requires.
        expected: usize,
        /// The size that was supplied.
        actual: usize,
    },

    /// `link` was asked to hide more labels than the interface has.
    #[error("can't link {linked} labels of a unit with {inputs} inputs and {outputs} outputs")]
    LinkTooWide {
        /// The number of labels to hide.
        linked: usize,
        /// The unit's external entry count.
        inputs: usize,
        /// The unit's external exit count.
        outputs: usize,
    },

    /// The underlying block map couldn't be built or reindexed.
    #[error("block map error: {0}")]
    BlockMap(#[from] BlockMapError),

    /// Label arithmetic failed.
    #[error("label space error: {0}")]
    Label(#[from] asm_label::Error),
}

/// A composable control-flow graph fragment.
///
/// A unit's code is a block map whose entry space is `internal + inputs` and
/// whose exit space is `internal + outputs`. The first `internal` labels on
/// either side are hidden: they're reachable from the unit's own blocks, but
/// never exposed to composition partners. Only the `inputs`-sized entry
/// interface and the `outputs`-sized exit interface are visible.
///
/// Units are immutable: every combinator returns a new unit.
#[derive(Clone, Debug, PartialEq)]
pub struct AsmUnit<I: Instruction> {
    pub(crate) internal: usize,
    pub(crate) inputs: usize,
    pub(crate) outputs: usize,
    pub(crate) code: BlockMap<I>,
}

impl<I: Instruction> AsmUnit<I> {
    /// Create a new unit from its code and interface sizes.
    ///
    /// Returns an error unless `code` maps `internal + inputs` entries to blocks
    /// over `internal + outputs` exits.
    pub fn new(
        internal: usize,
        inputs: usize,
        outputs: usize,
        code: BlockMap<I>,
    ) -> Result<Self, UnitError> {
        let entries = sum_size(internal, inputs)?;
        if code.entries() != entries {
            return Err(UnitError::SizeMismatch {
                what: "entry space",
                expected: entries,
                actual: code.entries(),
            });
        }

        let exits = sum_size(internal, outputs)?;
        if code.exits() != exits {
            return Err(UnitError::SizeMismatch {
                what: "exit space",
                expected: exits,
                actual: code.exits(),
            });
        }

        Ok(Self {
            internal: internal,
            inputs: inputs,
            outputs: outputs,
            code: code,
        })
    }

    /// Wrap a block map as a unit with no hidden labels.
    pub fn from_block_map(code: BlockMap<I>) -> Self {
        Self {
            internal: 0,
            inputs: code.entries(),
            outputs: code.exits(),
            code: code,
        }
    }

    /// Wrap a single block as a unit with one entry and `outputs` exits.
    pub fn from_single_block(block: Block<I, Label>, outputs: usize) -> Result<Self, UnitError> {
        Ok(Self::from_block_map(BlockMap::new(outputs, vec![block])?))
    }

    /// Embed a label function as a unit: entry `a` jumps straight to exit `f(a)`.
    pub fn lift_pure(f: &Renaming) -> Self {
        let blocks = f.iter().map(|(_, image)| Block::jump(image)).collect();

        Self::from_block_map(BlockMap::from_parts(f.codomain(), blocks))
    }

    /// The unit that passes each of its `n` entries straight through to the
    /// exit with the same label.
    pub fn identity(n: usize) -> Self {
        Self::lift_pure(&Renaming::identity(n))
    }

    /// The unit that exchanges two groups of labels: `a + b -> b + a`.
    pub fn swap(a: usize, b: usize) -> Result<Self, UnitError> {
        Ok(Self::lift_pure(&Renaming::swap(a, b)?))
    }

    /// Returns the number of hidden labels.
    pub fn internal(&self) -> usize {
        self.internal
    }

    /// Returns the size of the external entry interface.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Returns the size of the external exit interface.
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Returns this unit's code.
    pub fn code(&self) -> &BlockMap<I> {
        &self.code
    }

    /// Translate an external entry label into a label of the unit's code.
    pub fn entry_label(&self, entry: Label) -> Result<Label, UnitError> {
        let entry = entry.check(self.inputs)?;

        Ok(Label::new(self.internal + entry.index()))
    }

    /// Returns the block behind an external entry label.
    pub fn entry_block(&self, entry: Label) -> Result<&Block<I, Label>, UnitError> {
        let label = self.entry_label(entry)?;

        self.code.get(label).ok_or_else(|| {
            UnitError::Label(asm_label::Error::OutOfRange {
                label: label.index(),
                size: self.code.entries(),
            })
        })
    }

    /// Returns the code labels reachable from the external entries, following
    /// branches through hidden labels.
    pub fn reachable(&self) -> HashSet<Label> {
        let mut seen: HashSet<Label> = HashSet::new();
        let mut queue: VecDeque<Label> = (self.internal..self.internal + self.inputs)
            .map(Label::new)
            .collect();

        while let Some(label) = queue.pop_front() {
            if !seen.insert(label) {
                continue;
            }

            if let Some(block) = self.code.get(label) {
                queue.extend(
                    block
                        .successors()
                        .filter(|t| t.index() < self.internal)
                        .copied(),
                );
            }
        }

        seen
    }

    /// Returns the hidden labels that no external entry can reach.
    ///
    /// Unreachable hidden blocks aren't an error: they're retained, but never run.
    pub fn unreachable_internal(&self) -> Vec<Label> {
        let reachable = self.reachable();

        (0..self.internal)
            .map(Label::new)
            .filter(|l| !reachable.contains(l))
            .collect()
    }
}
