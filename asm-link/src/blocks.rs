//! Block maps: sets of basic blocks addressed by label.

use asm_block::{Block, Instruction};
use asm_label::{inject_left, inject_right, sum_size, Label, Renaming};
use thiserror::Error;

/// Errors that can occur when building or reindexing a [`BlockMap`].
#[derive(Debug, PartialEq, Eq, Error)]
pub enum BlockMapError {
    /// A block branches to a label outside of the exit space.
    #[error("block {entry} branches to {target}, outside of an exit space of size {exits}")]
    DanglingTarget {
        /// The entry label of the offending block.
        entry: usize,
        /// The offending branch target.
        target: usize,
        /// The size of the exit space.
        exits: usize,
    },

    /// A renaming doesn't fit the label space it was applied to.
    #[error("{what}: expected a label space of size {expected}, got {actual}")]
    SizeMismatch {
        /// Which side of the map was being renamed.
        what: &'static str,
        /// The size of the block map's label space.
        expected: usize,
        /// The size of the renaming's label space.
        actual: usize,
    },

    /// Label arithmetic failed.
    #[error("label space error: {0}")]
    Label(#[from] asm_label::Error),
}

/// A total map from the entry label space `0..entries` to blocks whose branch
/// targets lie in the exit label space `0..exits`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockMap<I: Instruction> {
    exits: usize,
    blocks: Vec<Block<I, Label>>,
}

impl<I: Instruction> BlockMap<I> {
    /// Create a new block map, with one entry label per block.
    ///
    /// Returns an error if any block branches outside of `0..exits`.
    pub fn new(exits: usize, blocks: Vec<Block<I, Label>>) -> Result<Self, BlockMapError> {
        for (entry, block) in blocks.iter().enumerate() {
            if let Some(target) = block.successors().find(|t| t.index() >= exits) {
                return Err(BlockMapError::DanglingTarget {
                    entry: entry,
                    target: target.index(),
                    exits: exits,
                });
            }
        }

        Ok(Self::from_parts(exits, blocks))
    }

    /// Create a new block map by evaluating `f` at every entry label.
    pub fn from_fn<F>(entries: usize, exits: usize, f: F) -> Result<Self, BlockMapError>
    where
        F: FnMut(Label) -> Block<I, Label>,
    {
        Self::new(exits, (0..entries).map(Label::new).map(f).collect())
    }

    /// Panic safety: precondition: every branch target in `blocks` is below `exits`.
    pub(crate) fn from_parts(exits: usize, blocks: Vec<Block<I, Label>>) -> Self {
        debug_assert!(blocks
            .iter()
            .flat_map(|b| b.successors())
            .all(|t| t.index() < exits));

        Self {
            exits: exits,
            blocks: blocks,
        }
    }

    /// Returns the size of the entry label space.
    pub fn entries(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the size of the exit label space.
    pub fn exits(&self) -> usize {
        self.exits
    }

    /// Get the block at the given entry label.
    pub fn get(&self, entry: Label) -> Option<&Block<I, Label>> {
        self.blocks.get(entry.index())
    }

    pub(crate) fn blocks(&self) -> &[Block<I, Label>] {
        &self.blocks
    }

    /// Iterate over `(entry, block)` pairs, in entry order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &Block<I, Label>)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (Label::new(i), b))
    }

    /// Reindex this block map on both sides.
    ///
    /// For `f: A' -> A` and `g: B -> B'`, turns a map from `A` to blocks over `B`
    /// into a map from `A'` to blocks over `B'`: the block at new entry `e` is the
    /// block at `f(e)`, with every branch target `t` renamed to `g(t)`. `f` needn't
    /// be surjective; entries it misses are simply dropped.
    pub fn relabel(&self, f: &Renaming, g: &Renaming) -> Result<Self, BlockMapError> {
        if f.codomain() != self.entries() {
            return Err(BlockMapError::SizeMismatch {
                what: "entry renaming",
                expected: self.entries(),
                actual: f.codomain(),
            });
        }

        if g.domain() != self.exits {
            return Err(BlockMapError::SizeMismatch {
                what: "exit renaming",
                expected: self.exits,
                actual: g.domain(),
            });
        }

        let blocks = f
            .iter()
            .map(|(_, src)| self.blocks[src.index()].relabeled(|t| g.apply(t)))
            .collect();

        Ok(Self::from_parts(g.codomain(), blocks))
    }

    /// Place two block maps side by side.
    ///
    /// For maps `A -> B` and `C -> D`, produces a map `A + C -> B + D`: entries in
    /// `A` route to `self`, entries in `C` to `other`, and every branch target is
    /// injected into the summand of the exit space its block came from.
    pub fn append(&self, other: &BlockMap<I>) -> Result<Self, BlockMapError> {
        let (b, d) = (self.exits, other.exits);
        let exits = sum_size(b, d)?;
        sum_size(self.entries(), other.entries())?;

        let left = self
            .blocks
            .iter()
            .map(|block| block.clone().try_map_labels(|t| inject_left(t, b, d)));
        let right = other
            .blocks
            .iter()
            .map(|block| block.clone().try_map_labels(|t| inject_right(t, b, d)));

        let blocks = left.chain(right).collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(exits, blocks))
    }
}
