//! Basic blocks: straight-line instructions followed by a single branch.

use std::fmt;

use crate::{Branch, Instruction};

/// A basic block: zero or more instructions, terminated by exactly one branch.
///
/// Conceptually a block is either a bare terminating branch or an instruction
/// followed by a block; [`Block::terminal`] and [`Block::cons`] build blocks that
/// way, while [`Block::new`] takes the flattened form.
#[derive(Clone, Debug, PartialEq)]
pub struct Block<I: Instruction, L> {
    insts: Vec<I>,
    branch: Branch<I::Cond, L>,
}

impl<I: Instruction, L> Block<I, L> {
    /// Create a new block from its instructions and its terminator.
    pub fn new(insts: Vec<I>, branch: Branch<I::Cond, L>) -> Self {
        Self {
            insts: insts,
            branch: branch,
        }
    }

    /// Create a block that consists only of a branch.
    pub fn terminal(branch: Branch<I::Cond, L>) -> Self {
        Self::new(vec![], branch)
    }

    /// Prefix `block` with an instruction.
    pub fn cons(inst: I, mut block: Self) -> Self {
        block.insts.insert(0, inst);
        block
    }

    /// A block that unconditionally jumps to `target`.
    pub fn jump(target: L) -> Self {
        Self::terminal(Branch::Jump(target))
    }

    /// A block that halts immediately.
    pub fn halt() -> Self {
        Self::terminal(Branch::Halt)
    }

    /// Returns this block's instructions, in execution order.
    pub fn insts(&self) -> &[I] {
        &self.insts
    }

    /// Returns this block's terminating branch.
    pub fn branch(&self) -> &Branch<I::Cond, L> {
        &self.branch
    }

    /// Iterate over the labels this block can transfer control to.
    pub fn successors(&self) -> impl Iterator<Item = &L> {
        self.branch.labels()
    }

    /// Rename every label this block refers to.
    ///
    /// Instructions are left untouched and in order.
    pub fn map_labels<M, F>(self, f: F) -> Block<I, M>
    where
        F: FnMut(L) -> M,
    {
        Block {
            insts: self.insts,
            branch: self.branch.map_labels(f),
        }
    }

    /// Rename every label this block refers to, stopping at the first failure.
    pub fn try_map_labels<M, E, F>(self, f: F) -> Result<Block<I, M>, E>
    where
        F: FnMut(L) -> Result<M, E>,
    {
        Ok(Block {
            insts: self.insts,
            branch: self.branch.try_map_labels(f)?,
        })
    }
}

impl<I: Instruction, L: Clone> Block<I, L> {
    /// Like [`map_labels`](Block::map_labels), but on a borrowed block.
    pub fn relabeled<M, F>(&self, f: F) -> Block<I, M>
    where
        F: FnMut(L) -> M,
    {
        self.clone().map_labels(f)
    }
}

impl<I, L> fmt::Display for Block<I, L>
where
    I: Instruction + fmt::Display,
    L: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.insts {
            write!(f, "{inst}; ")?;
        }

        write!(f, "{}", self.branch)
    }
}
