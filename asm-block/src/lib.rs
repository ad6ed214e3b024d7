//! `asm-block` models straight-line basic blocks and the branches that
//! terminate them.
//!
//! Blocks and branches are parametrized over their label type, and can be
//! relabeled functorially: relabeling touches every label slot of a branch and
//! nothing else.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![allow(clippy::redundant_field_names)]
#![forbid(unsafe_code)]

pub mod block;
pub mod branch;

use std::fmt::Debug;

pub use self::block::*;
pub use self::branch::*;

/// An opaque unit of computation.
///
/// Blocks never inspect their instructions; the only thing required of an
/// instruction set is the type of operand a conditional branch tests.
pub trait Instruction: Clone + Debug {
    /// The operand read by [`Branch::CondBranch`] to pick a successor.
    type Cond: Clone + Debug + PartialEq;
}
