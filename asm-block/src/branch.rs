//! Block terminators.

use std::fmt;

/// The control transfer at the end of a block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Branch<C, L> {
    /// Unconditionally transfer control to a label.
    Jump(L),
    /// Transfer control to `then` if `cond` holds, and to `otherwise` if not.
    CondBranch {
        /// The condition operand.
        cond: C,
        /// The target when the condition holds.
        then: L,
        /// The target when the condition doesn't hold.
        otherwise: L,
    },
    /// Stop; there is no successor.
    Halt,
}

impl<C, L> Branch<C, L> {
    /// Rename every label slot in this branch.
    pub fn map_labels<M, F>(self, mut f: F) -> Branch<C, M>
    where
        F: FnMut(L) -> M,
    {
        match self {
            Branch::Jump(target) => Branch::Jump(f(target)),
            Branch::CondBranch {
                cond,
                then,
                otherwise,
            } => Branch::CondBranch {
                cond: cond,
                then: f(then),
                otherwise: f(otherwise),
            },
            Branch::Halt => Branch::Halt,
        }
    }

    /// Rename every label slot in this branch, stopping at the first failure.
    pub fn try_map_labels<M, E, F>(self, mut f: F) -> Result<Branch<C, M>, E>
    where
        F: FnMut(L) -> Result<M, E>,
    {
        Ok(match self {
            Branch::Jump(target) => Branch::Jump(f(target)?),
            Branch::CondBranch {
                cond,
                then,
                otherwise,
            } => Branch::CondBranch {
                cond: cond,
                then: f(then)?,
                otherwise: f(otherwise)?,
            },
            Branch::Halt => Branch::Halt,
        })
    }

    /// Borrow this branch's condition and labels.
    pub fn borrowed(&self) -> Branch<&C, &L> {
        match self {
            Branch::Jump(target) => Branch::Jump(target),
            Branch::CondBranch {
                cond,
                then,
                otherwise,
            } => Branch::CondBranch {
                cond: cond,
                then: then,
                otherwise: otherwise,
            },
            Branch::Halt => Branch::Halt,
        }
    }

    /// Iterate over this branch's label slots, in order.
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        let (first, second) = match self {
            Branch::Jump(target) => (Some(target), None),
            Branch::CondBranch {
                then, otherwise, ..
            } => (Some(then), Some(otherwise)),
            Branch::Halt => (None, None),
        };

        first.into_iter().chain(second)
    }

    /// Returns whether this branch ends execution.
    pub fn is_halt(&self) -> bool {
        matches!(self, Branch::Halt)
    }
}

impl<C: fmt::Debug, L: fmt::Display> fmt::Display for Branch<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Jump(target) => write!(f, "jmp {target}"),
            Branch::CondBranch {
                cond,
                then,
                otherwise,
            } => write!(f, "br {cond:?}, {then}, {otherwise}"),
            Branch::Halt => write!(f, "halt"),
        }
    }
}
