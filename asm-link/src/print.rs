//! Human-readable rendering of units.

use std::fmt;

use asm_block::Instruction;
use asm_label::Label;

use crate::unit::AsmUnit;

/// A code label, named by which part of the unit's interface it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Named {
    /// A hidden label.
    Internal(usize),
    /// An external entry.
    Entry(usize),
    /// An external exit.
    Exit(usize),
}

impl Named {
    fn entry(label: Label, internal: usize) -> Self {
        match label.index() {
            i if i < internal => Named::Internal(i),
            i => Named::Entry(i - internal),
        }
    }

    fn target(label: Label, internal: usize) -> Self {
        match label.index() {
            i if i < internal => Named::Internal(i),
            i => Named::Exit(i - internal),
        }
    }
}

impl fmt::Display for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Named::Internal(i) => write!(f, "i{i}"),
            Named::Entry(i) => write!(f, "e{i}"),
            Named::Exit(i) => write!(f, "x{i}"),
        }
    }
}

impl<I> fmt::Display for AsmUnit<I>
where
    I: Instruction + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "unit (internal: {}, inputs: {}, outputs: {}) {{",
            self.internal, self.inputs, self.outputs
        )?;

        for (label, block) in self.code.iter() {
            let block = block.relabeled(|t| Named::target(t, self.internal));
            writeln!(f, "  {}: {block}", Named::entry(label, self.internal))?;
        }

        write!(f, "}}")
    }
}
