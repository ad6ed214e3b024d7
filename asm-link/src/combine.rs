//! Combinators on asm units: parallel composition, renaming, and linking.
//!
//! Each combinator is a reindexing of the operands' block maps. The label
//! permutations involved come from [`Renaming`], so the index bookkeeping is
//! done in one place.

use asm_block::Instruction;
use asm_label::{sum_size, Renaming};

use crate::unit::{AsmUnit, UnitError};

impl<I: Instruction> AsmUnit<I> {
    /// Place two units side by side.
    ///
    /// For `self: A -> B` and `right: C -> D`, produces a unit `A + C -> B + D`
    /// whose hidden labels are `self`'s followed by `right`'s. Neither operand can
    /// reach the other's labels.
    ///
    /// The combined entry space is `(iL + iR) + (A + C)` and the combined exit
    /// space is `(iL + iR) + (B + D)`. Reading an entry and writing a branch
    /// target use the two directions of the same interchange of summands.
    pub fn append(&self, right: &AsmUnit<I>) -> Result<Self, UnitError> {
        log::debug!(
            "append: ({}; {} -> {}) + ({}; {} -> {})",
            self.internal,
            self.inputs,
            self.outputs,
            right.internal,
            right.inputs,
            right.outputs
        );

        // New entry -> old entry: (iL + iR) + (A + C) -> (iL + A) + (iR + C).
        let f = Renaming::interchange(self.internal, right.internal, self.inputs, right.inputs)?;
        // Old exit -> new exit: (iL + B) + (iR + D) -> (iL + iR) + (B + D).
        let g = Renaming::interchange(self.internal, self.outputs, right.internal, right.outputs)?;

        let code = self.code.append(&right.code)?.relabel(&f, &g)?;

        Self::new(
            sum_size(self.internal, right.internal)?,
            sum_size(self.inputs, right.inputs)?,
            sum_size(self.outputs, right.outputs)?,
            code,
        )
    }

    /// Rename this unit's external interface.
    ///
    /// For `self: B -> C`, `f: A -> B`, and `g: C -> D`, produces a unit `A -> D`
    /// whose entry `a` behaves like `self`'s entry `f(a)`, and whose exits are
    /// renamed by `g`. Hidden labels are untouched.
    pub fn relabel(&self, f: &Renaming, g: &Renaming) -> Result<Self, UnitError> {
        if f.codomain() != self.inputs {
            return Err(UnitError::SizeMismatch {
                what: "input renaming",
                expected: self.inputs,
                actual: f.codomain(),
            });
        }

        if g.domain() != self.outputs {
            return Err(UnitError::SizeMismatch {
                what: "output renaming",
                expected: self.outputs,
                actual: g.domain(),
            });
        }

        log::debug!(
            "relabel: {} -> {} becomes {} -> {}",
            self.inputs,
            self.outputs,
            f.domain(),
            g.codomain()
        );

        let hidden = Renaming::identity(self.internal);
        let code = self.code.relabel(&hidden.sum(f)?, &hidden.sum(g)?)?;

        Self::new(self.internal, f.domain(), g.codomain(), code)
    }

    /// Hide the first `linked` entries and exits of this unit.
    ///
    /// For `self: L + A -> L + B` with `|L| = linked`, produces a unit `A -> B`
    /// with `linked` more hidden labels. A branch to exit `l` in `L` becomes a
    /// jump straight back into entry `l`, which is how loops are expressed.
    pub fn link(&self, linked: usize) -> Result<Self, UnitError> {
        if linked > self.inputs || linked > self.outputs {
            return Err(UnitError::LinkTooWide {
                linked: linked,
                inputs: self.inputs,
                outputs: self.outputs,
            });
        }

        let (a, b) = (self.inputs - linked, self.outputs - linked);

        log::debug!(
            "link: hiding {linked} of {} -> {} ({} already hidden)",
            self.inputs,
            self.outputs,
            self.internal
        );

        // New entry -> old entry: (i + L) + A -> i + (L + A).
        let f = Renaming::assoc_right(self.internal, linked, a)?;
        // Old exit -> new exit: i + (L + B) -> (i + L) + B.
        let g = Renaming::assoc_left(self.internal, linked, b)?;

        let code = self.code.relabel(&f, &g)?;

        Self::new(sum_size(self.internal, linked)?, a, b, code)
    }

    /// Run `self`, then `next`, with every exit of `self` feeding the entry of
    /// `next` with the same label.
    ///
    /// For `self: A -> B` and `next: B -> C`, produces a unit `A -> C`.
    pub fn seq(&self, next: &AsmUnit<I>) -> Result<Self, UnitError> {
        if self.outputs != next.inputs {
            return Err(UnitError::SizeMismatch {
                what: "sequenced interface",
                expected: self.outputs,
                actual: next.inputs,
            });
        }

        // A + B -> B + C
        let joined = self.append(next)?;
        // Present the entries as B + A, so that B can be linked away.
        let entries = Renaming::swap(next.inputs, self.inputs)?;
        let exits = Renaming::identity(joined.outputs);

        joined.relabel(&entries, &exits)?.link(next.inputs)
    }
}
