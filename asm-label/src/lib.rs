//! `asm-label` provides finite label spaces and the index arithmetic needed
//! to split, merge, and permute them.
//!
//! A label space of size `N` is the set of labels `0..N`. The disjoint sum of
//! two label spaces `A + B` is laid out flat: the first `A` labels belong to the
//! left summand and the next `B` labels to the right one. Every more complex
//! reindexing (swapping summands, reassociating three-way sums) is expressed as
//! a [`Renaming`](crate::renaming::Renaming) over these flat spaces.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![allow(clippy::redundant_field_names)]
#![forbid(unsafe_code)]

pub mod error;
pub mod renaming;

use std::fmt;

pub use crate::error::Error;
pub use crate::renaming::Renaming;

/// A label: an index into some finite label space.
///
/// A `Label` doesn't know the size of the space it belongs to; the structure
/// holding it (a block map, a renaming) is responsible for that bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(usize);

impl Label {
    /// Create a new label with the given index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns this label's index.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Check this label against a label space of `size`.
    pub fn check(self, size: usize) -> Result<Self, Error> {
        if self.0 < size {
            Ok(self)
        } else {
            Err(Error::OutOfRange {
                label: self.0,
                size: size,
            })
        }
    }
}

impl From<usize> for Label {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<Label> for usize {
    fn from(value: Label) -> Self {
        value.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Which side of a disjoint sum a label belongs to, along with its index
/// local to that side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Summand {
    /// The label belongs to the left summand.
    Left(Label),
    /// The label belongs to the right summand.
    Right(Label),
}

impl Summand {
    /// Returns the summand-local label, discarding the side.
    pub fn local(self) -> Label {
        match self {
            Summand::Left(l) | Summand::Right(l) => l,
        }
    }
}

/// Returns the size of the label space `left + right`.
pub fn sum_size(left: usize, right: usize) -> Result<usize, Error> {
    left.checked_add(right).ok_or(Error::Overflow)
}

/// Split a label in the space `left + right` into its summand and local index.
///
/// This is the inverse of [`inject_left`] and [`inject_right`].
pub fn split(label: Label, left: usize, right: usize) -> Result<Summand, Error> {
    let label = label.check(sum_size(left, right)?)?;

    if label.0 < left {
        Ok(Summand::Left(label))
    } else {
        Ok(Summand::Right(Label(label.0 - left)))
    }
}

/// Embed a label of the left summand into the space `left + right`.
pub fn inject_left(label: Label, left: usize, right: usize) -> Result<Label, Error> {
    sum_size(left, right)?;
    label.check(left)
}

/// Embed a label of the right summand into the space `left + right`.
pub fn inject_right(label: Label, left: usize, right: usize) -> Result<Label, Error> {
    sum_size(left, right)?;
    let label = label.check(right)?;

    Ok(Label(left + label.0))
}
