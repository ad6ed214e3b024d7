//! Total functions between finite label spaces.

use crate::error::Error;
use crate::{sum_size, Label};

/// A total function from the label space `0..domain` to the label space
/// `0..codomain`, stored as a lookup table.
///
/// Every image is checked against the codomain when the renaming is built,
/// so applying a renaming to a label in its domain can't fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renaming {
    codomain: usize,
    table: Vec<Label>,
}

impl Renaming {
    /// Build a renaming by evaluating `f` on every label in `0..domain`.
    ///
    /// Returns an error if `f` produces a label outside of `0..codomain`.
    pub fn from_fn<F>(domain: usize, codomain: usize, mut f: F) -> Result<Self, Error>
    where
        F: FnMut(Label) -> Label,
    {
        let table = (0..domain)
            .map(|i| f(Label::new(i)).check(codomain))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            codomain: codomain,
            table: table,
        })
    }

    /// Build a renaming from an explicit table of label indices.
    pub fn from_table(codomain: usize, table: &[usize]) -> Result<Self, Error> {
        Self::from_fn(table.len(), codomain, |l| Label::new(table[l.index()]))
    }

    /// The identity renaming on a space of size `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            codomain: n,
            table: (0..n).map(Label::new).collect(),
        }
    }

    /// Exchange the summands of a sum: `a + b -> b + a`.
    ///
    /// The inverse of `swap(a, b)` is `swap(b, a)`.
    pub fn swap(a: usize, b: usize) -> Result<Self, Error> {
        let n = sum_size(a, b)?;

        Ok(Self {
            codomain: n,
            table: (0..n)
                .map(|i| Label::new(if i < a { b + i } else { i - a }))
                .collect(),
        })
    }

    /// Reassociate a three-way sum to the right: `(a + b) + c -> a + (b + c)`.
    ///
    /// Sums are laid out flat, so this is the identity on indices.
    pub fn assoc_right(a: usize, b: usize, c: usize) -> Result<Self, Error> {
        Ok(Self::identity(sum_size(sum_size(a, b)?, c)?))
    }

    /// Reassociate a three-way sum to the left: `a + (b + c) -> (a + b) + c`.
    ///
    /// The inverse of [`assoc_right`](Renaming::assoc_right).
    pub fn assoc_left(a: usize, b: usize, c: usize) -> Result<Self, Error> {
        Ok(Self::identity(sum_size(a, sum_size(b, c)?)?))
    }

    /// Exchange the middle summands of a four-way sum:
    /// `(a + b) + (c + d) -> (a + c) + (b + d)`.
    ///
    /// The inverse of `interchange(a, b, c, d)` is `interchange(a, c, b, d)`.
    pub fn interchange(a: usize, b: usize, c: usize, d: usize) -> Result<Self, Error> {
        log::debug!("interchange: ({a} + {b}) + ({c} + {d})");

        let id_a = Self::identity(a);

        Self::assoc_right(a, b, sum_size(c, d)?)?
            .then(&id_a.sum(&Self::assoc_left(b, c, d)?)?)?
            .then(&id_a.sum(&Self::swap(b, c)?.sum(&Self::identity(d))?)?)?
            .then(&id_a.sum(&Self::assoc_right(c, b, d)?)?)?
            .then(&Self::assoc_left(a, c, sum_size(b, d)?)?)
    }

    /// Returns the size of this renaming's domain.
    pub fn domain(&self) -> usize {
        self.table.len()
    }

    /// Returns the size of this renaming's codomain.
    pub fn codomain(&self) -> usize {
        self.codomain
    }

    /// Apply this renaming to a label.
    ///
    /// Panic safety: precondition: `label` is in this renaming's domain.
    /// Label spaces are sized statically by their owners, so an out-of-domain
    /// label is a bug in the caller and not a recoverable condition.
    pub fn apply(&self, label: Label) -> Label {
        match self.table.get(label.index()) {
            Some(image) => *image,
            None => panic!(
                "label {} applied to a renaming with domain of size {}",
                label.index(),
                self.domain()
            ),
        }
    }

    /// Apply this renaming to a label, returning an error if the label is
    /// outside of the domain.
    pub fn try_apply(&self, label: Label) -> Result<Label, Error> {
        let label = label.check(self.domain())?;

        Ok(self.table[label.index()])
    }

    /// Iterate over this renaming's `(label, image)` pairs, in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, Label)> + '_ {
        self.table
            .iter()
            .enumerate()
            .map(|(i, image)| (Label::new(i), *image))
    }

    /// Compose this renaming with `next`, applying `self` first.
    ///
    /// Returns an error if this renaming's codomain isn't `next`'s domain.
    pub fn then(&self, next: &Renaming) -> Result<Self, Error> {
        if self.codomain != next.domain() {
            return Err(Error::SizeMismatch {
                expected: self.codomain,
                actual: next.domain(),
            });
        }

        Ok(Self {
            codomain: next.codomain,
            table: self.table.iter().map(|l| next.apply(*l)).collect(),
        })
    }

    /// Act on a disjoint sum, with `self` on the left summand and `other` on the right:
    /// for `self: A -> B` and `other: C -> D`, produces `A + C -> B + D`.
    pub fn sum(&self, other: &Renaming) -> Result<Self, Error> {
        let codomain = sum_size(self.codomain, other.codomain)?;
        sum_size(self.domain(), other.domain())?;

        let table = self
            .table
            .iter()
            .copied()
            .chain(
                other
                    .table
                    .iter()
                    .map(|l| Label::new(self.codomain + l.index())),
            )
            .collect();

        Ok(Self {
            codomain: codomain,
            table: table,
        })
    }

    /// Returns whether this renaming is a permutation of its label space.
    pub fn is_bijective(&self) -> bool {
        self.inverse().is_ok()
    }

    /// Returns the inverse of this renaming, if it's a permutation.
    pub fn inverse(&self) -> Result<Self, Error> {
        if self.domain() != self.codomain {
            return Err(Error::NotBijective);
        }

        let mut inverse: Vec<Option<Label>> = vec![None; self.codomain];
        for (label, image) in self.iter() {
            let slot = &mut inverse[image.index()];
            if slot.is_some() {
                return Err(Error::NotBijective);
            }
            *slot = Some(label);
        }

        // Same size and injective, so every slot has been filled.
        let table = inverse
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(Error::NotBijective)?;

        Ok(Self {
            codomain: self.codomain,
            table: table,
        })
    }
}
