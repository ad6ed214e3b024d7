//! Error management for `asm-label`.

use thiserror::Error as ThisError;

/// All errors potentially produced by `asm-label` APIs.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum Error {
    /// A label fell outside of the label space it was checked against.
    #[error("label {label} is out of range for a label space of size {size}")]
    OutOfRange {
        /// The offending label index.
        label: usize,
        /// The size of the label space.
        size: usize,
    },
    /// Two label spaces that were required to agree in size did not.
    #[error("label space size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// The size that was required.
        expected: usize,
        /// The size that was supplied.
        actual: usize,
    },
    /// The size of a sum of label spaces doesn't fit in a `usize`.
    #[error("label space size overflow")]
    Overflow,
    /// An inverse was requested for a renaming that isn't a permutation.
    #[error("renaming is not a bijection")]
    NotBijective,
}
