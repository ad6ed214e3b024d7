//! Errors for `asm-link`.

use thiserror::Error as ThisError;

use crate::blocks::BlockMapError;
use crate::builder::BuildError;
use crate::unit::UnitError;

/// All possible errors that can occur while building or combining units.
///
/// Interpretation errors are generic over the machine being run, and are
/// reported separately as [`DenoteError`](crate::denote::DenoteError).
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum Error {
    /// Label arithmetic failed: a label or label space was out of range.
    #[error("label space error: {0}")]
    Label(#[from] asm_label::Error),
    /// A block map couldn't be constructed or reindexed.
    #[error("block map error: {0}")]
    BlockMap(#[from] BlockMapError),
    /// A unit's size invariants were violated.
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),
    /// A unit couldn't be assembled from named labels.
    #[error("unit builder error: {0}")]
    Build(#[from] BuildError),
}
