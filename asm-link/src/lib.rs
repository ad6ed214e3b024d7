//! `asm-link` composes control-flow graph fragments built from labeled basic
//! blocks.
//!
//! The central type is the [`AsmUnit`](crate::unit::AsmUnit): a block map with
//! a hidden label space and a visible interface of entries and exits. Units are
//! combined by placing them side by side ([`append`](crate::unit::AsmUnit::append)),
//! renaming their interfaces ([`relabel`](crate::unit::AsmUnit::relabel)), and
//! hiding parts of their interfaces so that exits feed back into entries
//! ([`link`](crate::unit::AsmUnit::link)).

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![allow(clippy::redundant_field_names)]
#![forbid(unsafe_code)]

pub mod blocks;
pub mod builder;
mod combine;
#[cfg(any(feature = "denote", doc))]
pub mod denote;
pub mod error;
mod print;
pub mod unit;

#[cfg(test)]
mod testing;

pub use asm_block::{Block, Branch, Instruction};
pub use asm_label::{Label, Renaming};

pub use crate::blocks::BlockMap;
pub use crate::builder::UnitBuilder;
pub use crate::error::Error;
pub use crate::unit::AsmUnit;
