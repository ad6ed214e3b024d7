//! A tiny register machine, used as an instruction set in tests.

use std::fmt;

use asm_block::{Block, Instruction};
use asm_label::Label;
use thiserror::Error;

/// Register-machine instructions. Conditions test a register for non-zero.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Set(usize, i64),
    Add(usize, i64),
    Emit(usize),
}

impl Instruction for Op {
    type Cond = usize;
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Set(r, v) => write!(f, "set r{r}, {v}"),
            Op::Add(r, v) => write!(f, "add r{r}, {v}"),
            Op::Emit(r) => write!(f, "emit r{r}"),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum RegsError {
    #[error("no such register: r{0}")]
    BadRegister(usize),
}

#[derive(Debug, Default)]
pub(crate) struct Regs {
    pub(crate) regs: [i64; 4],
    pub(crate) out: Vec<i64>,
}

impl Regs {
    fn reg(&mut self, r: usize) -> Result<&mut i64, RegsError> {
        self.regs.get_mut(r).ok_or(RegsError::BadRegister(r))
    }
}

#[cfg(feature = "denote")]
impl crate::denote::Machine<Op> for Regs {
    type Error = RegsError;

    fn exec(&mut self, inst: &Op) -> Result<(), Self::Error> {
        match inst {
            Op::Set(r, v) => *self.reg(*r)? = *v,
            Op::Add(r, v) => *self.reg(*r)? += *v,
            Op::Emit(r) => {
                let v = *self.reg(*r)?;
                self.out.push(v);
            }
        }

        Ok(())
    }

    fn test(&mut self, cond: &usize) -> Result<bool, Self::Error> {
        Ok(*self.reg(*cond)? != 0)
    }
}

pub(crate) fn jump(target: usize) -> Block<Op, Label> {
    Block::jump(Label::new(target))
}
