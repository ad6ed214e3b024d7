//! A reference interpreter for asm units.
//!
//! Instruction semantics are supplied by a [`Machine`]; this module only
//! sequences blocks. Running a unit starts at one of its external entries,
//! re-enters hidden labels as often as its blocks branch to them, and stops at
//! the first external exit or halt.

use asm_block::{Block, Branch, Instruction};
use asm_label::Label;
use thiserror::Error;

use crate::unit::{AsmUnit, UnitError};

/// The effects of an instruction set.
pub trait Machine<I: Instruction> {
    /// Errors produced while executing instructions or testing conditions.
    type Error: std::error::Error + 'static;

    /// Perform the effect of a single instruction.
    fn exec(&mut self, inst: &I) -> Result<(), Self::Error>;

    /// Evaluate a branch condition.
    fn test(&mut self, cond: &I::Cond) -> Result<bool, Self::Error>;
}

/// Errors that can occur while running a unit.
#[derive(Debug, Error)]
pub enum DenoteError<E: std::error::Error + 'static> {
    /// The machine failed.
    #[error("machine error: {0}")]
    Machine(#[source] E),

    /// The requested entry isn't part of the unit's interface.
    #[error("bad entry label: {0}")]
    BadEntry(#[from] UnitError),

    /// The step budget ran out before control left the unit.
    #[error("out of fuel after {0} blocks")]
    OutOfFuel(usize),
}

/// Interpreter settings.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// The maximum number of blocks to run before giving up.
    pub fuel: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { fuel: 1 << 20 }
    }
}

impl RunConfig {
    /// Returns a configuration with the given step budget.
    pub fn with_fuel(fuel: usize) -> Self {
        Self { fuel: fuel }
    }
}

/// How control left a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Control reached the given external exit.
    Label(Label),
    /// A block halted.
    Halt,
}

/// The result of running a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// How control left the unit.
    pub exit: Exit,
    /// The code labels of every block run, in order.
    pub trace: Vec<Label>,
}

/// Run a single block, returning the label it branches to (or `None` if it halts).
pub fn denote_block<I, L, M>(block: &Block<I, L>, machine: &mut M) -> Result<Option<L>, M::Error>
where
    I: Instruction,
    L: Clone,
    M: Machine<I>,
{
    for inst in block.insts() {
        machine.exec(inst)?;
    }

    Ok(match block.branch().borrowed() {
        Branch::Jump(target) => Some(target.clone()),
        Branch::CondBranch {
            cond,
            then,
            otherwise,
        } => {
            if machine.test(cond)? {
                Some(then.clone())
            } else {
                Some(otherwise.clone())
            }
        }
        Branch::Halt => None,
    })
}

/// Run `unit` from its external entry `entry` until control leaves the unit.
pub fn run<I, M>(
    unit: &AsmUnit<I>,
    entry: Label,
    machine: &mut M,
    config: &RunConfig,
) -> Result<Outcome, DenoteError<M::Error>>
where
    I: Instruction,
    M: Machine<I>,
{
    let mut label = unit.entry_label(entry)?;
    let mut trace = vec![];

    loop {
        if trace.len() >= config.fuel {
            return Err(DenoteError::OutOfFuel(trace.len()));
        }

        log::trace!("run: entering {label}");
        trace.push(label);

        // Panic safety: `label` is either an entry label checked above or a
        // branch target below `internal`, and both are in the code's entry space.
        let block = &unit.code.blocks()[label.index()];

        let next = denote_block(block, machine).map_err(DenoteError::Machine)?;
        let exit = match next {
            None => Exit::Halt,
            Some(target) if target.index() < unit.internal => {
                label = target;
                continue;
            }
            Some(target) => Exit::Label(Label::new(target.index() - unit.internal)),
        };

        log::debug!("run: left unit via {exit:?} after {} blocks", trace.len());
        return Ok(Outcome {
            exit: exit,
            trace: trace,
        });
    }
}

#[cfg(test)]
mod tests {
    use asm_label::Renaming;

    use super::*;
    use crate::blocks::BlockMap;
    use crate::builder::UnitBuilder;
    use crate::testing::{jump, Op, Regs};

    fn outcome_of(unit: &AsmUnit<Op>, entry: usize, regs: &mut Regs) -> Outcome {
        let config = RunConfig::default();
        run(unit, Label::new(entry), regs, &config).unwrap()
    }

    fn exit_of(unit: &AsmUnit<Op>, entry: usize, regs: &mut Regs) -> Exit {
        outcome_of(unit, entry, regs).exit
    }

    fn labels(ixs: &[usize]) -> Vec<Label> {
        ixs.iter().copied().map(Label::new).collect()
    }

    fn cond(reg: usize, then: usize, otherwise: usize) -> Branch<usize, Label> {
        Branch::CondBranch {
            cond: reg,
            then: Label::new(then),
            otherwise: Label::new(otherwise),
        }
    }

    // One entry, two exits: emit and decrement r0, then leave through exit 0
    // if it's still non-zero and through exit 1 otherwise. Linking exit 0 back
    // to the entry turns this into a loop.
    fn countdown() -> AsmUnit<Op> {
        let body = Block::new(vec![Op::Emit(0), Op::Add(0, -1)], cond(0, 0, 1));
        AsmUnit::from_single_block(body, 2).unwrap()
    }

    #[test]
    fn test_denote_block() {
        let mut regs = Regs::default();
        let block = Block::new(vec![Op::Set(1, 5), Op::Emit(1)], cond(1, 3, 4));
        let next = denote_block(&block, &mut regs).unwrap();
        assert_eq!(next, Some(Label::new(3)));
        assert_eq!(regs.out, vec![5]);

        let block = Block::new(vec![Op::Set(1, 0)], cond(1, 3, 4));
        let next = denote_block(&block, &mut regs).unwrap();
        assert_eq!(next, Some(Label::new(4)));

        let halt = Block::<Op, Label>::halt();
        assert_eq!(denote_block(&halt, &mut regs).unwrap(), None);

        let bad = Block::<Op, Label>::new(vec![Op::Emit(9)], Branch::Halt);
        assert!(denote_block(&bad, &mut regs).is_err());
    }

    #[test]
    fn test_append_scenario() {
        let x = AsmUnit::from_single_block(jump(1), 2).unwrap();
        let y = AsmUnit::from_single_block(Block::halt(), 1).unwrap();
        let xy = x.append(&y).unwrap();

        let mut regs = Regs::default();
        assert_eq!(exit_of(&xy, 0, &mut regs), Exit::Label(Label::new(1)));
        assert_eq!(exit_of(&xy, 1, &mut regs), Exit::Halt);
    }

    #[test]
    fn test_append_routes_to_operands() {
        let x = countdown();
        let f = Renaming::from_table(3, &[2, 0]).unwrap();
        let xy = x.append(&AsmUnit::lift_pure(&f)).unwrap();

        for (entry, expected) in [(0, 1), (1, 4), (2, 2)] {
            let mut regs = Regs::default();
            regs.regs[0] = 1;
            let exit = exit_of(&xy, entry, &mut regs);
            assert_eq!(exit, Exit::Label(Label::new(expected)));
        }
    }

    #[test]
    fn test_append_associative() {
        let x = countdown();
        let y = countdown().link(1).unwrap();
        let z = AsmUnit::swap(1, 2).unwrap();

        let left = x.append(&y).unwrap().append(&z).unwrap();
        let right = x.append(&y.append(&z).unwrap()).unwrap();
        assert_eq!(left.inputs(), right.inputs());

        for entry in 0..left.inputs() {
            let mut l = Regs::default();
            let mut r = Regs::default();
            l.regs[0] = 3;
            r.regs[0] = 3;
            let left_exit = exit_of(&left, entry, &mut l);
            assert_eq!(left_exit, exit_of(&right, entry, &mut r));
            assert_eq!(l.out, r.out);
        }
    }

    #[test]
    fn test_link_denotes_loop() {
        let unit = countdown();

        // Run the unlinked unit, re-entering it by hand whenever it leaves
        // through exit 0.
        let mut by_hand = Regs::default();
        by_hand.regs[0] = 3;
        let mut entry = Label::new(0);
        let by_hand_exit = loop {
            match exit_of(&unit, entry.index(), &mut by_hand) {
                Exit::Label(l) if l.index() < 1 => entry = l,
                Exit::Label(l) => break Exit::Label(Label::new(l.index() - 1)),
                Exit::Halt => break Exit::Halt,
            }
        };

        // Linking hides an entry as well as an exit, so duplicate the entry
        // first: one copy is folded into the loop, the other stays visible.
        let dup = Renaming::from_table(1, &[0, 0]).unwrap();
        let looped = unit
            .relabel(&dup, &Renaming::identity(2))
            .unwrap()
            .link(1)
            .unwrap();
        assert_eq!(looped.internal(), 1);
        assert_eq!(looped.inputs(), 1);
        assert_eq!(looped.outputs(), 1);

        let mut linked = Regs::default();
        linked.regs[0] = 3;
        let outcome = outcome_of(&looped, 0, &mut linked);

        assert_eq!(outcome.exit, by_hand_exit);
        assert_eq!(outcome.exit, Exit::Label(Label::new(0)));
        assert_eq!(linked.out, by_hand.out);
        assert_eq!(linked.out, vec![3, 2, 1]);
        assert_eq!(outcome.trace, labels(&[1, 0, 0]));
    }

    #[test]
    fn test_link_single_internal_step() {
        // Entry 0 leaves through exit 1; entry 1 jumps to exit 0. Linking
        // one label hides entry 0, and turns the jump to exit 0 into a jump to it.
        let code = BlockMap::new(2, vec![jump(1), jump(0)]).unwrap();
        let unit = AsmUnit::from_block_map(code).link(1).unwrap();
        assert_eq!(unit.internal(), 1);

        let outcome = outcome_of(&unit, 0, &mut Regs::default());
        assert_eq!(outcome.exit, Exit::Label(Label::new(0)));
        assert_eq!(outcome.trace, labels(&[1, 0]));

        let hidden = outcome.trace.iter().filter(|l| l.index() < 1).count();
        assert_eq!(hidden, 1);
    }

    #[test]
    fn test_lift_pure_roundtrip() {
        let f = Renaming::from_table(4, &[3, 3, 0, 1, 2]).unwrap();
        let unit = AsmUnit::<Op>::lift_pure(&f);

        for (a, fa) in f.iter() {
            let outcome = outcome_of(&unit, a.index(), &mut Regs::default());
            assert_eq!(outcome.exit, Exit::Label(fa));
            assert_eq!(outcome.trace.len(), 1);
        }
    }

    #[test]
    fn test_seq() {
        // (1 -> 2) then (2 -> 1): count r0 down, then emit a marker and halt
        // on the loop's exit 1 only.
        let mark = Block::new(vec![Op::Set(1, 42), Op::Emit(1)], Branch::Halt);
        let marker = BlockMap::new(1, vec![jump(0), mark]).unwrap();
        let marker = AsmUnit::from_block_map(marker);
        let both = countdown().seq(&marker).unwrap();

        let mut regs = Regs::default();
        regs.regs[0] = 2;
        assert_eq!(exit_of(&both, 0, &mut regs), Exit::Label(Label::new(0)));
        assert_eq!(regs.out, vec![2]);

        let mut regs = Regs::default();
        regs.regs[0] = 1;
        assert_eq!(exit_of(&both, 0, &mut regs), Exit::Halt);
        assert_eq!(regs.out, vec![1, 42]);
    }

    #[test]
    fn test_seq_through_hidden_labels() {
        // A counting loop behind a hidden label, sequenced between two
        // single-block units. Sequencing links the loop's entry and exit, so
        // the program's hidden labels include the loop's own.
        let mut builder = UnitBuilder::new();
        builder.entry("start").unwrap();
        builder.internal("loop").unwrap();
        builder.exit("done").unwrap();
        builder.block("start", Block::jump("loop".into())).unwrap();
        let body = Block::new(
            vec![Op::Emit(0), Op::Add(0, -1)],
            Branch::CondBranch {
                cond: 0,
                then: "loop".into(),
                otherwise: "done".into(),
            },
        );
        builder.block("loop", body).unwrap();
        let countdown = builder.build().unwrap();
        assert_eq!(countdown.internal(), 1);

        let to_loop = Branch::Jump(Label::new(0));
        let hello = Block::new(vec![Op::Set(1, 7), Op::Emit(1)], to_loop);
        let hello = AsmUnit::from_single_block(hello, 1).unwrap();
        let bye = Block::new(vec![Op::Set(1, 9), Op::Emit(1)], Branch::Halt);
        let bye = AsmUnit::from_single_block(bye, 0).unwrap();

        let program = hello.seq(&countdown).unwrap().seq(&bye).unwrap();
        assert_eq!(program.inputs(), 1);
        assert_eq!(program.outputs(), 0);
        assert!(program.internal() > countdown.internal());

        let mut regs = Regs::default();
        regs.regs[0] = 3;
        let outcome = outcome_of(&program, 0, &mut regs);
        assert_eq!(outcome.exit, Exit::Halt);
        assert_eq!(regs.out, vec![7, 3, 2, 1, 9]);

        // hello, start, the loop body three times, then bye.
        assert_eq!(outcome.trace.len(), 6);
    }

    #[test]
    fn test_out_of_fuel() {
        // The entry jumps into a hidden label that jumps to itself.
        let code = BlockMap::new(1, vec![jump(0), jump(0)]).unwrap();
        let spin = AsmUnit::new(1, 1, 0, code).unwrap();

        let config = RunConfig::with_fuel(10);
        let result = run(&spin, Label::new(0), &mut Regs::default(), &config);
        assert!(matches!(result, Err(DenoteError::OutOfFuel(10))));
    }

    #[test]
    fn test_bad_entry() {
        let config = RunConfig::default();
        let result = run(&countdown(), Label::new(1), &mut Regs::default(), &config);
        assert!(matches!(result, Err(DenoteError::BadEntry(_))));
    }
}
