use std::convert::Infallible;
use std::fmt;

use anyhow::Result;
use asm_link::denote::{self, Exit, Machine, RunConfig};
use asm_link::{AsmUnit, Block, Branch, Instruction, Label, UnitBuilder};
use clap::{value_parser, Arg, Command};

/// Instructions for a machine with a single down-counter.
#[derive(Clone, Debug)]
enum Inst {
    Say(&'static str),
    Dec,
}

impl Instruction for Inst {
    // Conditions always test the counter.
    type Cond = ();
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Say(msg) => write!(f, "say {msg:?}"),
            Inst::Dec => write!(f, "dec"),
        }
    }
}

struct Counter(u64);

impl Machine<Inst> for Counter {
    type Error = Infallible;

    fn exec(&mut self, inst: &Inst) -> Result<(), Self::Error> {
        match inst {
            Inst::Say(msg) => println!("{msg} ({})", self.0),
            Inst::Dec => self.0 = self.0.saturating_sub(1),
        }

        Ok(())
    }

    fn test(&mut self, _: &()) -> Result<bool, Self::Error> {
        Ok(self.0 != 0)
    }
}

fn app() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("count")
                .help("the number of times to go around the loop")
                .index(1)
                .required(true)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("fuel")
                .help("the maximum number of blocks to run")
                .long("fuel")
                .value_parser(value_parser!(usize)),
        )
}

fn countdown() -> Result<AsmUnit<Inst>, asm_link::Error> {
    let mut builder = UnitBuilder::new();
    builder.entry("start")?;
    builder.internal("loop")?;
    builder.exit("done")?;
    builder
        .block("start", Block::jump("loop".into()))?
        .block(
            "loop",
            Block::new(
                vec![Inst::Say("tick"), Inst::Dec],
                Branch::CondBranch {
                    cond: (),
                    then: "loop".into(),
                    otherwise: "done".into(),
                },
            ),
        )?;

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    env_logger::init();
    let matches = app().get_matches();

    let count = *matches.get_one::<u64>("count").unwrap();
    let config = match matches.get_one::<usize>("fuel") {
        Some(fuel) => RunConfig::with_fuel(*fuel),
        None => RunConfig::default(),
    };

    let hello = AsmUnit::from_single_block(
        Block::new(vec![Inst::Say("hello")], Branch::Jump(Label::new(0))),
        1,
    )?;
    let bye = AsmUnit::from_single_block(Block::new(vec![Inst::Say("bye")], Branch::Halt), 0)?;

    let program = hello.seq(&countdown()?)?.seq(&bye)?;
    println!("{program}");

    let outcome = denote::run(&program, Label::new(0), &mut Counter(count), &config)?;
    match outcome.exit {
        Exit::Label(label) => println!("left through exit {label}"),
        Exit::Halt => println!("halted"),
    }
    println!("ran {} blocks", outcome.trace.len());

    Ok(())
}
