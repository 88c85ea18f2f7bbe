use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use emulator::console::Stdout;
use emulator::region::Program;
use emulator::vm::{Status, Vm};
use env_logger::{Builder, Env};

#[derive(Parser, Debug)]
#[command(name = "ls8")]
#[command(about = "Run an LS-8 program", long_about = None)]
struct Args {
  /// Program text: one binary byte per line, `#` starts a comment
  program: PathBuf,

  /// Print a trace line to stderr before every cycle
  #[arg(long, action = ArgAction::SetTrue)]
  trace: bool,

  /// Give up after this many cycles
  #[arg(long)]
  max_cycles: Option<u64>,
}

fn main() -> Result<()> {
  Builder::from_env(Env::default().default_filter_or("warn")).init();
  let args = Args::parse();

  let source = fs::read_to_string(&args.program)
    .with_context(|| format!("reading {}", args.program.display()))?;
  let program: Program = source
    .parse()
    .with_context(|| format!("parsing {}", args.program.display()))?;

  let mut vm = Vm::new();
  vm.load(&program)?;

  let mut console = Stdout;
  let mut cycles = 0u64;
  loop {
    if args.max_cycles.is_some_and(|max| cycles >= max) {
      bail!("no halt after {cycles} cycles");
    }
    if args.trace {
      eprintln!("{}", vm.snapshot());
    }
    cycles += 1;
    if vm.step(&mut console)? == Status::Halted {
      break;
    }
  }
  log::info!("halted after {cycles} cycles");
  Ok(())
}
