use crate::alu::{self, Outcome};
use crate::console::Console;
use crate::flags::Flags;
use crate::opcode::{decode, AluOp, Opcode};
use crate::region::Region;
use crate::trace::Snapshot;

pub const MEMORY_SIZE: usize = 256;
pub const REGISTER_COUNT: usize = 8;

/// Program counter.
pub const PC: usize = 4;
/// Interrupt mask; reserved.
pub const IM: usize = 5;
/// Interrupt status; reserved.
pub const IS: usize = 6;
/// Stack pointer.
pub const SP: usize = 7;

/// Where the stack pointer starts. The stack grows down from here.
pub const STACK_ORIGIN: u8 = 0xF3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
  Active,
  Halted,
}

/// What a single cycle left the machine doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Running,
  Halted,
}

/// An LS-8 machine: 256 bytes of memory, eight registers (four of them
/// reserved, see [`PC`], [`IM`], [`IS`] and [`SP`]) and the flags register.
#[derive(Debug, Clone)]
pub struct Vm {
  memory: [u8; MEMORY_SIZE],
  registers: [u8; REGISTER_COUNT],
  flags: Flags,
  state: State,
}

impl Vm {
  /// Create a new machine with zeroed memory and the stack pointer at
  /// [`STACK_ORIGIN`]
  pub fn new() -> Self {
    let mut registers = [0; REGISTER_COUNT];
    registers[SP] = STACK_ORIGIN;
    Self {
      memory: [0; MEMORY_SIZE],
      registers,
      flags: Flags::default(),
      state: State::Active,
    }
  }

  /// Copy a program into memory starting at address `0`
  pub fn load<R>(&mut self, region: &R) -> Result<(), Error>
  where
    R: Region,
  {
    let image = region.instructions();
    let target = self
      .memory
      .get_mut(..image.len())
      .ok_or(Error::ProgramTooLarge(image.len()))?;
    target.copy_from_slice(image);
    log::debug!("loaded {} byte program", image.len());
    Ok(())
  }

  /// Execute a single fetch/decode/execute cycle.
  ///
  /// Any error halts the machine; stepping a halted machine fails with
  /// [`Error::MachineHalted`].
  pub fn step<C>(&mut self, console: &mut C) -> Result<Status, Error>
  where
    C: Console,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    if log::log_enabled!(log::Level::Trace) {
      log::trace!("{}", self.snapshot());
    }
    let result = Task::new(self, console).run();
    if !matches!(result, Ok(Status::Running)) {
      self.state = State::Halted;
    }
    result
  }

  /// Step until the machine halts, returning how many cycles ran (the `HLT`
  /// included).
  pub fn run<C>(&mut self, console: &mut C) -> Result<u64, Error>
  where
    C: Console,
  {
    let mut cycles = 0;
    loop {
      cycles += 1;
      if self.step(console)? == Status::Halted {
        log::debug!("halted at {:#04x} after {cycles} cycles", self.pc());
        return Ok(cycles);
      }
    }
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  pub fn read_memory(&self, address: u8) -> u8 {
    self.memory[usize::from(address)]
  }

  pub fn write_memory(&mut self, address: u8, value: u8) {
    self.memory[usize::from(address)] = value;
  }

  /// # Panics
  ///
  /// If `index` is not below [`REGISTER_COUNT`].
  pub fn read_register(&self, index: usize) -> u8 {
    self.registers[index]
  }

  /// # Panics
  ///
  /// If `index` is not below [`REGISTER_COUNT`].
  pub fn write_register(&mut self, index: usize, value: u8) {
    self.registers[index] = value;
  }

  pub fn pc(&self) -> u8 {
    self.registers[PC]
  }

  pub fn sp(&self) -> u8 {
    self.registers[SP]
  }

  pub fn flags(&self) -> Flags {
    self.flags
  }

  pub fn snapshot(&self) -> Snapshot {
    let pc = self.pc();
    Snapshot {
      pc,
      window: [
        self.read_memory(pc),
        self.read_memory(pc.wrapping_add(1)),
        self.read_memory(pc.wrapping_add(2)),
      ],
      registers: self.registers,
      flags: self.flags,
    }
  }

  fn push(&mut self, value: u8) {
    self.registers[SP] = self.registers[SP].wrapping_sub(1);
    self.write_memory(self.sp(), value);
  }

  fn pop(&mut self) -> u8 {
    let value = self.read_memory(self.sp());
    self.registers[SP] = self.registers[SP].wrapping_add(1);
    value
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}

/// An error that stopped the machine
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("unsupported ALU operation {opcode:#04x} at {pc:#04x}")]
  UnsupportedOperation { opcode: u8, pc: u8 },

  #[error("unrecognized opcode {opcode:#04x} at {pc:#04x}")]
  UnrecognizedOpcode { opcode: u8, pc: u8 },

  #[error("division by zero in {0:?}")]
  DivisionByZero(AluOp),

  #[error("register operand {0} is out of range")]
  InvalidRegister(u8),

  #[error("program of {0} bytes does not fit in memory")]
  ProgramTooLarge(usize),

  #[error("machine is halted")]
  MachineHalted,
}

#[derive(Debug, Clone, Copy)]
enum Instruction {
  Alu(AluOp),
  Control(Opcode),
}

/// Operand bytes following an instruction; never more than two.
#[derive(Debug, Clone, Copy, Default)]
struct Operands([u8; 2]);

impl Operands {
  fn a(&self) -> u8 {
    self.0[0]
  }

  fn b(&self) -> u8 {
    self.0[1]
  }
}

fn register(operand: u8) -> Result<usize, Error> {
  let index = usize::from(operand);
  if index < REGISTER_COUNT {
    Ok(index)
  } else {
    Err(Error::InvalidRegister(operand))
  }
}

struct Task<'vm, 'console, C> {
  vm: &'vm mut Vm,
  console: &'console mut C,
}

impl<'vm, 'console, C> Task<'vm, 'console, C>
where
  C: Console,
{
  fn new(vm: &'vm mut Vm, console: &'console mut C) -> Self {
    Self { vm, console }
  }

  fn fetch_operands(&self, pc: u8, count: u8) -> Operands {
    let mut operands = Operands::default();
    for (offset, slot) in (1..=count).zip(operands.0.iter_mut()) {
      *slot = self.vm.read_memory(pc.wrapping_add(offset));
    }
    operands
  }

  fn run(&mut self) -> Result<Status, Error> {
    let pc = self.vm.pc();
    let byte = self.vm.read_memory(pc);
    let decoded = decode(byte);
    let instruction = if decoded.is_alu {
      AluOp::try_from(byte)
        .map(Instruction::Alu)
        .map_err(|opcode| Error::UnsupportedOperation { opcode, pc })?
    } else {
      Opcode::try_from(byte)
        .map(Instruction::Control)
        .map_err(|opcode| Error::UnrecognizedOpcode { opcode, pc })?
    };
    let operands = self.fetch_operands(pc, decoded.operand_count);
    let equal = self.vm.flags.equal();

    match instruction {
      Instruction::Alu(op) => arithmetic(self, op, operands)?,
      Instruction::Control(op) => match op {
        Opcode::Halt => return Ok(Status::Halted),
        Opcode::LoadImmediate => load_immediate(self, operands)?,
        Opcode::Print => print(self, operands)?,
        Opcode::Push => push(self, operands)?,
        Opcode::Pop => pop(self, operands)?,
        Opcode::Call => call(self, operands)?,
        Opcode::Return => ret(self),
        Opcode::Jump => jump(self, operands)?,
        Opcode::JumpIfEqual => jump_if(self, operands, equal)?,
        Opcode::JumpIfNotEqual => jump_if(self, operands, !equal)?,
      },
    }

    if !decoded.sets_pc {
      self.vm.registers[PC] = pc.wrapping_add(decoded.operand_count + 1);
    }
    Ok(Status::Running)
  }
}

// r[a] ← r[a] op r[b]  or  fl ← cmp(r[a], r[b])
fn arithmetic<C>(task: &mut Task<'_, '_, C>, op: AluOp, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  let b = if op.is_unary() {
    0
  } else {
    task.vm.registers[register(operands.b())?]
  };
  match alu::evaluate(op, task.vm.registers[a], b)? {
    Outcome::Register(value) => task.vm.registers[a] = value,
    Outcome::Flags(flags) => task.vm.flags = flags,
  }
  Ok(())
}

// r[a] ← v
fn load_immediate<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  task.vm.registers[a] = operands.b();
  Ok(())
}

// out ← r[a]
fn print<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  task.console.print(task.vm.registers[a]);
  Ok(())
}

// sp ← sp − 1; m[sp] ← r[a]
fn push<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  let value = task.vm.registers[a];
  task.vm.push(value);
  Ok(())
}

// r[a] ← m[sp]; sp ← sp + 1
fn pop<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  task.vm.registers[a] = task.vm.pop();
  Ok(())
}

// push(pc + 2); pc ← r[a]
fn call<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  let ret = task.vm.pc().wrapping_add(2);
  task.vm.registers[PC] = ret;
  task.vm.push(ret);
  task.vm.registers[PC] = task.vm.registers[a];
  Ok(())
}

// pc ← pop()
fn ret<C>(task: &mut Task<'_, '_, C>)
where
  C: Console,
{
  task.vm.registers[PC] = task.vm.pop();
}

// pc ← r[a]
fn jump<C>(task: &mut Task<'_, '_, C>, operands: Operands) -> Result<(), Error>
where
  C: Console,
{
  let a = register(operands.a())?;
  task.vm.registers[PC] = task.vm.registers[a];
  Ok(())
}

// if cond : pc ← r[a] else pc ← pc + 2
fn jump_if<C>(task: &mut Task<'_, '_, C>, operands: Operands, taken: bool) -> Result<(), Error>
where
  C: Console,
{
  if taken {
    jump(task, operands)
  } else {
    task.vm.registers[PC] = task.vm.pc().wrapping_add(2);
    Ok(())
  }
}
