use crate::flags::Flags;
use crate::opcode::AluOp;
use crate::vm::Error;

/// What an ALU operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// Store into the first operand register.
  Register(u8),
  /// Replace the flags register; no register is written.
  Flags(Flags),
}

/// Evaluate `op` over the values of its operand registers. `b` is ignored by
/// unary operations.
pub fn evaluate(op: AluOp, a: u8, b: u8) -> Result<Outcome, Error> {
  let value = match op {
    AluOp::Add => a.wrapping_add(b),
    AluOp::Subtract => a.wrapping_sub(b),
    AluOp::Multiply => a.wrapping_mul(b),
    AluOp::Divide => a.checked_div(b).ok_or(Error::DivisionByZero(op))?,
    AluOp::Modulo => a.checked_rem(b).ok_or(Error::DivisionByZero(op))?,
    AluOp::Increment => a.wrapping_add(1),
    AluOp::Decrement => a.wrapping_sub(1),
    AluOp::Compare => return Ok(Outcome::Flags(Flags::compare(a, b))),
    AluOp::And => a & b,
    AluOp::Not => !a,
    AluOp::Or => a | b,
    AluOp::Xor => a ^ b,
    // shifting out every bit leaves zero rather than overflowing
    AluOp::ShiftLeft => a.checked_shl(b.into()).unwrap_or(0),
    AluOp::ShiftRight => a.checked_shr(b.into()).unwrap_or(0),
  };
  Ok(Outcome::Register(value))
}
