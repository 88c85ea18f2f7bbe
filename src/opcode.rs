//! Instruction encoding.
//!
//! Every instruction byte is laid out as `AABCDDDD`:
//!
//! | bits | meaning                                        |
//! |------|------------------------------------------------|
//! | `AA` | number of operand bytes that follow (0..=2)    |
//! | `B`  | instruction is handled by the ALU              |
//! | `C`  | instruction sets the program counter itself    |
//! | `D`  | instruction identifier                         |

const OPERAND_COUNT_MASK: u8 = 0b1100_0000;
const ALU_MASK: u8 = 0b0010_0000;
const SETS_PC_MASK: u8 = 0b0001_0000;
const ID_MASK: u8 = 0b0000_1111;

/// The fields packed into a single instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
  pub operand_count: u8,
  pub is_alu: bool,
  pub sets_pc: bool,
  pub id: u8,
}

/// Split an instruction byte into its fields. Total over every byte value;
/// whether the byte names a real instruction is decided at dispatch.
pub fn decode(byte: u8) -> Decoded {
  Decoded {
    operand_count: (byte & OPERAND_COUNT_MASK) >> 6,
    is_alu: byte & ALU_MASK != 0,
    sets_pc: byte & SETS_PC_MASK != 0,
    id: byte & ID_MASK,
  }
}

/// Instructions executed outside of the ALU.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Halt = 0b0000_0001,

  /// | Operation      | Semantics/RTL | Assembly     |
  /// |----------------|---------------|--------------|
  /// | Load Immediate | `r[a] ← v`    | `LDI ra, v`  |
  LoadImmediate = 0b1000_0010,

  /// Emits the register value through the console.
  ///
  /// | Operation | Semantics/RTL   | Assembly |
  /// |-----------|-----------------|----------|
  /// | Print     | `out ← r[a]`    | `PRN ra` |
  Print = 0b0100_0111,

  /// | Operation | Semantics/RTL                  | Assembly  |
  /// |-----------|--------------------------------|-----------|
  /// | Push      | `sp ← sp − 1; m[sp] ← r[a]`    | `PUSH ra` |
  Push = 0b0100_0101,

  /// | Operation | Semantics/RTL                  | Assembly |
  /// |-----------|--------------------------------|----------|
  /// | Pop       | `r[a] ← m[sp]; sp ← sp + 1`    | `POP ra` |
  Pop = 0b0100_0110,

  /// | Operation | Semantics/RTL                          | Assembly  |
  /// |-----------|----------------------------------------|-----------|
  /// | Call      | `push(pc + 2); pc ← r[a]`              | `CALL ra` |
  Call = 0b0101_0000,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Return    | `pc ← pop()`  | `RET`    |
  Return = 0b0001_0001,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Jump      | `pc ← r[a]`   | `JMP ra` |
  Jump = 0b0101_0100,

  /// | Operation     | Semantics/RTL                       | Assembly |
  /// |---------------|-------------------------------------|----------|
  /// | Jump If Equal | `if E : pc ← r[a] else pc ← pc + 2` | `JEQ ra` |
  JumpIfEqual = 0b0101_0101,

  /// | Operation         | Semantics/RTL                        | Assembly |
  /// |-------------------|--------------------------------------|----------|
  /// | Jump If Not Equal | `if !E : pc ← r[a] else pc ← pc + 2` | `JNE ra` |
  JumpIfNotEqual = 0b0101_0110,
}

impl TryFrom<u8> for Opcode {
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    Ok(match byte {
      0b0000_0001 => Self::Halt,
      0b1000_0010 => Self::LoadImmediate,
      0b0100_0111 => Self::Print,
      0b0100_0101 => Self::Push,
      0b0100_0110 => Self::Pop,
      0b0101_0000 => Self::Call,
      0b0001_0001 => Self::Return,
      0b0101_0100 => Self::Jump,
      0b0101_0101 => Self::JumpIfEqual,
      0b0101_0110 => Self::JumpIfNotEqual,
      other => return Err(other),
    })
  }
}

/// Instructions executed by the ALU.
///
/// All results are truncated to eight bits. `a` is the destination register
/// for every operation except [`AluOp::Compare`], which writes the flags.
///
/// | Operation | Semantics/RTL            | Assembly     |
/// |-----------|--------------------------|--------------|
/// | Add       | `r[a] ← r[a] + r[b]`     | `ADD ra, rb` |
/// | Subtract  | `r[a] ← r[a] − r[b]`     | `SUB ra, rb` |
/// | Multiply  | `r[a] ← r[a] × r[b]`     | `MUL ra, rb` |
/// | Divide    | `r[a] ← r[a] ÷ r[b]`     | `DIV ra, rb` |
/// | Modulo    | `r[a] ← r[a] mod r[b]`   | `MOD ra, rb` |
/// | Increment | `r[a] ← r[a] + 1`        | `INC ra`     |
/// | Decrement | `r[a] ← r[a] − 1`        | `DEC ra`     |
/// | Compare   | `fl ← L/G/E(r[a], r[b])` | `CMP ra, rb` |
/// | And       | `r[a] ← r[a] & r[b]`     | `AND ra, rb` |
/// | Not       | `r[a] ← ~r[a]`           | `NOT ra`     |
/// | Or        | `r[a] ← r[a] \| r[b]`    | `OR ra, rb`  |
/// | Xor       | `r[a] ← r[a] ^ r[b]`     | `XOR ra, rb` |
/// | Shift L   | `r[a] ← r[a] << r[b]`    | `SHL ra, rb` |
/// | Shift R   | `r[a] ← r[a] >> r[b]`    | `SHR ra, rb` |
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  Add = 0b1010_0000,
  Subtract = 0b1010_0001,
  Multiply = 0b1010_0010,
  Divide = 0b1010_0011,
  Modulo = 0b1010_0100,
  Increment = 0b0110_0101,
  Decrement = 0b0110_0110,
  Compare = 0b1010_0111,
  And = 0b1010_1000,
  Not = 0b0110_1001,
  Or = 0b1010_1010,
  Xor = 0b1010_1011,
  ShiftLeft = 0b1010_1100,
  ShiftRight = 0b1010_1101,
}

impl AluOp {
  /// Operations reading a single register.
  pub fn is_unary(self) -> bool {
    matches!(self, Self::Increment | Self::Decrement | Self::Not)
  }
}

impl TryFrom<u8> for AluOp {
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    Ok(match byte {
      0b1010_0000 => Self::Add,
      0b1010_0001 => Self::Subtract,
      0b1010_0010 => Self::Multiply,
      0b1010_0011 => Self::Divide,
      0b1010_0100 => Self::Modulo,
      0b0110_0101 => Self::Increment,
      0b0110_0110 => Self::Decrement,
      0b1010_0111 => Self::Compare,
      0b1010_1000 => Self::And,
      0b0110_1001 => Self::Not,
      0b1010_1010 => Self::Or,
      0b1010_1011 => Self::Xor,
      0b1010_1100 => Self::ShiftLeft,
      0b1010_1101 => Self::ShiftRight,
      other => return Err(other),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_fields() {
    let ldi = decode(Opcode::LoadImmediate as u8);
    assert_eq!(
      ldi,
      Decoded {
        operand_count: 2,
        is_alu: false,
        sets_pc: false,
        id: 2,
      }
    );

    let call = decode(Opcode::Call as u8);
    assert_eq!(call.operand_count, 1);
    assert!(!call.is_alu);
    assert!(call.sets_pc);
    assert_eq!(call.id, 0);

    let not = decode(AluOp::Not as u8);
    assert_eq!(not.operand_count, 1);
    assert!(not.is_alu);
    assert!(!not.sets_pc);
    assert_eq!(not.id, 9);
  }

  #[test]
  fn decode_is_total() {
    for byte in 0..=u8::MAX {
      let decoded = decode(byte);
      assert!(decoded.operand_count <= 3);
      assert!(decoded.id <= 0xF);
      assert_eq!(decoded, decode(byte));
    }
  }

  #[test]
  fn opcode_bytes_round_trip() {
    for byte in 0..=u8::MAX {
      if let Ok(op) = Opcode::try_from(byte) {
        assert_eq!(op as u8, byte);
        assert!(!decode(byte).is_alu);
      }
      if let Ok(op) = AluOp::try_from(byte) {
        assert_eq!(op as u8, byte);
        assert!(decode(byte).is_alu);
        assert!(!decode(byte).sets_pc);
      }
    }
  }

  #[test]
  fn operand_counts_match_arity() {
    for byte in 0..=u8::MAX {
      if let Ok(op) = AluOp::try_from(byte) {
        let expected = if op.is_unary() { 1 } else { 2 };
        assert_eq!(decode(byte).operand_count, expected, "{op:?}");
      }
    }
  }

  #[test]
  fn colliding_ids_are_distinct_opcodes() {
    // PUSH and JEQ share id 5; only the sets-pc bit tells them apart
    assert_eq!(decode(0x45).id, decode(0x55).id);
    assert_eq!(Opcode::try_from(0x45), Ok(Opcode::Push));
    assert_eq!(Opcode::try_from(0x55), Ok(Opcode::JumpIfEqual));
  }

  #[test]
  fn unknown_bytes() {
    assert_eq!(Opcode::try_from(0x00), Err(0x00));
    assert_eq!(AluOp::try_from(0xAF), Err(0xAF));
  }
}
