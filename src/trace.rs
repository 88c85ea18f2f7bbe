use std::fmt;

use crate::flags::Flags;

/// Machine state as seen before a cycle executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
  pub pc: u8,
  /// The instruction byte at `pc` and the two bytes after it.
  pub window: [u8; 3],
  pub registers: [u8; 8],
  pub flags: Flags,
}

impl fmt::Display for Snapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let [b0, b1, b2] = self.window;
    write!(f, "TRACE: {:02X} | {b0:02X} {b1:02X} {b2:02X} |", self.pc)?;
    for register in self.registers {
      write!(f, " {register:02X}")?;
    }
    Ok(())
  }
}
