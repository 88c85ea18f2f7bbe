/// The `00000LGE` flags register, written only by `CMP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
  pub const EQUAL: u8 = 0b001;
  pub const GREATER: u8 = 0b010;
  pub const LESS: u8 = 0b100;

  /// Flags describing how `a` orders against `b`; exactly one bit is set.
  pub fn compare(a: u8, b: u8) -> Self {
    Self(match a.cmp(&b) {
      std::cmp::Ordering::Less => Self::LESS,
      std::cmp::Ordering::Greater => Self::GREATER,
      std::cmp::Ordering::Equal => Self::EQUAL,
    })
  }

  pub fn bits(self) -> u8 {
    self.0
  }

  pub fn equal(self) -> bool {
    self.0 & Self::EQUAL != 0
  }

  pub fn greater(self) -> bool {
    self.0 & Self::GREATER != 0
  }

  pub fn less(self) -> bool {
    self.0 & Self::LESS != 0
  }
}
