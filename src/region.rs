use std::str::FromStr;

/// A region of instructions
pub trait Region {
  fn instructions(&self) -> &[u8];
}

/// A `Chunk` is a raw image of instruction bytes, loaded as-is
pub struct Chunk {
  instructions: Vec<u8>,
}

impl From<Vec<u8>> for Chunk {
  fn from(instructions: Vec<u8>) -> Self {
    Self { instructions }
  }
}

impl Region for Chunk {
  fn instructions(&self) -> &[u8] {
    &self.instructions
  }
}

/// A line of program text that is not a binary byte.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("line {line}: `{text}` is not an 8-bit binary value")]
pub struct ParseError {
  pub line: usize,
  pub text: String,
}

/// A program parsed from its text form: one binary byte per line, with
/// `#` starting a comment. Blank and comment-only lines take no address.
///
/// ```text
/// 10000010 # LDI R0,8
/// 00000000
/// 00001000
///
/// 00000001 # HLT
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
  bytes: Vec<u8>,
}

impl FromStr for Program {
  type Err = ParseError;

  fn from_str(source: &str) -> Result<Self, Self::Err> {
    let mut bytes = Vec::new();
    for (index, line) in source.lines().enumerate() {
      let code = line.split('#').next().unwrap_or_default().trim();
      if code.is_empty() {
        continue;
      }
      let byte = u8::from_str_radix(code, 2).map_err(|_| ParseError {
        line: index + 1,
        text: code.to_owned(),
      })?;
      bytes.push(byte);
    }
    Ok(Self { bytes })
  }
}

impl Region for Program {
  fn instructions(&self) -> &[u8] {
    &self.bytes
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skips_comments_and_blanks() {
    let source = "\
# print8.ls8
10000010 # LDI R0,8
00000000

00001000
   # just a comment
01000111 # PRN R0
00000000
00000001 # HLT
";
    let program: Program = source.parse().unwrap();
    assert_eq!(
      program.instructions(),
      &[0x82, 0x00, 0x08, 0x47, 0x00, 0x01]
    );
  }

  #[test]
  fn reports_bad_line() {
    let err = "00000001\n0000002\n".parse::<Program>().unwrap_err();
    assert_eq!(
      err,
      ParseError {
        line: 2,
        text: "0000002".into(),
      }
    );
  }

  #[test]
  fn rejects_values_wider_than_a_byte() {
    let err = "100000000".parse::<Program>().unwrap_err();
    assert_eq!(err.line, 1);
  }

  #[test]
  fn chunk_is_raw() {
    let chunk: Chunk = vec![0x01, 0x02].into();
    assert_eq!(chunk.instructions(), &[0x01, 0x02]);
  }
}
