use std::io::Write;

/// Where `PRN` sends its output.
pub trait Console {
  fn print(&mut self, value: u8);
}

/// Collects printed values in order.
impl Console for Vec<u8> {
  fn print(&mut self, value: u8) {
    self.push(value);
  }
}

/// Prints each value as a decimal integer on its own line.
#[derive(Debug, Default)]
pub struct Stdout;

impl Console for Stdout {
  fn print(&mut self, value: u8) {
    // output is fire-and-forget; a closed pipe must not fault the machine
    if let Err(err) = writeln!(std::io::stdout().lock(), "{value}") {
      log::warn!("failed to print {value}: {err}");
    }
  }
}
