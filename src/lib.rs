//! Bare-bones emulator for the LS-8, a toy 8-bit processor with eight
//! registers, 256 bytes of memory and a three-bit flags register.
//!
//! Programs are plain bytes loaded at address `0`; the machine fetches,
//! decodes and executes until it reaches `HLT` or faults.

pub mod alu;
pub mod console;
pub mod flags;
pub mod opcode;
pub mod region;
pub mod trace;
pub mod vm;
