use emulator::region::{Chunk, Program};
use emulator::vm::{Error, Vm, STACK_ORIGIN};

fn run(source: &str) -> (Vm, Vec<u8>) {
  let program: Program = source.parse().unwrap();
  let mut vm = Vm::new();
  vm.load(&program).unwrap();
  let mut out = Vec::<u8>::new();
  vm.run(&mut out).unwrap();
  (vm, out)
}

#[test]
fn print8() {
  let (vm, out) = run(include_str!("../demos/print8.ls8"));
  assert_eq!(out, vec![8]);
  assert!(vm.is_halted());
}

#[test]
fn mult() {
  let (_, out) = run(include_str!("../demos/mult.ls8"));
  assert_eq!(out, vec![72]);
}

#[test]
fn stack() {
  let (vm, out) = run(include_str!("../demos/stack.ls8"));
  assert_eq!(out, vec![3, 2, 1]);
  assert_eq!(vm.sp(), STACK_ORIGIN);
}

#[test]
fn call() {
  let (vm, out) = run(include_str!("../demos/call.ls8"));
  assert_eq!(out, vec![40]);
  assert_eq!(vm.sp(), STACK_ORIGIN);
  assert_eq!(vm.pc(), 8);
}

#[test]
fn sctest() {
  let (_, out) = run(include_str!("../demos/sctest.ls8"));
  assert_eq!(out, vec![1, 2]);
}

#[test]
fn add_and_print() {
  #[rustfmt::skip]
  let chunk: Chunk = vec![
    0x82, 0x00, 0x08, // LDI R0,8
    0x82, 0x01, 0x09, // LDI R1,9
    0xA0, 0x00, 0x01, // ADD R0,R1
    0x47, 0x00,       // PRN R0
    0x01,             // HLT
  ]
  .into();
  let mut vm = Vm::new();
  vm.load(&chunk).unwrap();
  let mut out = Vec::<u8>::new();
  assert_eq!(vm.run(&mut out).unwrap(), 5);
  assert_eq!(out, vec![17]);
}

#[test]
fn countdown_loop() {
  #[rustfmt::skip]
  let chunk: Chunk = vec![
    0x82, 0x00, 0x03, // LDI R0,3
    0x82, 0x01, 0x00, // LDI R1,0
    0x82, 0x02, 0x09, // LDI R2,LOOP
    0x47, 0x00,       // LOOP (9): PRN R0
    0x66, 0x00,       // DEC R0
    0xA7, 0x00, 0x01, // CMP R0,R1
    0x56, 0x02,       // JNE R2
    0x01,             // HLT
  ]
  .into();
  let mut vm = Vm::new();
  vm.load(&chunk).unwrap();
  let mut out = Vec::<u8>::new();
  vm.run(&mut out).unwrap();
  assert_eq!(out, vec![3, 2, 1]);
  assert!(vm.flags().equal());
}

#[test]
fn modulo_by_zero_stops_the_run() {
  #[rustfmt::skip]
  let chunk: Chunk = vec![
    0x82, 0x00, 0x07, // LDI R0,7
    0xA4, 0x00, 0x01, // MOD R0,R1
    0x47, 0x00,       // PRN R0
    0x01,             // HLT
  ]
  .into();
  let mut vm = Vm::new();
  vm.load(&chunk).unwrap();
  let mut out = Vec::<u8>::new();
  let err = vm.run(&mut out).unwrap_err();
  assert!(matches!(err, Error::DivisionByZero(_)));
  assert_eq!(err.to_string(), "division by zero in Modulo");
  assert!(out.is_empty());
  assert_eq!(vm.pc(), 3);
  assert!(matches!(vm.step(&mut out), Err(Error::MachineHalted)));
}
