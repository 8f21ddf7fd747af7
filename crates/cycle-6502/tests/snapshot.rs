//! Snapshot and restore.

use cycle_6502::{AddressingMode as A, Mnemonic as M, Mos6502, Progress, ProgramWriter, StepError};
use emu_core::{Cpu, Observable, Value};

/// LDX #$00; loop: INX; TXA; STA $1000,X; BNE loop
///
/// Every pass stores a fresh non-zero byte.
fn busy_cpu() -> Mos6502 {
    let mut cpu = Mos6502::default();
    ProgramWriter::new(cpu.memory_mut(), 0x0200)
        .op(M::Ldx, A::Immediate)
        .unwrap()
        .byte(0x00)
        .op(M::Inx, A::Implied)
        .unwrap()
        .op(M::Txa, A::Implied)
        .unwrap()
        .op(M::Sta, A::AbsoluteX)
        .unwrap()
        .word(0x1000)
        .op(M::Bne, A::Relative)
        .unwrap()
        .byte(0xF9);
    cpu.set_pc(0x0200);
    cpu
}

#[test]
fn busy_loop_writes_memory() {
    let mut cpu = busy_cpu();
    assert_eq!(&cpu.memory().as_slice()[0x0200..0x0209], &[
        0xA2, 0x00, 0xE8, 0x8A, 0x9D, 0x00, 0x10, 0xD0, 0xF9
    ]);

    for _ in 0..100 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.memory().peek(0x1001), 0x01);
    assert_eq!(cpu.memory().peek(0x1002), 0x02);
    assert!((0x0202..0x0209).contains(&cpu.pc()));
}

#[test]
fn restore_reproduces_registers_and_memory() {
    let mut cpu = busy_cpu();
    for _ in 0..37 {
        cpu.step().unwrap();
    }
    let snap = cpu.snapshot();

    for _ in 0..500 {
        cpu.step().unwrap();
    }
    assert_ne!(cpu.registers(), snap.registers());
    assert_ne!(cpu.memory(), snap.memory());

    cpu.restore(&snap);
    assert_eq!(cpu.registers(), snap.registers());
    assert_eq!(cpu.memory().as_slice(), snap.memory().as_slice());
    assert_eq!(cpu.cycles(), 37);
    assert_eq!(cpu.snapshot(), snap);
}

#[test]
fn restore_mid_instruction_resumes_identically() {
    let mut cpu = busy_cpu();
    for _ in 0..5 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.progress(), Progress::InProgress);
    let snap = cpu.snapshot();

    let mut first = Vec::new();
    for _ in 0..40 {
        cpu.step().unwrap();
        first.push((cpu.pins(), cpu.registers()));
    }

    cpu.restore(&snap);
    for (n, expected) in first.into_iter().enumerate() {
        cpu.step().unwrap();
        assert_eq!((cpu.pins(), cpu.registers()), expected, "cycle {n} after restore");
    }
}

#[test]
fn snapshot_is_independent_of_later_writes() {
    let mut cpu = busy_cpu();
    let snap = cpu.snapshot();
    cpu.memory_mut().poke(0x1234, 0xAB);

    assert_eq!(snap.memory().peek(0x1234), 0x00);
    assert_eq!(cpu.query("memory.1234"), Some(Value::U8(0xAB)));
}

#[test]
fn restore_clears_a_jam() {
    let mut cpu = Mos6502::default();
    cpu.load(0x0200, &[0xEA, 0x02]);
    cpu.set_pc(0x0200);
    cpu.step_instruction().unwrap();
    let before_jam = cpu.snapshot();

    assert!(matches!(
        cpu.step(),
        Err(StepError::IllegalOpcode { opcode: 0x02, .. })
    ));
    assert!(matches!(cpu.step(), Err(StepError::Jammed { .. })));
    assert_eq!(cpu.query("halted"), Some(Value::Bool(true)));

    cpu.restore(&before_jam);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.pc(), 0x0201);
    assert_eq!(cpu.jam(), None);
}
