//! Klaus Dormann's 6502 functional test.
//!
//! The binary must be assembled with `disable_decimal = 1`: decimal mode is
//! not implemented. Load address $0000, entry point $0400. The test ends in
//! a branch-to-self trap; $3469 is the success trap of the standard build.

use cycle_6502::Mos6502;
use emu_core::Cpu;

const ENTRY: u16 = 0x0400;
const SUCCESS: u16 = 0x3469;
const INSTRUCTION_LIMIT: u64 = 100_000_000;

/// Run until an instruction jumps to itself. Returns the trap address.
fn run_to_trap(cpu: &mut Mos6502) -> Option<u16> {
    for instructions in 0..INSTRUCTION_LIMIT {
        let start_pc = cpu.pc();
        if let Err(e) = cpu.step_instruction() {
            eprintln!("\n{e} after {instructions} instructions");
            return None;
        }
        if cpu.pc() == start_pc {
            eprintln!(
                "\nTrapped at ${start_pc:04X} after {instructions} instructions ({} cycles)",
                cpu.cycles()
            );
            return Some(start_pc);
        }
        if instructions % 1_000_000 == 0 {
            eprint!("\r[{instructions} instructions, PC=${start_pc:04X}]");
        }
    }
    eprintln!("\nTest exceeded {INSTRUCTION_LIMIT} instructions");
    None
}

#[test]
#[ignore = "requires tests/data/6502_functional_test.bin"]
fn dormann_functional() {
    let binary = std::fs::read("tests/data/6502_functional_test.bin").expect(
        "tests/data/6502_functional_test.bin not found - assemble it from Klaus Dormann's repository",
    );

    let mut cpu = Mos6502::default();
    cpu.load(0x0000, &binary);
    cpu.set_pc(ENTRY);

    assert_eq!(
        run_to_trap(&mut cpu),
        Some(SUCCESS),
        "Klaus Dormann 6502 functional test failed"
    );
}
