//! Cycle-stepped MOS 6502 core.
//!
//! The 6502 performs one bus access per clock cycle. Each call to
//! [`Mos6502::step`] advances exactly one of those cycles, so the registers,
//! memory and pins are visible mid-instruction: dummy reads, the
//! read-modify-write dummy write, and the branch page-crossing penalty all
//! show up cycle by cycle.
//!
//! The CPU owns its 64 KiB of RAM. A host loads a program, steps, and takes
//! [`Snapshot`]s to roll back:
//!
//! ```
//! use cycle_6502::{Mos6502, Progress};
//!
//! let mut cpu = Mos6502::default();
//! cpu.load(0x0200, &[0xA9, 0x80]); // LDA #$80
//! cpu.set_pc(0x0200);
//!
//! cpu.step()?; // opcode fetch
//! cpu.step()?; // operand fetch, execute
//! assert_eq!(cpu.a(), 0x80);
//! assert_eq!(cpu.progress(), Progress::NeedInstructionFetch);
//! # Ok::<(), cycle_6502::StepError>(())
//! ```
//!
//! Only the documented NMOS instruction set is decoded. Decimal mode is not
//! implemented and interrupt lines are recorded without being serviced.

mod addressing;
mod branch;
mod bus;
mod config;
mod cpu;
mod error;
mod execute;
pub mod flags;
mod instruction;
mod program;
mod registers;
mod rmw;
mod state;

pub use config::{Config, IllegalOpcodes};
pub use cpu::Mos6502;
pub use error::{ProgramError, StepError};
pub use flags::Status;
pub use instruction::{AddressingMode, INSTRUCTIONS, Instruction, Mnemonic, opcode_for};
pub use program::ProgramWriter;
pub use registers::Registers;
pub use state::{Access, Jam, Operand, Pins, Progress, Snapshot};
