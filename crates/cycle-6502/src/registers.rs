//! 6502 CPU registers.

use crate::Status;

/// Programmer-visible registers. Hosts seed them with
/// [`Mos6502::set_registers`](crate::Mos6502::set_registers) and read them
/// back through [`Cpu::registers`](emu_core::Cpu::registers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Low byte of the next push address in page one. Starts at zero, so
    /// the first push lands on $0100 and wraps S to $FF.
    pub s: u8,
    /// Address of the next byte the sequencers fetch.
    pub pc: u16,
    pub p: Status,
}

impl Registers {
    /// Power-on register set: everything zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0,
            pc: 0,
            p: Status(0),
        }
    }

    /// Claim the next stack slot for a push, return the address to write.
    pub fn push(&mut self) -> u16 {
        let addr = self.stack_addr();
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Release the top stack slot for a pull, return the address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        self.stack_addr()
    }

    /// Page-one address S points at.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        0x0100 | (self.s as u16)
    }
}
