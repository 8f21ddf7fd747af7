//! Program writer: a cursor that assembles bytes into memory.

use emu_core::Memory;

use crate::error::ProgramError;
use crate::instruction::{AddressingMode, Mnemonic, opcode_for};

/// Writes bytes, words and opcodes at a moving address.
///
/// ```
/// use cycle_6502::{AddressingMode as A, Mnemonic as M, Mos6502, ProgramWriter};
///
/// let mut cpu = Mos6502::default();
/// ProgramWriter::new(cpu.memory_mut(), 0x0200)
///     .op(M::Lda, A::Immediate)?
///     .byte(0x42)
///     .op(M::Sta, A::Absolute)?
///     .word(0x1234);
/// assert_eq!(cpu.memory().peek(0x0200), 0xA9);
/// # Ok::<(), cycle_6502::ProgramError>(())
/// ```
#[derive(Debug)]
pub struct ProgramWriter<'a> {
    memory: &'a mut Memory,
    cursor: u16,
}

impl<'a> ProgramWriter<'a> {
    pub fn new(memory: &'a mut Memory, origin: u16) -> Self {
        Self {
            memory,
            cursor: origin,
        }
    }

    /// Address the next byte goes to.
    #[must_use]
    pub fn position(&self) -> u16 {
        self.cursor
    }

    pub fn seek(&mut self, address: u16) -> &mut Self {
        self.cursor = address;
        self
    }

    /// Write one byte and advance, wrapping at $FFFF.
    pub fn byte(&mut self, value: u8) -> &mut Self {
        self.memory.poke(self.cursor, value);
        self.cursor = self.cursor.wrapping_add(1);
        self
    }

    pub fn bytes(&mut self, values: &[u8]) -> &mut Self {
        for &value in values {
            self.byte(value);
        }
        self
    }

    /// Little-endian word.
    pub fn word(&mut self, value: u16) -> &mut Self {
        let [lo, hi] = value.to_le_bytes();
        self.byte(lo).byte(hi)
    }

    /// Opcode byte for a mnemonic in an addressing mode.
    pub fn op(
        &mut self,
        mnemonic: Mnemonic,
        mode: AddressingMode,
    ) -> Result<&mut Self, ProgramError> {
        let opcode =
            opcode_for(mnemonic, mode).ok_or(ProgramError::NoSuchOpcode { mnemonic, mode })?;
        Ok(self.byte(opcode))
    }
}
