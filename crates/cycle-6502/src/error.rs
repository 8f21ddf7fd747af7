//! Errors reported to the host.
//!
//! Only guest-visible conditions are errors. Broken internal invariants
//! panic instead: they mean the core itself is wrong.

use thiserror::Error;

use crate::instruction::{AddressingMode, Mnemonic};

/// A step the guest program cannot continue from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// An undocumented opcode was decoded under the jam policy.
    #[error("illegal opcode ${opcode:02X} at ${address:04X}")]
    IllegalOpcode { opcode: u8, address: u16 },
    /// The CPU is locked up by an earlier illegal opcode.
    #[error("cpu jammed by opcode ${opcode:02X} at ${address:04X}")]
    Jammed { opcode: u8, address: u16 },
}

/// Failure to assemble a program into memory.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProgramError {
    #[error("no opcode for {mnemonic} in {mode} mode")]
    NoSuchOpcode {
        mnemonic: Mnemonic,
        mode: AddressingMode,
    },
}
