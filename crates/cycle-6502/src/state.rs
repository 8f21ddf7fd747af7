//! Processor state carried between cycles.

use emu_core::Memory;

use crate::Registers;
use crate::instruction::Instruction;

/// Output of a sequencer for one cycle.
///
/// Each variant carries exactly its own payload, so a value and an address
/// can never be present together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Next cycle fetches an opcode.
    NeedInstructionFetch,
    /// Operand resolution is under way.
    InProgress,
    /// Resolved, no operand.
    Complete,
    /// Resolved to a byte: an immediate literal or a zero-page address.
    CompleteWithValue(u8),
    /// Resolved to an effective address.
    CompleteWithAddress(u16),
}

impl Progress {
    /// True for the three completion variants.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.operand().is_some()
    }

    /// The resolved operand, if this is a completion.
    #[must_use]
    pub const fn operand(self) -> Option<Operand> {
        match self {
            Self::Complete => Some(Operand::Implied),
            Self::CompleteWithValue(value) => Some(Operand::Value(value)),
            Self::CompleteWithAddress(address) => Some(Operand::Address(address)),
            Self::NeedInstructionFetch | Self::InProgress => None,
        }
    }
}

/// Resolved operand handed to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Value(u8),
    Address(u16),
}

/// Direction of the last bus access (the R/W pin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    #[default]
    Read,
    Write,
}

/// External pins: the bus as last driven plus the control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// Address bus.
    pub address: u16,
    /// Data bus.
    pub data: u8,
    /// R/W.
    pub access: Access,
    /// High during an opcode fetch cycle.
    pub sync: bool,
    /// Ready input. Low stalls the CPU.
    pub rdy: bool,
    /// NMI input (recorded, not serviced).
    pub nmi: bool,
    /// IRQ input (recorded, not serviced).
    pub irq: bool,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            address: 0,
            data: 0,
            access: Access::Read,
            sync: false,
            rdy: true,
            nmi: false,
            irq: false,
        }
    }
}

/// The illegal opcode that locked up the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jam {
    pub opcode: u8,
    pub address: u16,
}

/// Everything that changes while the CPU runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessorState {
    pub(crate) regs: Registers,
    pub(crate) memory: Memory,
    pub(crate) pins: Pins,

    /// Decoded instruction and the byte it came from.
    pub(crate) instruction: Instruction,
    pub(crate) opcode: u8,

    /// Cycle within the current instruction (0 = opcode fetch).
    pub(crate) micro_cycle: u8,
    pub(crate) progress: Progress,

    /// One-byte temporary register.
    pub(crate) scratch: u8,
    /// Two-byte address assembled across cycles.
    pub(crate) temp_addr: u16,
    /// Target of the read-modify-write dummy write.
    pub(crate) latched: u16,

    pub(crate) jam: Option<Jam>,

    /// Total cycles since power-on.
    pub(crate) cycles: u64,
}

impl ProcessorState {
    pub(crate) fn new() -> Self {
        Self {
            regs: Registers::new(),
            memory: Memory::new(),
            pins: Pins::default(),
            instruction: Instruction::NONE,
            opcode: 0,
            micro_cycle: 0,
            progress: Progress::NeedInstructionFetch,
            scratch: 0,
            temp_addr: 0,
            latched: 0,
            jam: None,
            cycles: 0,
        }
    }
}

/// Deep copy of the whole processor, memory included.
///
/// Every snapshot costs a full 64 KiB copy. Keeping a bounded number of
/// them is up to the holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) state: ProcessorState,
}

impl Snapshot {
    /// Registers at capture time.
    #[must_use]
    pub fn registers(&self) -> Registers {
        self.state.regs
    }

    /// Memory at capture time.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// Cycle counter at capture time.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }
}
