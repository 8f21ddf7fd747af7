//! Core configuration, fixed at construction.

/// What to do when an opcode decodes to the empty table slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum IllegalOpcodes {
    /// Lock up like the chip does on KIL-class opcodes. The decode cycle
    /// reports the opcode and every later step reports the jam.
    #[default]
    Jam,
    /// Execute as a two-cycle implied no-op.
    Nop,
}

/// 6502 core configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// Reproduce the NMOS `JMP ($xxFF)` bug: the high byte of the target is
    /// read from $xx00 instead of the next page.
    pub indirect_jmp_page_wrap: bool,
    /// Policy for undocumented opcodes.
    pub illegal_opcodes: IllegalOpcodes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indirect_jmp_page_wrap: true,
            illegal_opcodes: IllegalOpcodes::Jam,
        }
    }
}
