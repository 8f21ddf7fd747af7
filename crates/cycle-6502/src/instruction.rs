//! Opcode decode table.
//!
//! Every one of the 256 opcode bytes maps to an [`Instruction`]. The 151
//! documented NMOS opcodes carry their mnemonic and addressing mode; every
//! other slot holds [`Instruction::NONE`]. The table is evaluated at compile
//! time and never changes.

use std::fmt;

/// Instruction type: the 56 documented mnemonics plus the empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented opcode slot.
    None,
}

impl Mnemonic {
    /// Upper-case assembler name, `"???"` for the empty slot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
            Self::None => "???",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operand addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `($nnnn)`, JMP only.
    Indirect,
    /// `($nn,X)`
    IndirectX,
    /// `($nn),Y`
    IndirectY,
    /// Signed branch displacement.
    Relative,
    /// Undocumented opcode slot.
    None,
}

impl AddressingMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Implied => "implied",
            Self::Accumulator => "accumulator",
            Self::Immediate => "immediate",
            Self::ZeroPage => "zero_page",
            Self::ZeroPageX => "zero_page_x",
            Self::ZeroPageY => "zero_page_y",
            Self::Absolute => "absolute",
            Self::AbsoluteX => "absolute_x",
            Self::AbsoluteY => "absolute_y",
            Self::Indirect => "indirect",
            Self::IndirectX => "indirect_x",
            Self::IndirectY => "indirect_y",
            Self::Relative => "relative",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded opcode: what it does and where its operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
}

impl Instruction {
    /// The empty slot every undocumented opcode decodes to.
    pub const NONE: Self = Self {
        mnemonic: Mnemonic::None,
        mode: AddressingMode::None,
    };

    /// Look up an opcode byte.
    #[must_use]
    pub fn decode(opcode: u8) -> Self {
        INSTRUCTIONS[usize::from(opcode)]
    }

    /// True for the empty slot.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.mnemonic, Mnemonic::None)
    }

    /// The eight conditional relative branches.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(
            self.mnemonic,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bne
                | Mnemonic::Bmi
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }

    /// Shift, rotate, increment and decrement: the six read-modify-write
    /// types, in any of their addressing modes.
    #[must_use]
    pub const fn is_read_modify_write(self) -> bool {
        matches!(
            self.mnemonic,
            Mnemonic::Asl
                | Mnemonic::Lsr
                | Mnemonic::Rol
                | Mnemonic::Ror
                | Mnemonic::Inc
                | Mnemonic::Dec
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.mode)
    }
}

/// Find the opcode byte for a mnemonic in a given addressing mode.
#[must_use]
pub fn opcode_for(mnemonic: Mnemonic, mode: AddressingMode) -> Option<u8> {
    LEGAL
        .iter()
        .find(|&&(_, m, a)| m == mnemonic && a == mode)
        .map(|&(opcode, _, _)| opcode)
}

/// Decode table indexed by opcode byte.
pub static INSTRUCTIONS: [Instruction; 256] = build_table();

const fn build_table() -> [Instruction; 256] {
    let mut table = [Instruction::NONE; 256];
    let mut i = 0;
    while i < LEGAL.len() {
        let (opcode, mnemonic, mode) = LEGAL[i];
        table[opcode as usize] = Instruction { mnemonic, mode };
        i += 1;
    }
    table
}

use AddressingMode as A;
use Mnemonic as M;

/// The documented NMOS 6502 instruction set.
const LEGAL: [(u8, Mnemonic, AddressingMode); 151] = [
    // ADC
    (0x69, M::Adc, A::Immediate),
    (0x65, M::Adc, A::ZeroPage),
    (0x75, M::Adc, A::ZeroPageX),
    (0x6D, M::Adc, A::Absolute),
    (0x7D, M::Adc, A::AbsoluteX),
    (0x79, M::Adc, A::AbsoluteY),
    (0x61, M::Adc, A::IndirectX),
    (0x71, M::Adc, A::IndirectY),
    // AND
    (0x29, M::And, A::Immediate),
    (0x25, M::And, A::ZeroPage),
    (0x35, M::And, A::ZeroPageX),
    (0x2D, M::And, A::Absolute),
    (0x3D, M::And, A::AbsoluteX),
    (0x39, M::And, A::AbsoluteY),
    (0x21, M::And, A::IndirectX),
    (0x31, M::And, A::IndirectY),
    // ASL
    (0x0A, M::Asl, A::Accumulator),
    (0x06, M::Asl, A::ZeroPage),
    (0x16, M::Asl, A::ZeroPageX),
    (0x0E, M::Asl, A::Absolute),
    (0x1E, M::Asl, A::AbsoluteX),
    // Branches
    (0x90, M::Bcc, A::Relative),
    (0xB0, M::Bcs, A::Relative),
    (0xF0, M::Beq, A::Relative),
    (0x30, M::Bmi, A::Relative),
    (0xD0, M::Bne, A::Relative),
    (0x10, M::Bpl, A::Relative),
    (0x50, M::Bvc, A::Relative),
    (0x70, M::Bvs, A::Relative),
    // BIT
    (0x24, M::Bit, A::ZeroPage),
    (0x2C, M::Bit, A::Absolute),
    // BRK
    (0x00, M::Brk, A::Implied),
    // Flag clears
    (0x18, M::Clc, A::Implied),
    (0xD8, M::Cld, A::Implied),
    (0x58, M::Cli, A::Implied),
    (0xB8, M::Clv, A::Implied),
    // CMP
    (0xC9, M::Cmp, A::Immediate),
    (0xC5, M::Cmp, A::ZeroPage),
    (0xD5, M::Cmp, A::ZeroPageX),
    (0xCD, M::Cmp, A::Absolute),
    (0xDD, M::Cmp, A::AbsoluteX),
    (0xD9, M::Cmp, A::AbsoluteY),
    (0xC1, M::Cmp, A::IndirectX),
    (0xD1, M::Cmp, A::IndirectY),
    // CPX / CPY
    (0xE0, M::Cpx, A::Immediate),
    (0xE4, M::Cpx, A::ZeroPage),
    (0xEC, M::Cpx, A::Absolute),
    (0xC0, M::Cpy, A::Immediate),
    (0xC4, M::Cpy, A::ZeroPage),
    (0xCC, M::Cpy, A::Absolute),
    // DEC
    (0xC6, M::Dec, A::ZeroPage),
    (0xD6, M::Dec, A::ZeroPageX),
    (0xCE, M::Dec, A::Absolute),
    (0xDE, M::Dec, A::AbsoluteX),
    (0xCA, M::Dex, A::Implied),
    (0x88, M::Dey, A::Implied),
    // EOR
    (0x49, M::Eor, A::Immediate),
    (0x45, M::Eor, A::ZeroPage),
    (0x55, M::Eor, A::ZeroPageX),
    (0x4D, M::Eor, A::Absolute),
    (0x5D, M::Eor, A::AbsoluteX),
    (0x59, M::Eor, A::AbsoluteY),
    (0x41, M::Eor, A::IndirectX),
    (0x51, M::Eor, A::IndirectY),
    // INC
    (0xE6, M::Inc, A::ZeroPage),
    (0xF6, M::Inc, A::ZeroPageX),
    (0xEE, M::Inc, A::Absolute),
    (0xFE, M::Inc, A::AbsoluteX),
    (0xE8, M::Inx, A::Implied),
    (0xC8, M::Iny, A::Implied),
    // Jumps
    (0x4C, M::Jmp, A::Absolute),
    (0x6C, M::Jmp, A::Indirect),
    (0x20, M::Jsr, A::Absolute),
    // LDA
    (0xA9, M::Lda, A::Immediate),
    (0xA5, M::Lda, A::ZeroPage),
    (0xB5, M::Lda, A::ZeroPageX),
    (0xAD, M::Lda, A::Absolute),
    (0xBD, M::Lda, A::AbsoluteX),
    (0xB9, M::Lda, A::AbsoluteY),
    (0xA1, M::Lda, A::IndirectX),
    (0xB1, M::Lda, A::IndirectY),
    // LDX
    (0xA2, M::Ldx, A::Immediate),
    (0xA6, M::Ldx, A::ZeroPage),
    (0xB6, M::Ldx, A::ZeroPageY),
    (0xAE, M::Ldx, A::Absolute),
    (0xBE, M::Ldx, A::AbsoluteY),
    // LDY
    (0xA0, M::Ldy, A::Immediate),
    (0xA4, M::Ldy, A::ZeroPage),
    (0xB4, M::Ldy, A::ZeroPageX),
    (0xAC, M::Ldy, A::Absolute),
    (0xBC, M::Ldy, A::AbsoluteX),
    // LSR
    (0x4A, M::Lsr, A::Accumulator),
    (0x46, M::Lsr, A::ZeroPage),
    (0x56, M::Lsr, A::ZeroPageX),
    (0x4E, M::Lsr, A::Absolute),
    (0x5E, M::Lsr, A::AbsoluteX),
    // NOP
    (0xEA, M::Nop, A::Implied),
    // ORA
    (0x09, M::Ora, A::Immediate),
    (0x05, M::Ora, A::ZeroPage),
    (0x15, M::Ora, A::ZeroPageX),
    (0x0D, M::Ora, A::Absolute),
    (0x1D, M::Ora, A::AbsoluteX),
    (0x19, M::Ora, A::AbsoluteY),
    (0x01, M::Ora, A::IndirectX),
    (0x11, M::Ora, A::IndirectY),
    // Stack
    (0x48, M::Pha, A::Implied),
    (0x08, M::Php, A::Implied),
    (0x68, M::Pla, A::Implied),
    (0x28, M::Plp, A::Implied),
    // ROL
    (0x2A, M::Rol, A::Accumulator),
    (0x26, M::Rol, A::ZeroPage),
    (0x36, M::Rol, A::ZeroPageX),
    (0x2E, M::Rol, A::Absolute),
    (0x3E, M::Rol, A::AbsoluteX),
    // ROR
    (0x6A, M::Ror, A::Accumulator),
    (0x66, M::Ror, A::ZeroPage),
    (0x76, M::Ror, A::ZeroPageX),
    (0x6E, M::Ror, A::Absolute),
    (0x7E, M::Ror, A::AbsoluteX),
    // Returns
    (0x40, M::Rti, A::Implied),
    (0x60, M::Rts, A::Implied),
    // SBC
    (0xE9, M::Sbc, A::Immediate),
    (0xE5, M::Sbc, A::ZeroPage),
    (0xF5, M::Sbc, A::ZeroPageX),
    (0xED, M::Sbc, A::Absolute),
    (0xFD, M::Sbc, A::AbsoluteX),
    (0xF9, M::Sbc, A::AbsoluteY),
    (0xE1, M::Sbc, A::IndirectX),
    (0xF1, M::Sbc, A::IndirectY),
    // Flag sets
    (0x38, M::Sec, A::Implied),
    (0xF8, M::Sed, A::Implied),
    (0x78, M::Sei, A::Implied),
    // STA
    (0x85, M::Sta, A::ZeroPage),
    (0x95, M::Sta, A::ZeroPageX),
    (0x8D, M::Sta, A::Absolute),
    (0x9D, M::Sta, A::AbsoluteX),
    (0x99, M::Sta, A::AbsoluteY),
    (0x81, M::Sta, A::IndirectX),
    (0x91, M::Sta, A::IndirectY),
    // STX / STY
    (0x86, M::Stx, A::ZeroPage),
    (0x96, M::Stx, A::ZeroPageY),
    (0x8E, M::Stx, A::Absolute),
    (0x84, M::Sty, A::ZeroPage),
    (0x94, M::Sty, A::ZeroPageX),
    (0x8C, M::Sty, A::Absolute),
    // Transfers
    (0xAA, M::Tax, A::Implied),
    (0xA8, M::Tay, A::Implied),
    (0xBA, M::Tsx, A::Implied),
    (0x8A, M::Txa, A::Implied),
    (0x9A, M::Txs, A::Implied),
    (0x98, M::Tya, A::Implied),
];
