//! Addressing-mode sequencer for instructions that only read or store.
//!
//! One call is one bus cycle. Dispatch is on (mode, micro-cycle) alone; the
//! counter is 1 on entry because cycle 0 was the opcode fetch.

use crate::Mos6502;
use crate::bus::same_page;
use crate::instruction::AddressingMode;
use crate::state::Progress;

impl Mos6502 {
    pub(crate) fn sequence_operand(&mut self) -> Progress {
        use AddressingMode as M;

        match (self.state.instruction.mode, self.state.micro_cycle) {
            // Illegal opcodes run under the NOP policy look like implied ones.
            (M::Implied | M::Accumulator | M::None, 1) => {
                self.dummy_read(self.state.regs.pc);
                Progress::Complete
            }

            (M::Immediate | M::ZeroPage, 1) => Progress::CompleteWithValue(self.fetch()),

            (
                M::ZeroPageX
                | M::ZeroPageY
                | M::Absolute
                | M::AbsoluteX
                | M::AbsoluteY
                | M::Indirect
                | M::IndirectX
                | M::IndirectY,
                1,
            ) => {
                self.fetch_to_scratch();
                Progress::InProgress
            }

            (M::ZeroPageX, 2) => self.zero_page_indexed(self.state.regs.x),
            (M::ZeroPageY, 2) => self.zero_page_indexed(self.state.regs.y),

            (M::Absolute, 2) => {
                self.fetch_to_temporary_address();
                Progress::CompleteWithAddress(self.state.temp_addr)
            }

            (M::AbsoluteX, 2) => {
                self.fetch_to_temporary_address();
                self.index_base(self.state.regs.x)
            }
            (M::AbsoluteY, 2) => {
                self.fetch_to_temporary_address();
                self.index_base(self.state.regs.y)
            }
            (M::AbsoluteX | M::AbsoluteY, 3) | (M::IndirectY, 4) => self.fix_page_carry(),

            (M::Indirect, 2) => {
                self.fetch_to_temporary_address();
                Progress::InProgress
            }
            (M::Indirect, 3) => {
                self.state.scratch = self.read(self.state.temp_addr);
                Progress::InProgress
            }
            (M::Indirect, 4) => {
                let pointer = self.state.temp_addr;
                // NMOS bug: the pointer's high byte never carries into the next page.
                let hi_addr = if pointer & 0x00FF == 0x00FF && self.config.indirect_jmp_page_wrap {
                    pointer & 0xFF00
                } else {
                    pointer.wrapping_add(1)
                };
                let hi = self.read(hi_addr);
                Progress::CompleteWithAddress(u16::from_le_bytes([self.state.scratch, hi]))
            }

            (M::IndirectX, 2) => {
                self.dummy_read(u16::from(self.state.scratch));
                self.state.scratch = self.state.scratch.wrapping_add(self.state.regs.x);
                Progress::InProgress
            }
            (M::IndirectX, 3) => {
                self.state.temp_addr = u16::from(self.read(u16::from(self.state.scratch)));
                Progress::InProgress
            }
            (M::IndirectX, 4) => {
                let hi = self.read(u16::from(self.state.scratch.wrapping_add(1)));
                self.state.temp_addr |= u16::from(hi) << 8;
                Progress::CompleteWithAddress(self.state.temp_addr)
            }

            (M::IndirectY, 2) => {
                self.state.temp_addr = u16::from(self.read(u16::from(self.state.scratch)));
                Progress::InProgress
            }
            (M::IndirectY, 3) => {
                let hi = self.read(u16::from(self.state.scratch.wrapping_add(1)));
                self.state.temp_addr |= u16::from(hi) << 8;
                self.index_base(self.state.regs.y)
            }

            _ => self.invariant("addressing mode reached an unreachable micro-cycle"),
        }
    }

    /// Dummy read at the zero-page base, then wrap the indexed address
    /// inside page zero.
    fn zero_page_indexed(&mut self, index: u8) -> Progress {
        let base = self.state.scratch;
        self.dummy_read(u16::from(base));
        Progress::CompleteWithAddress(u16::from(base.wrapping_add(index)))
    }

    /// Add an index to the base in the temporary address register. A page
    /// crossing costs one more cycle; the base stays in `temp_addr` and the
    /// effective address goes to `latched` until then.
    fn index_base(&mut self, index: u8) -> Progress {
        let base = self.state.temp_addr;
        let effective = base.wrapping_add(u16::from(index));
        if same_page(base, effective) {
            Progress::CompleteWithAddress(effective)
        } else {
            self.state.latched = effective;
            Progress::InProgress
        }
    }

    /// The cycle the hardware spends fixing the high byte: it reads from the
    /// un-carried address first.
    fn fix_page_carry(&mut self) -> Progress {
        let effective = self.state.latched;
        self.dummy_read(uncarried(self.state.temp_addr, effective));
        Progress::CompleteWithAddress(effective)
    }
}

/// Base page combined with the effective low byte.
pub(crate) const fn uncarried(base: u16, effective: u16) -> u16 {
    (base & 0xFF00) | (effective & 0x00FF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::mid_instruction;
    use crate::instruction::Instruction;

    #[test]
    fn uncarried_keeps_base_page() {
        assert_eq!(uncarried(0x12F0, 0x1310), 0x1210);
        assert_eq!(uncarried(0xFFF0, 0x0010), 0xFF10);
    }

    #[test]
    #[should_panic(
        expected = "addressing mode reached an unreachable micro-cycle: opcode $A9 (LDA immediate) at micro-cycle 5"
    )]
    fn micro_cycle_past_the_mode_is_fatal() {
        let mut cpu = mid_instruction(Instruction::decode(0xA9), 0xA9, 5);
        cpu.sequence_operand();
    }
}
