//! Conditional relative branches.
//!
//! Not taken: 1 cycle after the fetch. Taken: 2, or 3 when the target is on
//! another page. Branches finish themselves; the executor never sees them.

use crate::Mos6502;
use crate::addressing::uncarried;
use crate::bus::same_page;
use crate::flags::{C, N, V, Z};
use crate::instruction::Mnemonic;

impl Mos6502 {
    pub(crate) fn sequence_branch(&mut self) {
        match self.state.micro_cycle {
            1 => {
                self.fetch_to_scratch();
                if !self.branch_taken() {
                    self.finish_instruction();
                    return;
                }
                let offset = i16::from(self.state.scratch as i8);
                self.state.temp_addr = self.state.regs.pc.wrapping_add_signed(offset);
                self.state.micro_cycle = 2;
            }
            2 => {
                let pc = self.state.regs.pc;
                self.dummy_read(pc);
                if same_page(pc, self.state.temp_addr) {
                    self.state.regs.pc = self.state.temp_addr;
                    self.finish_instruction();
                } else {
                    self.state.micro_cycle = 3;
                }
            }
            3 => {
                let target = self.state.temp_addr;
                self.dummy_read(uncarried(self.state.regs.pc, target));
                self.state.regs.pc = target;
                self.finish_instruction();
            }
            _ => self.invariant("branch reached an unreachable micro-cycle"),
        }
    }

    fn branch_taken(&self) -> bool {
        let p = self.state.regs.p;
        match self.state.instruction.mnemonic {
            Mnemonic::Bcc => !p.is_set(C),
            Mnemonic::Bcs => p.is_set(C),
            Mnemonic::Bne => !p.is_set(Z),
            Mnemonic::Beq => p.is_set(Z),
            Mnemonic::Bpl => !p.is_set(N),
            Mnemonic::Bmi => p.is_set(N),
            Mnemonic::Bvc => !p.is_set(V),
            Mnemonic::Bvs => p.is_set(V),
            _ => self.invariant("branch sequencer ran a non-branch instruction"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::mid_instruction;
    use crate::instruction::Instruction;

    #[test]
    #[should_panic(
        expected = "branch reached an unreachable micro-cycle: opcode $F0 (BEQ relative) at micro-cycle 4"
    )]
    fn branch_past_its_last_cycle_is_fatal() {
        let mut cpu = mid_instruction(Instruction::decode(0xF0), 0xF0, 4);
        cpu.sequence_branch();
    }

    #[test]
    #[should_panic(expected = "branch sequencer ran a non-branch instruction")]
    fn non_branch_in_branch_sequencer_is_fatal() {
        let mut cpu = mid_instruction(Instruction::decode(0xA9), 0xA9, 1);
        cpu.sequence_branch();
    }
}
