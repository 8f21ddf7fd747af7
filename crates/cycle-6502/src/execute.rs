//! Semantic executor: applies an instruction once its operand is resolved.
//!
//! Runs in the completion cycle. Any memory access it makes lands on that
//! cycle's bus.

use crate::flags::{C, D, I, N, V, Z};
use crate::instruction::{AddressingMode, Mnemonic};
use crate::state::Operand;
use crate::{Mos6502, Status};

const BRK_VECTOR: u16 = 0xFFFE;

impl Mos6502 {
    pub(crate) fn execute(&mut self, operand: Operand) {
        if self.state.instruction.mode == AddressingMode::Accumulator
            && operand != Operand::Implied
        {
            self.invariant("accumulator-mode instruction received an operand");
        }

        match self.state.instruction.mnemonic {
            // Loads and stores
            Mnemonic::Lda => {
                let val = self.operand_value(operand);
                self.do_lda(val);
            }
            Mnemonic::Ldx => {
                let val = self.operand_value(operand);
                self.state.regs.x = val;
                self.state.regs.p.update_nz(val);
            }
            Mnemonic::Ldy => {
                let val = self.operand_value(operand);
                self.state.regs.y = val;
                self.state.regs.p.update_nz(val);
            }
            Mnemonic::Sta => self.store(operand, self.state.regs.a),
            Mnemonic::Stx => self.store(operand, self.state.regs.x),
            Mnemonic::Sty => self.store(operand, self.state.regs.y),

            // Logic and arithmetic
            Mnemonic::And => {
                let val = self.operand_value(operand);
                self.do_lda(self.state.regs.a & val);
            }
            Mnemonic::Ora => {
                let val = self.operand_value(operand);
                self.do_lda(self.state.regs.a | val);
            }
            Mnemonic::Eor => {
                let val = self.operand_value(operand);
                self.do_lda(self.state.regs.a ^ val);
            }
            Mnemonic::Bit => {
                let val = self.operand_value(operand);
                self.do_bit(val);
            }
            Mnemonic::Adc => {
                let val = self.operand_value(operand);
                self.do_adc(val);
            }
            Mnemonic::Sbc => {
                let val = self.operand_value(operand);
                self.do_adc(!val);
            }
            Mnemonic::Cmp => {
                let val = self.operand_value(operand);
                self.do_compare(self.state.regs.a, val);
            }
            Mnemonic::Cpx => {
                let val = self.operand_value(operand);
                self.do_compare(self.state.regs.x, val);
            }
            Mnemonic::Cpy => {
                let val = self.operand_value(operand);
                self.do_compare(self.state.regs.y, val);
            }

            // Read-modify-write
            Mnemonic::Asl => self.modify(operand, Self::do_asl),
            Mnemonic::Lsr => self.modify(operand, Self::do_lsr),
            Mnemonic::Rol => self.modify(operand, Self::do_rol),
            Mnemonic::Ror => self.modify(operand, Self::do_ror),
            Mnemonic::Inc => self.modify(operand, Self::do_inc),
            Mnemonic::Dec => self.modify(operand, Self::do_dec),

            // Register increments
            Mnemonic::Inx => {
                self.state.regs.x = self.state.regs.x.wrapping_add(1);
                self.state.regs.p.update_nz(self.state.regs.x);
            }
            Mnemonic::Iny => {
                self.state.regs.y = self.state.regs.y.wrapping_add(1);
                self.state.regs.p.update_nz(self.state.regs.y);
            }
            Mnemonic::Dex => {
                self.state.regs.x = self.state.regs.x.wrapping_sub(1);
                self.state.regs.p.update_nz(self.state.regs.x);
            }
            Mnemonic::Dey => {
                self.state.regs.y = self.state.regs.y.wrapping_sub(1);
                self.state.regs.p.update_nz(self.state.regs.y);
            }

            // Transfers
            Mnemonic::Tax => {
                self.state.regs.x = self.state.regs.a;
                self.state.regs.p.update_nz(self.state.regs.x);
            }
            Mnemonic::Tay => {
                self.state.regs.y = self.state.regs.a;
                self.state.regs.p.update_nz(self.state.regs.y);
            }
            Mnemonic::Txa => self.do_lda(self.state.regs.x),
            Mnemonic::Tya => self.do_lda(self.state.regs.y),
            Mnemonic::Tsx => {
                self.state.regs.x = self.state.regs.s;
                self.state.regs.p.update_nz(self.state.regs.x);
            }
            Mnemonic::Txs => self.state.regs.s = self.state.regs.x,

            // Stack
            Mnemonic::Pha => self.push(self.state.regs.a),
            Mnemonic::Php => self.push(self.state.regs.p.to_byte_brk()),
            Mnemonic::Pla => {
                let val = self.pull();
                self.do_lda(val);
            }
            Mnemonic::Plp => {
                let val = self.pull();
                self.state.regs.p = Status::from_pulled(val);
            }

            // Flags
            Mnemonic::Clc => self.state.regs.p.clear(C),
            Mnemonic::Cld => self.state.regs.p.clear(D),
            Mnemonic::Cli => self.state.regs.p.clear(I),
            Mnemonic::Clv => self.state.regs.p.clear(V),
            Mnemonic::Sec => self.state.regs.p.set(C),
            Mnemonic::Sed => self.state.regs.p.set(D),
            Mnemonic::Sei => self.state.regs.p.set(I),

            // Control flow
            Mnemonic::Jmp => self.state.regs.pc = self.target(operand),
            Mnemonic::Jsr => {
                let target = self.target(operand);
                let [lo, hi] = self.state.regs.pc.wrapping_sub(1).to_le_bytes();
                self.push(hi);
                self.push(lo);
                self.state.regs.pc = target;
            }
            Mnemonic::Rts => {
                let return_addr = self.pull_word();
                self.state.regs.pc = return_addr.wrapping_add(1);
            }
            Mnemonic::Rti => {
                let val = self.pull();
                self.state.regs.p = Status::from_pulled(val);
                self.state.regs.pc = self.pull_word();
            }
            Mnemonic::Brk => {
                // The byte after BRK is padding and is skipped on return.
                let [lo, hi] = self.state.regs.pc.wrapping_add(1).to_le_bytes();
                self.push(hi);
                self.push(lo);
                self.push(self.state.regs.p.to_byte_brk());
                self.state.regs.p.set(I);
                let lo = self.read(BRK_VECTOR);
                let hi = self.read(BRK_VECTOR.wrapping_add(1));
                self.state.regs.pc = u16::from_le_bytes([lo, hi]);
            }

            Mnemonic::Nop | Mnemonic::None => {}

            Mnemonic::Bcc
            | Mnemonic::Bcs
            | Mnemonic::Beq
            | Mnemonic::Bne
            | Mnemonic::Bmi
            | Mnemonic::Bpl
            | Mnemonic::Bvc
            | Mnemonic::Bvs => self.invariant("branch instruction reached the executor"),
        }
    }

    /// Byte an instruction reads: the immediate literal, or memory at the
    /// resolved address. A zero-page value names address `$00vv`.
    fn operand_value(&mut self, operand: Operand) -> u8 {
        match (self.state.instruction.mode, operand) {
            (AddressingMode::Immediate, Operand::Value(val)) => val,
            (AddressingMode::ZeroPage, Operand::Value(zp)) => self.read(u16::from(zp)),
            (_, Operand::Address(addr)) => self.read(addr),
            _ => self.invariant("read instruction completed without a readable operand"),
        }
    }

    /// Address an instruction stores to or jumps to.
    fn target(&self, operand: Operand) -> u16 {
        match (self.state.instruction.mode, operand) {
            (AddressingMode::ZeroPage, Operand::Value(zp)) => u16::from(zp),
            (_, Operand::Address(addr)) => addr,
            _ => self.invariant("instruction completed without a target address"),
        }
    }

    fn store(&mut self, operand: Operand, value: u8) {
        let addr = self.target(operand);
        self.write(addr, value);
    }

    /// Apply a shift, rotate or step to A or to the byte the RMW sequencer
    /// read into scratch, writing the result back.
    fn modify(&mut self, operand: Operand, op: fn(&mut Self, u8) -> u8) {
        match operand {
            Operand::Implied => {
                let val = self.state.regs.a;
                self.state.regs.a = op(self, val);
            }
            Operand::Address(addr) => {
                let val = self.state.scratch;
                let result = op(self, val);
                self.write(addr, result);
            }
            Operand::Value(_) => self.invariant("read-modify-write completed with a bare value"),
        }
    }

    fn pull_word(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }

    // ALU helpers

    fn do_lda(&mut self, val: u8) {
        self.state.regs.a = val;
        self.state.regs.p.update_nz(val);
    }

    /// Binary add with carry. D is not consulted.
    fn do_adc(&mut self, val: u8) {
        let a = self.state.regs.a;
        let carry = u16::from(self.state.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(val) + carry;
        let result = sum as u8;

        let p = &mut self.state.regs.p;
        p.set_if(C, sum > 0xFF);
        p.set_if(V, (a ^ result) & (val ^ result) & 0x80 != 0);
        self.do_lda(result);
    }

    fn do_compare(&mut self, reg: u8, val: u8) {
        let p = &mut self.state.regs.p;
        p.set_if(C, reg >= val);
        p.update_nz(reg.wrapping_sub(val));
    }

    fn do_bit(&mut self, val: u8) {
        let p = &mut self.state.regs.p;
        p.set_if(Z, self.state.regs.a & val == 0);
        p.set_if(N, val & 0x80 != 0);
        p.set_if(V, val & 0x40 != 0);
    }

    fn do_asl(&mut self, val: u8) -> u8 {
        self.state.regs.p.set_if(C, val & 0x80 != 0);
        let result = val << 1;
        self.state.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, val: u8) -> u8 {
        self.state.regs.p.set_if(C, val & 0x01 != 0);
        let result = val >> 1;
        self.state.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, val: u8) -> u8 {
        let carry = u8::from(self.state.regs.p.is_set(C));
        self.state.regs.p.set_if(C, val & 0x80 != 0);
        let result = (val << 1) | carry;
        self.state.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, val: u8) -> u8 {
        let carry = u8::from(self.state.regs.p.is_set(C));
        self.state.regs.p.set_if(C, val & 0x01 != 0);
        let result = (val >> 1) | (carry << 7);
        self.state.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.state.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.state.regs.p.update_nz(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::mid_instruction;
    use crate::instruction::Instruction;

    #[test]
    #[should_panic(
        expected = "accumulator-mode instruction received an operand: opcode $0A (ASL accumulator) at micro-cycle 1"
    )]
    fn accumulator_mode_rejects_an_address() {
        let mut cpu = mid_instruction(Instruction::decode(0x0A), 0x0A, 1);
        cpu.execute(Operand::Address(0x0010));
    }

    #[test]
    #[should_panic(
        expected = "branch instruction reached the executor: opcode $D0 (BNE relative) at micro-cycle 2"
    )]
    fn branches_never_reach_the_executor() {
        let mut cpu = mid_instruction(Instruction::decode(0xD0), 0xD0, 2);
        cpu.execute(Operand::Address(0x0300));
    }

    #[test]
    fn accumulator_mode_shifts_a() {
        let mut cpu = mid_instruction(Instruction::decode(0x0A), 0x0A, 1);
        cpu.state.regs.a = 0x81;
        cpu.execute(Operand::Implied);
        assert_eq!(cpu.a(), 0x02);
        assert!(cpu.status().is_set(C));
    }
}
