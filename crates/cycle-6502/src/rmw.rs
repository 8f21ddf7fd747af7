//! Read-modify-write sequencer (ASL, LSR, ROL, ROR, INC, DEC).
//!
//! Memory forms latch the target, read it, write the unmodified byte back,
//! then complete; the executor does the modification and the final write.
//!
//! | mode         | cycles after fetch |
//! |--------------|--------------------|
//! | accumulator  | 1                  |
//! | zero page    | 4                  |
//! | zero page,X  | 5                  |
//! | absolute     | 5                  |
//! | absolute,X   | 6                  |

use crate::Mos6502;
use crate::addressing::uncarried;
use crate::instruction::AddressingMode;
use crate::state::Progress;

impl Mos6502 {
    pub(crate) fn sequence_read_modify_write(&mut self) -> Progress {
        use AddressingMode as M;

        let mode = self.state.instruction.mode;
        match (mode, self.state.micro_cycle) {
            (M::Accumulator, 1) => {
                self.dummy_read(self.state.regs.pc);
                Progress::Complete
            }

            (M::ZeroPage, 1) => {
                self.state.latched = u16::from(self.fetch());
                Progress::InProgress
            }
            (M::ZeroPageX | M::Absolute | M::AbsoluteX, 1) => {
                self.fetch_to_scratch();
                Progress::InProgress
            }

            (M::ZeroPageX, 2) => {
                let base = self.state.scratch;
                self.dummy_read(u16::from(base));
                self.state.latched = u16::from(base.wrapping_add(self.state.regs.x));
                Progress::InProgress
            }
            (M::Absolute, 2) => {
                self.fetch_to_temporary_address();
                self.state.latched = self.state.temp_addr;
                Progress::InProgress
            }
            (M::AbsoluteX, 2) => {
                self.fetch_to_temporary_address();
                self.state.latched = self
                    .state
                    .temp_addr
                    .wrapping_add(u16::from(self.state.regs.x));
                Progress::InProgress
            }
            // Taken whether or not the index crossed a page.
            (M::AbsoluteX, 3) => {
                self.dummy_read(uncarried(self.state.temp_addr, self.state.latched));
                Progress::InProgress
            }

            (M::ZeroPage, 2) | (M::ZeroPageX | M::Absolute, 3) | (M::AbsoluteX, 4) => {
                self.state.scratch = self.read(self.state.latched);
                Progress::InProgress
            }
            (M::ZeroPage, 3) | (M::ZeroPageX | M::Absolute, 4) | (M::AbsoluteX, 5) => {
                self.write(self.state.latched, self.state.scratch);
                Progress::InProgress
            }
            (M::ZeroPage, 4) | (M::ZeroPageX | M::Absolute, 5) | (M::AbsoluteX, 6) => {
                Progress::CompleteWithAddress(self.state.latched)
            }

            (M::Accumulator | M::ZeroPage | M::ZeroPageX | M::Absolute | M::AbsoluteX, _) => {
                self.invariant("read-modify-write reached an unreachable micro-cycle")
            }
            _ => self.invariant("read-modify-write instruction in a non-RMW addressing mode"),
        }
    }
}
