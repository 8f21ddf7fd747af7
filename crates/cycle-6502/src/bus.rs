//! Bus primitives.
//!
//! Every memory access the core makes goes through here so the pins always
//! show the last address, data and direction.

use emu_core::Bus;

use crate::Mos6502;
use crate::state::Access;

impl Mos6502 {
    fn drive(&mut self, address: u16, data: u8, access: Access) {
        let pins = &mut self.state.pins;
        pins.address = address;
        pins.data = data;
        pins.access = access;
    }

    pub(crate) fn read(&mut self, address: u16) -> u8 {
        let value = self.state.memory.read(address);
        self.drive(address, value, Access::Read);
        value
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        self.state.memory.write(address, value);
        self.drive(address, value, Access::Write);
    }

    /// Idle bus cycle: the chip reads and throws the value away.
    pub(crate) fn dummy_read(&mut self, address: u16) {
        let _ = self.read(address);
    }

    /// Read the byte at PC and advance PC, wrapping at $FFFF.
    pub(crate) fn fetch(&mut self) -> u8 {
        let value = self.read(self.state.regs.pc);
        self.state.regs.pc = self.state.regs.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_to_scratch(&mut self) {
        self.state.scratch = self.fetch();
    }

    /// Fetch a high byte and pair it with the low byte held in scratch.
    pub(crate) fn fetch_to_temporary_address(&mut self) {
        let hi = self.fetch();
        self.state.temp_addr = u16::from_le_bytes([self.state.scratch, hi]);
    }

    pub(crate) fn push(&mut self, value: u8) {
        let addr = self.state.regs.push();
        self.write(addr, value);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        let addr = self.state.regs.pop();
        self.read(addr)
    }
}

/// True when both addresses lie in the same 256-byte page.
pub(crate) const fn same_page(a: u16, b: u16) -> bool {
    (a ^ b) & 0xFF00 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn fetch_wraps_program_counter() {
        let mut cpu = Mos6502::new(Config::default());
        cpu.load(0xFFFF, &[0x5A]);
        cpu.set_pc(0xFFFF);

        assert_eq!(cpu.fetch(), 0x5A);
        assert_eq!(cpu.state.regs.pc, 0x0000);
    }

    #[test]
    fn temporary_address_is_little_endian() {
        let mut cpu = Mos6502::new(Config::default());
        cpu.load(0x0200, &[0x34, 0x12]);
        cpu.set_pc(0x0200);

        cpu.fetch_to_scratch();
        cpu.fetch_to_temporary_address();
        assert_eq!(cpu.state.temp_addr, 0x1234);
    }

    #[test]
    fn pins_follow_accesses() {
        let mut cpu = Mos6502::new(Config::default());
        cpu.write(0x4000, 0x99);
        assert_eq!(cpu.pins().address, 0x4000);
        assert_eq!(cpu.pins().data, 0x99);
        assert_eq!(cpu.pins().access, Access::Write);

        cpu.dummy_read(0x4000);
        assert_eq!(cpu.pins().access, Access::Read);
    }

    #[test]
    fn page_comparison() {
        assert!(same_page(0x12FF, 0x1200));
        assert!(!same_page(0x12FF, 0x1300));
    }
}
