//! Memory bus interface and flat 64 KiB RAM.

use std::fmt;

/// Size of the 16-bit address space in bytes.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Memory bus interface.
///
/// Every access is a single byte at a 16-bit address. Because the address
/// type spans the whole space, there is no out-of-range case.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

/// Flat 64 KiB RAM covering the full address space.
///
/// No mapped I/O: reads return what was last written. Cloning copies every
/// byte, which is what CPU snapshots rely on.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Create zero-filled memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Read a byte without going through the bus.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bytes[usize::from(address)]
    }

    /// Write a byte without going through the bus.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.bytes[usize::from(address)] = value;
    }

    /// Copy `data` into memory starting at `address`.
    ///
    /// Writes past $FFFF wrap around to $0000.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut cursor = address;
        for &byte in data {
            self.poke(cursor, byte);
            cursor = cursor.wrapping_add(1);
        }
    }

    /// Write a list of (address, value) pairs.
    pub fn load_pairs(&mut self, entries: &[(u16, u8)]) {
        for &(address, value) in entries {
            self.poke(address, value);
        }
    }

    /// The whole address space as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.poke(address, value);
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .field("non_zero", &used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut mem = Memory::new();
        mem.load(0xFFFE, &[0x11, 0x22, 0x33]);

        assert_eq!(mem.peek(0xFFFE), 0x11);
        assert_eq!(mem.peek(0xFFFF), 0x22);
        assert_eq!(mem.peek(0x0000), 0x33);
    }

    #[test]
    fn bus_reads_back_writes() {
        let mut mem = Memory::new();
        mem.write(0x1234, 0xAB);
        mem.load_pairs(&[(0x0010, 0x01), (0x0011, 0x02)]);

        assert_eq!(mem.read(0x1234), 0xAB);
        assert_eq!(mem.read(0x0010), 0x01);
        assert_eq!(mem.read(0x0011), 0x02);
        assert_eq!(mem.as_slice().len(), MEMORY_SIZE);
    }

    #[test]
    fn clone_is_deep() {
        let mut mem = Memory::new();
        mem.poke(0x0200, 0x42);
        let copy = mem.clone();
        mem.poke(0x0200, 0x00);

        assert_eq!(copy.peek(0x0200), 0x42);
        assert_ne!(copy, mem);
    }
}
