//! Processor status register (P) and its bit masks.

/// Carry (bit 0): carry out of ADC and shifts, inverted borrow for SBC and compares.
pub const C: u8 = 0x01;

/// Zero (bit 1).
pub const Z: u8 = 0x02;

/// Interrupt disable (bit 2). Set by BRK.
pub const I: u8 = 0x04;

/// Decimal (bit 3). Stored, but ADC and SBC stay binary.
pub const D: u8 = 0x08;

/// Break (bit 4). Only meaningful in copies of P pushed to the stack.
pub const B: u8 = 0x10;

/// Unused (bit 5). Reads as 1 once P has been pulled from the stack.
pub const U: u8 = 0x20;

/// Overflow (bit 6): signed overflow from ADC/SBC, bit 6 of the BIT operand.
pub const V: u8 = 0x40;

/// Negative (bit 7): bit 7 of the last result.
pub const N: u8 = 0x80;

/// Processor status register.
///
/// Power-on value is zero; nothing forces the unused bit until P is pulled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status(pub u8);

impl Status {
    /// Value pushed by PHP and BRK (break and unused both set).
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Status as restored by PLP/RTI: break ignored, unused forced.
    #[must_use]
    pub const fn from_pulled(value: u8) -> Self {
        Self((value & !B) | U)
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from a result byte.
    ///
    /// Both are cleared first so nothing survives from an earlier result.
    pub fn update_nz(&mut self, value: u8) {
        self.clear(Z | N);
        if value == 0 {
            self.set(Z);
        }
        if value & 0x80 != 0 {
            self.set(N);
        }
    }
}
