//! CPU core trait.

/// A CPU core.
///
/// The CPU owns its memory, so a tick needs no bus argument. One tick is
/// one bus cycle. Hosts drive the CPU through this trait and inspect it
/// through [`crate::Observable`].
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Error reported by a tick the guest program cannot continue from.
    type Error;

    /// Advance the CPU by exactly one bus cycle.
    fn tick(&mut self) -> Result<(), Self::Error>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a copy of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU can no longer make progress.
    fn is_halted(&self) -> bool;

    /// Drive the IRQ input line.
    fn set_irq(&mut self, asserted: bool);

    /// Drive the NMI input line.
    fn set_nmi(&mut self, asserted: bool);

    /// Drive the RDY input line. Low stalls the CPU.
    fn set_rdy(&mut self, ready: bool);
}
