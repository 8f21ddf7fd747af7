//! 6502 CPU implementation.
//!
//! Cycle-stepped emulation where each `step()` performs exactly one bus
//! cycle. An instruction is decoded in its fetch cycle, then one of three
//! sequencers resolves its operand cycle by cycle: the addressing-mode
//! sequencer, the read-modify-write sequencer, or the branch sequencer. Once
//! the operand is known the executor applies the instruction's effect in
//! that same cycle.

use emu_core::{Cpu, Memory, Observable, Value};
use log::{debug, trace, warn};

use crate::config::{Config, IllegalOpcodes};
use crate::error::StepError;
use crate::flags::{B, C, D, I, N, V, Z};
use crate::instruction::Instruction;
use crate::state::{Access, Jam, Pins, ProcessorState, Progress, Snapshot};
use crate::{Registers, Status};

/// The MOS 6502 CPU, with its 64 KiB of RAM.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    pub(crate) state: ProcessorState,
    pub(crate) config: Config,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Mos6502 {
    /// Create a powered-on CPU: registers zero, memory zero, RDY high.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: ProcessorState::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Advance exactly one bus cycle.
    pub fn step(&mut self) -> Result<(), StepError> {
        self.state.cycles += 1;

        if let Some(Jam { opcode, address }) = self.state.jam {
            self.state.pins.sync = false;
            self.dummy_read(self.state.regs.pc);
            return Err(StepError::Jammed { opcode, address });
        }

        if !self.state.pins.rdy {
            trace!("cycle {}: RDY low, stalled", self.state.cycles);
            return Ok(());
        }

        self.validate();
        trace!(
            "cycle {}: PC=${:04X} {} micro-cycle {} {:?}",
            self.state.cycles,
            self.state.regs.pc,
            self.state.instruction,
            self.state.micro_cycle,
            self.state.progress
        );

        if self.state.progress == Progress::NeedInstructionFetch {
            return self.decode();
        }
        self.state.pins.sync = false;

        if self.state.instruction.is_branch() {
            self.sequence_branch();
            return Ok(());
        }

        let progress = if self.state.instruction.is_read_modify_write() {
            self.sequence_read_modify_write()
        } else {
            self.sequence_operand()
        };
        self.state.progress = progress;
        self.state.micro_cycle += 1;

        match progress.operand() {
            Some(operand) => {
                self.execute(operand);
                self.finish_instruction();
            }
            None if progress == Progress::InProgress => {}
            None => self.invariant("sequencer asked for an opcode fetch mid-instruction"),
        }
        Ok(())
    }

    /// Step until the current instruction finishes (or the next one, if the
    /// CPU sits at a fetch). Returns the cycles taken. Stops early after a
    /// cycle with RDY low.
    pub fn step_instruction(&mut self) -> Result<u32, StepError> {
        let mut cycles = 0;
        loop {
            self.step()?;
            cycles += 1;
            if !self.state.pins.rdy || self.is_instruction_complete() {
                return Ok(cycles);
            }
        }
    }

    /// Opcode fetch cycle.
    fn decode(&mut self) -> Result<(), StepError> {
        let address = self.state.regs.pc;
        self.state.pins.sync = true;
        let opcode = self.fetch();
        let instruction = Instruction::decode(opcode);
        self.state.opcode = opcode;
        self.state.instruction = instruction;
        debug!("${address:04X}: {opcode:02X} {instruction}");

        if instruction.is_none() {
            match self.config.illegal_opcodes {
                IllegalOpcodes::Jam => {
                    warn!("illegal opcode ${opcode:02X} at ${address:04X}, CPU jammed");
                    self.state.jam = Some(Jam { opcode, address });
                    return Err(StepError::IllegalOpcode { opcode, address });
                }
                IllegalOpcodes::Nop => {
                    warn!("illegal opcode ${opcode:02X} at ${address:04X} executed as NOP");
                }
            }
        }

        self.state.micro_cycle = 1;
        self.state.progress = Progress::InProgress;
        Ok(())
    }

    /// Progress and micro-cycle move together: a fetch is due exactly when
    /// the counter is zero, and completions never outlive their cycle.
    fn validate(&self) {
        let fetching = self.state.progress == Progress::NeedInstructionFetch;
        if fetching != (self.state.micro_cycle == 0) {
            self.invariant("decode progress out of step with the micro-cycle counter");
        }
        if self.state.progress.is_complete() {
            self.invariant("completed instruction was never retired");
        }
    }

    pub(crate) fn finish_instruction(&mut self) {
        self.state.progress = Progress::NeedInstructionFetch;
        self.state.micro_cycle = 0;
    }

    /// Abort on a broken internal invariant.
    #[cold]
    #[track_caller]
    pub(crate) fn invariant(&self, what: &str) -> ! {
        let instruction = self.state.instruction;
        panic!(
            "{what}: opcode ${:02X} ({} {}) at micro-cycle {}",
            self.state.opcode, instruction.mnemonic, instruction.mode, self.state.micro_cycle
        );
    }

    // Snapshots

    /// Deep copy of the whole processor, 64 KiB of memory included.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
        }
    }

    /// Replace the processor state wholesale. Configuration is kept.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.state.clone_from(&snapshot.state);
    }

    // Inspection

    #[must_use]
    pub fn a(&self) -> u8 {
        self.state.regs.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.state.regs.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.state.regs.y
    }

    /// Stack pointer.
    #[must_use]
    pub fn sp(&self) -> u8 {
        self.state.regs.s
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.state.regs.p
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// Instruction being executed (or last executed, at a fetch boundary).
    #[must_use]
    pub fn instruction(&self) -> Instruction {
        self.state.instruction
    }

    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.state.opcode
    }

    /// Cycle within the current instruction; 0 means the next step fetches.
    #[must_use]
    pub fn micro_cycle(&self) -> u8 {
        self.state.micro_cycle
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.state.progress
    }

    #[must_use]
    pub fn pins(&self) -> Pins {
        self.state.pins
    }

    /// Total cycles stepped since power-on, stalls and jams included.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    #[must_use]
    pub fn jam(&self) -> Option<Jam> {
        self.state.jam
    }

    /// True at an instruction boundary.
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.state.progress == Progress::NeedInstructionFetch
    }

    // Host setup

    pub fn set_pc(&mut self, pc: u16) {
        self.state.regs.pc = pc;
    }

    pub fn set_registers(&mut self, regs: Registers) {
        self.state.regs = regs;
    }

    /// Copy a run of bytes into memory, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        self.state.memory.load(address, bytes);
    }

    /// Write scattered (address, value) pairs into memory.
    pub fn load_pairs(&mut self, pairs: &[(u16, u8)]) {
        self.state.memory.load_pairs(pairs);
    }

    /// Direct memory access for loaders. Does not touch the pins.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.state.memory
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;
    type Error = StepError;

    fn tick(&mut self) -> Result<(), StepError> {
        self.step()
    }

    fn pc(&self) -> u16 {
        self.state.regs.pc
    }

    fn registers(&self) -> Registers {
        self.state.regs
    }

    fn is_halted(&self) -> bool {
        self.state.jam.is_some()
    }

    fn set_irq(&mut self, asserted: bool) {
        self.state.pins.irq = asserted;
    }

    fn set_nmi(&mut self, asserted: bool) {
        self.state.pins.nmi = asserted;
    }

    fn set_rdy(&mut self, ready: bool) {
        self.state.pins.rdy = ready;
    }
}

/// Besides the listed paths, `memory.<hex>` (optionally `memory.$<hex>`)
/// reads one byte of RAM.
impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.state.regs;
        let pins = &self.state.pins;
        match path {
            "pc" => Some(regs.pc.into()),
            "a" => Some(regs.a.into()),
            "x" => Some(regs.x.into()),
            "y" => Some(regs.y.into()),
            "s" | "sp" => Some(regs.s.into()),
            "p" | "status" => Some(regs.p.0.into()),
            "flags.c" => Some(regs.p.is_set(C).into()),
            "flags.z" => Some(regs.p.is_set(Z).into()),
            "flags.i" => Some(regs.p.is_set(I).into()),
            "flags.d" => Some(regs.p.is_set(D).into()),
            "flags.b" => Some(regs.p.is_set(B).into()),
            "flags.v" => Some(regs.p.is_set(V).into()),
            "flags.n" => Some(regs.p.is_set(N).into()),
            "cycles" => Some(Value::U64(self.state.cycles)),
            "micro_cycle" => Some(self.state.micro_cycle.into()),
            "opcode" => Some(self.state.opcode.into()),
            "instruction" => Some(self.state.instruction.to_string().into()),
            "progress" => Some(format!("{:?}", self.state.progress).into()),
            "pins.address" => Some(pins.address.into()),
            "pins.data" => Some(pins.data.into()),
            "pins.rw" => Some((pins.access == Access::Read).into()),
            "pins.sync" => Some(pins.sync.into()),
            "pins.rdy" => Some(pins.rdy.into()),
            "pins.nmi" => Some(pins.nmi.into()),
            "pins.irq" => Some(pins.irq.into()),
            "halted" => Some(self.is_halted().into()),
            _ => {
                let hex = path.strip_prefix("memory.")?;
                let address = u16::from_str_radix(hex.trim_start_matches('$'), 16).ok()?;
                Some(self.state.memory.peek(address).into())
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.b",
            "flags.v",
            "flags.n",
            "cycles",
            "micro_cycle",
            "opcode",
            "instruction",
            "progress",
            "pins.address",
            "pins.data",
            "pins.rw",
            "pins.sync",
            "pins.rdy",
            "pins.nmi",
            "pins.irq",
            "halted",
        ]
    }
}

/// Place the CPU part-way through an instruction, for driving a sequencer
/// or the executor directly.
#[cfg(test)]
pub(crate) fn mid_instruction(instruction: Instruction, opcode: u8, micro_cycle: u8) -> Mos6502 {
    let mut cpu = Mos6502::default();
    cpu.state.instruction = instruction;
    cpu.state.opcode = opcode;
    cpu.state.micro_cycle = micro_cycle;
    cpu.state.progress = Progress::InProgress;
    cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_with(program: &[u8]) -> Mos6502 {
        let mut cpu = Mos6502::default();
        cpu.load(0x0200, program);
        cpu.set_pc(0x0200);
        cpu
    }

    #[test]
    fn lda_immediate_takes_two_cycles() {
        let mut cpu = cpu_with(&[0xA9, 0x42]);

        // Cycle 0: fetch opcode
        cpu.step().unwrap();
        assert_eq!(cpu.micro_cycle(), 1);
        assert_eq!(cpu.progress(), Progress::InProgress);
        assert!(cpu.pins().sync);

        // Cycle 1: fetch operand, execute
        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0x42);
        assert_eq!(cpu.pc(), 0x0202);
        assert!(cpu.is_instruction_complete());
        assert!(!cpu.pins().sync);
        assert_eq!(cpu.cycles(), 2);
    }

    #[test]
    fn sta_zero_page_stores_to_page_zero() {
        let mut cpu = cpu_with(&[0x85, 0x10]);
        cpu.state.regs.a = 0x55;

        assert_eq!(cpu.step_instruction().unwrap(), 2);
        assert_eq!(cpu.memory().peek(0x0010), 0x55);
        assert_eq!(cpu.pins().access, Access::Write);
    }

    #[test]
    fn rdy_low_freezes_everything_but_the_counter() {
        let mut cpu = cpu_with(&[0xA9, 0x42]);
        cpu.step().unwrap();
        let before = cpu.snapshot();

        cpu.set_rdy(false);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.registers(), before.registers());
        assert_eq!(cpu.micro_cycle(), 1);
        assert_eq!(cpu.cycles(), 3);

        cpu.set_rdy(true);
        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0x42);
    }

    #[test]
    fn illegal_opcode_jams_until_restore() {
        let mut cpu = cpu_with(&[0x02]);
        let clean = cpu.snapshot();

        assert_eq!(
            cpu.step(),
            Err(StepError::IllegalOpcode {
                opcode: 0x02,
                address: 0x0200
            })
        );
        assert!(cpu.is_halted());
        assert_eq!(
            cpu.step(),
            Err(StepError::Jammed {
                opcode: 0x02,
                address: 0x0200
            })
        );

        cpu.restore(&clean);
        assert!(!cpu.is_halted());
        assert_eq!(cpu.pc(), 0x0200);
    }

    #[test]
    fn illegal_opcode_as_nop() {
        let mut cpu = Mos6502::new(Config {
            illegal_opcodes: IllegalOpcodes::Nop,
            ..Config::default()
        });
        cpu.load(0x0200, &[0x02, 0xA9, 0x01]);
        cpu.set_pc(0x0200);

        assert_eq!(cpu.step_instruction().unwrap(), 2);
        assert_eq!(cpu.pc(), 0x0201);
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 0x01);
    }

    #[test]
    fn observable_paths() {
        let mut cpu = cpu_with(&[0xA9, 0x80]);
        cpu.step_instruction().unwrap();

        assert_eq!(cpu.query("a"), Some(Value::U8(0x80)));
        assert_eq!(cpu.query("flags.n"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("cycles"), Some(Value::U64(2)));
        assert_eq!(cpu.query("memory.0201"), Some(Value::U8(0x80)));
        assert_eq!(cpu.query("memory.$0200"), Some(Value::U8(0xA9)));
        assert_eq!(
            cpu.query("instruction"),
            Some(Value::String("LDA immediate".into()))
        );
        assert_eq!(cpu.query("memory.zz"), None);
        assert_eq!(cpu.query("bogus"), None);
    }

    #[test]
    fn every_listed_path_answers() {
        let cpu = cpu_with(&[0xEA]);
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path} has no value");
        }
    }

    #[test]
    #[should_panic(
        expected = "completed instruction was never retired: opcode $A9 (LDA immediate) at micro-cycle 1"
    )]
    fn unretired_completion_is_fatal() {
        let mut cpu = mid_instruction(Instruction::decode(0xA9), 0xA9, 1);
        cpu.state.progress = Progress::Complete;
        let _ = cpu.step();
    }

    #[test]
    #[should_panic(expected = "out of step with the micro-cycle counter")]
    fn fetch_with_nonzero_counter_is_fatal() {
        let mut cpu = cpu_with(&[0xEA]);
        cpu.state.micro_cycle = 2;
        let _ = cpu.step();
    }
}
