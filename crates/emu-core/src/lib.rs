//! Core traits and types for cycle-stepped emulation.
//!
//! A CPU advances one bus cycle per tick. Hosts drive it through [`Cpu`],
//! feed it memory through [`Bus`], and inspect it through [`Observable`].

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, MEMORY_SIZE, Memory};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
