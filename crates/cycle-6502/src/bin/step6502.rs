//! step6502 - run a raw 6502 binary one bus cycle at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use cycle_6502::{Config, IllegalOpcodes, Mos6502, Registers, StepError};
use emu_core::Cpu;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

/// Headless cycle-stepped 6502 runner
#[derive(Parser, Debug)]
#[command(name = "step6502")]
#[command(about = "Run a raw 6502 binary one bus cycle at a time", long_about = None)]
struct Args {
    /// Raw binary image
    program: PathBuf,

    /// Address the image is loaded at ($hex, 0xhex or decimal)
    #[arg(short, long, default_value = "0x0200", value_parser = parse_address)]
    load_at: u16,

    /// Initial PC (defaults to the load address)
    #[arg(short, long, value_parser = parse_address)]
    start: Option<u16>,

    /// Cycle budget
    #[arg(short, long, default_value_t = 1_000_000)]
    cycles: u64,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fix the indirect JMP page wrap bug
    #[arg(long)]
    no_page_wrap_bug: bool,

    /// Policy for undocumented opcodes
    #[arg(long, value_enum)]
    illegal: Option<IllegalArg>,

    /// Stop when an instruction jumps to itself
    #[arg(long)]
    stop_on_loop: bool,

    /// Log every cycle
    #[arg(short, long)]
    trace: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IllegalArg {
    Jam,
    Nop,
}

impl From<IllegalArg> for IllegalOpcodes {
    fn from(arg: IllegalArg) -> Self {
        match arg {
            IllegalArg::Jam => Self::Jam,
            IllegalArg::Nop => Self::Nop,
        }
    }
}

#[derive(Debug, Error)]
enum RunError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Stop {
    Budget,
    Loop,
    Jammed,
}

#[derive(Debug, Serialize)]
struct Report {
    registers: Registers,
    cycles: u64,
    stop: Stop,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix('$') {
        (hex, 16)
    } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else {
        (s, 10)
    };
    u16::from_str_radix(digits, radix).map_err(|e| format!("invalid address '{s}': {e}"))
}

fn read_file(path: &Path) -> Result<Vec<u8>, RunError> {
    fs::read(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(args: &Args) -> Result<Config, RunError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read_file(path)?;
            serde_json::from_slice(&text).map_err(|source| RunError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => Config::default(),
    };
    if args.no_page_wrap_bug {
        config.indirect_jmp_page_wrap = false;
    }
    if let Some(illegal) = args.illegal {
        config.illegal_opcodes = illegal.into();
    }
    Ok(config)
}

fn run(args: &Args) -> Result<Report, RunError> {
    let config = load_config(args)?;
    let image = read_file(&args.program)?;

    let mut cpu = Mos6502::new(config);
    cpu.load(args.load_at, &image);
    cpu.set_pc(args.start.unwrap_or(args.load_at));
    info!(
        "loaded {} bytes at ${:04X}, starting at ${:04X}",
        image.len(),
        args.load_at,
        cpu.pc()
    );

    let mut instruction_start = cpu.pc();
    let mut stop = Stop::Budget;
    let mut error: Option<StepError> = None;

    while cpu.cycles() < args.cycles {
        if cpu.is_instruction_complete() {
            instruction_start = cpu.pc();
        }
        if let Err(err) = cpu.step() {
            warn!("{err}");
            stop = Stop::Jammed;
            error = Some(err);
            break;
        }
        if args.stop_on_loop && cpu.is_instruction_complete() && cpu.pc() == instruction_start {
            info!("trapped at ${instruction_start:04X}");
            stop = Stop::Loop;
            break;
        }
    }
    if matches!(stop, Stop::Budget) {
        warn!("cycle budget of {} exhausted", args.cycles);
    }

    Ok(Report {
        registers: cpu.registers(),
        cycles: cpu.cycles(),
        stop,
        error: error.map(|e| e.to_string()),
    })
}

fn print_report(report: &Report) {
    let regs = &report.registers;
    println!("PC:     ${:04X}", regs.pc);
    println!("A:      ${:02X}", regs.a);
    println!("X:      ${:02X}", regs.x);
    println!("Y:      ${:02X}", regs.y);
    println!("S:      ${:02X}", regs.s);
    println!("P:      ${:02X} ({})", regs.p.0, flag_string(regs.p.0));
    println!("Cycles: {}", report.cycles);
    println!("Stop:   {:?}", report.stop);
    if let Some(error) = &report.error {
        println!("Error:  {error}");
    }
}

fn flag_string(p: u8) -> String {
    "NV-BDIZC"
        .chars()
        .enumerate()
        .map(|(i, c)| if p & (0x80 >> i) != 0 { c } else { '.' })
        .collect()
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.trace { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("step6502: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report).map_err(RunError::from) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("step6502: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }

    if report.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_formats() {
        assert_eq!(parse_address("$C000"), Ok(0xC000));
        assert_eq!(parse_address("0x0200"), Ok(0x0200));
        assert_eq!(parse_address("512"), Ok(512));
        assert!(parse_address("0x10000").is_err());
    }

    #[test]
    fn flag_letters() {
        assert_eq!(flag_string(0x81), "N......C");
        assert_eq!(flag_string(0x00), "........");
    }
}
