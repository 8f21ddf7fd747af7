//! Observability trait for inspecting component state.
//!
//! Debuggers and test harnesses read component state through string paths.
//! Queries never affect emulation state.

use std::fmt;

/// A dynamically-typed value returned by a state query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value (flags, lines).
    Bool(bool),
    /// 8-bit register or memory byte.
    U8(u8),
    /// 16-bit address.
    U16(u16),
    /// Counter.
    U64(u64),
    /// Descriptive text, e.g. a decoded instruction.
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v:#04X}"),
            Value::U16(v) => write!(f, "{v:#06X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a specific property by path.
    ///
    /// Paths are hierarchical, separated by dots:
    /// - `pc` - Program counter
    /// - `flags.z` - Zero flag
    /// - `memory.0200` - Byte at $0200
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// List the fixed query paths.
    ///
    /// Parameterised paths (such as memory addresses) are described by the
    /// implementor's documentation rather than listed here.
    fn query_paths(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_hex_for_registers() {
        assert_eq!(Value::U8(0x0A).to_string(), "0x0A");
        assert_eq!(Value::U16(0x1234).to_string(), "0x1234");
        assert_eq!(Value::U64(42).to_string(), "42");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("LDA immediate").to_string(), "LDA immediate");
    }
}
