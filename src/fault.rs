use std::fmt;
use thiserror::Error;

/// Reasons the interpreter halts. Once one of these is latched the machine
/// never executes another instruction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    #[error("invalid opcode")]
    InvalidOpcode,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid hex digit")]
    InvalidHexDigit,
    #[error("stack underflow")]
    StackUnderflow,
}

/// A latched fault, with the location and word of the offending instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub address: u16,
    pub opcode: u16,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at 0x{:03x} (opcode: 0x{:04x})",
            self.kind, self.address, self.opcode
        )
    }
}

impl std::error::Error for Fault {}

/// human-readable line for the host to show when it stops
pub fn format_fault(fault: Option<&Fault>) -> String {
    match fault {
        Some(f) => f.to_string(),
        None => String::from("no error"),
    }
}
