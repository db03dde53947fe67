use crate::fault::Fault;
use std::io;
use thiserror::Error;

/// Errors raised on the host side of the emulator: loading, devices,
/// command line. Faults inside a running program are [`Fault`]s and only
/// become an error here once the run loop gives up on the program.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM too big! ({size} bytes, max is {max_size})")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("sound device: {0}")]
    Sound(String),

    #[error("Chip-8 Error: {0}")]
    Halted(Fault),
}
