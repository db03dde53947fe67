//! CHIP-8 interpreter
//!
//! ## Design
//!
//! * bit-exact COSMAC VIP instruction semantics, quirks included (shifts
//!   read VY, flag written after the result)
//! * the interpreter does one fetch/decode/execute per step(); the host
//!   decides how many steps make a frame
//! * timers are ticked by the host, once per frame, so they run at 60Hz
//!   whatever the emulation speed
//! * nothing in the interpreter blocks: FX0A parks it until a key_down()
//! * bad programs halt the interpreter with a latched fault rather than a
//!   panic; the host polls for it and reports it
//! * abstract display, input and audio so can plug alternatives; starting
//!   with TUI in-console
//!
//! Model
//!
//! main
//!  |-- config (command line), rom (file -> bytes, size checked)
//!  |-- display, input, sound devices
//!  `-- emulator(interpreter, devices, config)
//!       `-- every frame:
//!            |-- input.poll_keys() -> interpreter.key_down()/key_up()
//!            |-- interpreter.step() x cycles_per_frame
//!            |-- stop if the interpreter has faulted
//!            |-- display.draw(framebuffer)
//!            |-- tone on while the sound timer is running
//!            |-- interpreter.decrement_timers()
//!            `-- sleep until the next frame
pub mod config;
pub mod display;
pub mod emulator;
pub mod error;
pub mod fault;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod rom;
pub mod sound;

pub use error::Chip8Error;
pub use fault::{Fault, FaultKind};
pub use interpreter::Chip8Interpreter;
