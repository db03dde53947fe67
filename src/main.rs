use std::error::Error;
use std::process;

use chip8::config::{self, Config};
use clap::Parser;
use chip8::display::MonoTermDisplay;
use chip8::emulator::Emulator;
use chip8::input::StdinInput;
use chip8::interpreter::Chip8Interpreter;
use chip8::rom;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::Chip8Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match Config::try_parse() {
        Ok(c) => c,
        Err(e) => {
            e.print()?;
            process::exit(config::exit_code(&e));
        }
    };

    // refuse oversized ROMs before there's an interpreter to put them in
    let program = rom::load_rom_file(&config.rom_path)?;

    let mut interpreter = match config.seed {
        Some(seed) => Chip8Interpreter::with_seed(seed),
        None => Chip8Interpreter::new(),
    };
    interpreter.load_program(&program)?;

    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    // devices live in this block so the terminal is restored before any
    // fault gets printed
    let result = {
        let mut display = MonoTermDisplay::new()?;
        let mut input = StdinInput::new(config.key_hold_frames)?;
        let mut emulator = Emulator::new(
            interpreter,
            &mut display,
            &mut input,
            sound.as_mut(),
            &config,
        );
        emulator.run()
    };

    match result {
        Ok(()) => Ok(()),
        Err(Chip8Error::Halted(fault)) => {
            eprintln!("Chip-8 Error: {}", fault);
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
