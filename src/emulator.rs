use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::fault::Fault;
use crate::input::{Input, KeyEvent};
use crate::interpreter::Chip8Interpreter;
use crate::sound::{self, Sound};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::RngCore;
use spin_sleep::LoopHelper;

/// what happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
    Halted(Fault),
}

/// The host side: owns the interpreter, wires it to the devices, and paces
/// it so the timers tick at frame_rate however many cycles run per frame.
pub struct Emulator<'a, R: RngCore = StdRng> {
    interpreter: Chip8Interpreter<R>,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    cycles_per_frame: u32,
    frame_rate: f64,
    max_frames: Option<u64>,
    frames: u64,
}

impl<'a, R: RngCore> Emulator<'a, R> {
    pub fn new(
        interpreter: Chip8Interpreter<R>,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: &Config,
    ) -> Self {
        Emulator {
            interpreter,
            display,
            input,
            sound,
            cycles_per_frame: config.cycles_per_frame,
            frame_rate: config.frame_rate,
            max_frames: config.max_frames,
            frames: 0,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter<R> {
        &self.interpreter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// one tick: input, a batch of cycles, draw, timers, tone
    pub fn run_frame(&mut self) -> Result<FrameOutcome, Chip8Error> {
        for event in self.input.poll_keys()? {
            match event {
                KeyEvent::Down(k) => self.interpreter.key_down(k),
                KeyEvent::Up(k) => self.interpreter.key_up(k),
                KeyEvent::Quit => return Ok(FrameOutcome::Quit),
            }
        }

        for _ in 0..self.cycles_per_frame {
            self.interpreter.step();
            if self.interpreter.is_halted() {
                break;
            }
        }

        if let Some(fault) = self.interpreter.fault() {
            let fault = *fault;
            if self.sound.is_beeping() {
                self.sound.stop()?;
            }
            return Ok(FrameOutcome::Halted(fault));
        }

        self.display.draw(self.interpreter.display())?;
        // the tone plays for every tick the timer was nonzero
        sound::update_tone(&mut *self.sound, self.interpreter.sound_timer())?;
        self.interpreter.decrement_timers();
        self.frames += 1;
        Ok(FrameOutcome::Continue)
    }

    /// run until the user quits, the frame limit is reached or the program
    /// faults; a fault comes back as Chip8Error::Halted
    pub fn run(&mut self) -> Result<(), Chip8Error> {
        let mut loop_helper = LoopHelper::builder().build_with_target_rate(self.frame_rate);
        info!(
            "running at {} cycles per frame, {} frames per second",
            self.cycles_per_frame, self.frame_rate
        );

        let result = loop {
            loop_helper.loop_start();
            match self.run_frame() {
                Ok(FrameOutcome::Continue) => {}
                Ok(FrameOutcome::Quit) => {
                    info!("quit after {} frames", self.frames);
                    break Ok(());
                }
                Ok(FrameOutcome::Halted(fault)) => break Err(Chip8Error::Halted(fault)),
                Err(e) => break Err(e),
            }
            if self.max_frames.map_or(false, |max| self.frames >= max) {
                debug!("frame limit reached");
                break Ok(());
            }
            loop_helper.loop_sleep();
        };

        if self.sound.is_beeping() {
            self.sound.stop()?;
        }
        result
    }
}
