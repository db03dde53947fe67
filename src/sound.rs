use crate::error::Chip8Error;
use beep::beep;

/// makes the tone that plays while the sound timer is running
pub trait Sound {
    fn beep(&mut self) -> Result<(), Chip8Error>;
    fn stop(&mut self) -> Result<(), Chip8Error>;
    fn is_beeping(&self) -> bool;
}

/// Hz
pub const SIMPLEBEEP_PITCH: u16 = 441;

/// PC speaker beeper
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Chip8Error> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        beep(0).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

/// silence, but keeps track of when it would be beeping
#[derive(Default)]
pub struct Mute {
    is_beeping: bool,
    pub beeps_started: usize,
}

impl Mute {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Chip8Error> {
        self.is_beeping = true;
        self.beeps_started += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

/// start or stop the tone to match the sound timer, touching the device
/// only when that changes
pub fn update_tone(sound: &mut dyn Sound, sound_timer: u8) -> Result<(), Chip8Error> {
    match (sound_timer > 0, sound.is_beeping()) {
        (true, false) => sound.beep(),
        (false, true) => sound.stop(),
        _ => Ok(()),
    }
}
