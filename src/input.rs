use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// map the left-hand side of a qwerty keyboard onto the hex keypad:
///
///   1 2 3 4        1 2 3 C
///   q w e r   =>   4 5 6 D
///   a s d f        7 8 9 E
///   z x c v        A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the host tells the interpreter about the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(u8),
    Up(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// everything that happened since the last call; called once per frame
    fn poll_keys(&mut self) -> Result<Vec<KeyEvent>, io::Error>;
}

/// Terminals only tell us about presses (and auto-repeats), never releases.
/// A pressed key is held for a number of frames and released if no repeat
/// arrives in that time.
struct HeldKeys {
    hold_frames: u32,
    remaining: [u32; 16],
}

impl HeldKeys {
    fn new(hold_frames: u32) -> Self {
        HeldKeys {
            hold_frames: hold_frames.max(1),
            remaining: [0; 16],
        }
    }

    /// feed one frame's worth of presses, get the down/up edges back
    fn frame(&mut self, pressed: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for (key, remaining) in self.remaining.iter_mut().enumerate() {
            if pressed.contains(&(key as u8)) {
                if *remaining == 0 {
                    events.push(KeyEvent::Down(key as u8));
                }
                *remaining = self.hold_frames;
            } else if *remaining > 0 {
                *remaining -= 1;
                if *remaining == 0 {
                    events.push(KeyEvent::Up(key as u8));
                }
            }
        }
        events
    }
}

/// simple implementation of Input, using the terminal in raw mode
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    held: HeldKeys,
}

impl StdinInput {
    pub fn new(hold_frames: u32) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: HeldKeys::new(hold_frames),
        })
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn poll_keys(&mut self) -> Result<Vec<KeyEvent>, io::Error> {
        let mut pressed = Vec::new();
        let mut quit = false;
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => quit = true,
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        quit = true
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => pressed.push(*mapped_key),
                        None => warn!("can't map {:?} to a CHIP-8 key", key),
                    },
                    _ => {}
                }
            }
        }
        let mut events = self.held.frame(&pressed);
        if quit {
            events.push(KeyEvent::Quit);
        }
        Ok(events)
    }
}

/// dummy Input implementation for testing: hands out one scripted batch of
/// events per frame, then nothing
pub struct DummyInput {
    frames: VecDeque<Vec<KeyEvent>>,
}

impl DummyInput {
    pub fn new(frames: Vec<Vec<KeyEvent>>) -> Self {
        DummyInput {
            frames: VecDeque::from(frames),
        }
    }

    pub fn idle() -> Self {
        DummyInput::new(Vec::new())
    }
}

impl Input for DummyInput {
    fn poll_keys(&mut self) -> Result<Vec<KeyEvent>, io::Error> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
