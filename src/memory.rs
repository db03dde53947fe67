use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// every address the interpreter touches is wrapped into 12 bits
pub const ADDRESS_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// biggest program that fits between PROGRAM_ADDR and the top of RAM
pub const MAX_PROGRAM_SIZE_BYTES: usize = RAM_SIZE_BYTES - PROGRAM_ADDR as usize;

pub const FONT_ADDR: u16 = 0x0000;
pub const FONT_HEIGHT: u16 = 5;

/// Represents the flat address space: font, program and data all live here.
/// Addresses wrap at 0xfff rather than running off the end.
pub trait MemoryMap {
    fn read_byte(&self, addr: u16) -> u8;

    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word (instruction fetch); the second byte
    /// wraps round to 0x000 when addr is 0xfff
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | self.read_byte(addr.wrapping_add(1)) as u16
    }

    /// write a chunk of bytes, wrapping at the top of RAM
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// get a r/o slice of the whole address space
    fn get_ro_slice(&self) -> &[u8];
}

/// The CHIP-8 4K memory map:
///   0x0000-0x004f  font glyphs, 5 bytes each
///   0x0050-0x01ff  unused (interpreter area on the original hardware)
///   0x0200-0x0fff  program and data
pub struct Chip8MemoryMap {
    bytes: Box<[u8; RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }

    fn get_ro_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// all-zero RAM; call load_font() to get the glyphs in
    pub fn new() -> Self {
        Chip8MemoryMap {
            bytes: Box::new([0u8; RAM_SIZE_BYTES]),
        }
    }

    /// glyph d lands at [5d, 5d+5)
    pub fn load_font(&mut self) {
        self.write(&CHIP8_FONT, FONT_ADDR);
    }

    /// load a CHIP-8 program at 0x200. Refuses rather than truncates.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_PROGRAM_SIZE_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE_BYTES,
            });
        }
        let start = PROGRAM_ADDR as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
