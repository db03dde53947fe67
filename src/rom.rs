use crate::error::Chip8Error;
use crate::memory::MAX_PROGRAM_SIZE_BYTES;
use log::info;
use std::fs::File;
use std::io;
use std::path::Path;

/// read a whole ROM image; anything that won't fit above 0x200 is refused
/// before an interpreter ever sees it
pub fn read_rom(reader: &mut impl io::Read) -> Result<Vec<u8>, Chip8Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    if buf.len() > MAX_PROGRAM_SIZE_BYTES {
        return Err(Chip8Error::ProgramTooLarge {
            size: buf.len(),
            max_size: MAX_PROGRAM_SIZE_BYTES,
        });
    }
    Ok(buf)
}

pub fn load_rom_file(path: impl AsRef<Path>) -> Result<Vec<u8>, Chip8Error> {
    let path = path.as_ref();
    let mut f = File::open(path)?;
    let rom = read_rom(&mut f)?;
    info!("read {} bytes from {}", rom.len(), path.display());
    Ok(rom)
}
