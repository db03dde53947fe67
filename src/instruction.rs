//! # instruction set
//!
//! Every CHIP-8 instruction is one big-endian 16bit word. Naming the nibbles
//! `OXYN`, with `NNN` the low 12 bits and `KK` the low byte:
//!
//!  00E0 cls            00EE ret            1NNN jp NNN         2NNN call NNN
//!  3XKK se VX, KK      4XKK sne VX, KK     5XY0 se VX, VY      6XKK ld VX, KK
//!  7XKK add VX, KK     8XY0..8XYE alu      9XY0 sne VX, VY     ANNN ld I, NNN
//!  BNNN jp V0 + NNN    CXKK rnd VX, KK     DXYN drw VX, VY, N
//!  EX9E skp VX         EXA1 sknp VX
//!  FX07 ld VX, DT      FX0A ld VX, K       FX15 ld DT, VX      FX18 ld ST, VX
//!  FX1E add I, VX      FX29 ld F, VX       FX33 ld B, VX
//!  FX55 ld [I], VX     FX65 ld VX, [I]
//!
//! 0NNN (call 1802 machine code) is not supported and decodes as invalid.

/// A decoded instruction. `x` and `y` are register indices (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Jump { addr: u16 },
    Call { addr: u16 },
    SkipEqImm { x: usize, byte: u8 },
    SkipNeImm { x: usize, byte: u8 },
    SkipEqReg { x: usize, y: usize },
    LoadImm { x: usize, byte: u8 },
    AddImm { x: usize, byte: u8 },
    Move { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddReg { x: usize, y: usize },
    SubReg { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubnReg { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    SkipNeReg { x: usize, y: usize },
    LoadAddr { addr: u16 },
    JumpOffset { addr: u16 },
    Random { x: usize, byte: u8 },
    Draw { x: usize, y: usize, height: u8 },
    SkipKeyPressed { x: usize },
    SkipKeyNotPressed { x: usize },
    GetDelay { x: usize },
    WaitKey { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddToAddr { x: usize },
    FontAddr { x: usize },
    StoreBcd { x: usize },
    StoreRegs { x: usize },
    LoadRegs { x: usize },
}

impl Instruction {
    /// decode a fetched word; None means there is no such instruction
    pub fn decode(word: u16) -> Option<Instruction> {
        use Instruction::*;

        let x = ((word >> 8) & 0xf) as usize;
        let y = ((word >> 4) & 0xf) as usize;
        let n = (word & 0xf) as u8;
        let byte = (word & 0xff) as u8;
        let addr = word & 0x0fff;

        let i = match word >> 12 {
            0x0 => match word {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => return None,
            },
            0x1 => Jump { addr },
            0x2 => Call { addr },
            0x3 => SkipEqImm { x, byte },
            0x4 => SkipNeImm { x, byte },
            0x5 if n == 0 => SkipEqReg { x, y },
            0x6 => LoadImm { x, byte },
            0x7 => AddImm { x, byte },
            0x8 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => SubReg { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubnReg { x, y },
                0xe => ShiftLeft { x, y },
                _ => return None,
            },
            0x9 if n == 0 => SkipNeReg { x, y },
            0xa => LoadAddr { addr },
            0xb => JumpOffset { addr },
            0xc => Random { x, byte },
            0xd => Draw { x, y, height: n },
            0xe => match byte {
                0x9e => SkipKeyPressed { x },
                0xa1 => SkipKeyNotPressed { x },
                _ => return None,
            },
            0xf => match byte {
                0x07 => GetDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddToAddr { x },
                0x29 => FontAddr { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => return None,
            },
            _ => return None,
        };
        Some(i)
    }
}
