//! # interpreter
//!
//! The machine the interpreter presents to a CHIP-8 program:
//!  * 4K of RAM, font at 0x000, program at 0x200
//!  * V0-VF, sixteen 8bit registers; VF doubles as carry/borrow/collision flag
//!  * I, the 12bit address register
//!  * PC, the 12bit program counter
//!  * a return stack of 12bit addresses (no depth limit here)
//!  * delay and sound timers, counted down by the host at 60Hz
//!  * a 64x32 monochrome display
//!  * a 16 key hex keypad
//!
//! The host drives it: step() once per cycle, decrement_timers() once per
//! tick, key_down()/key_up() as keys change. Nothing here blocks; FX0A
//! (wait for key) just parks the interpreter until the next key_down().
use crate::error::Chip8Error;
use crate::fault::{self, Fault, FaultKind};
use crate::framebuffer::Framebuffer;
use crate::instruction::Instruction;
use crate::memory::{self, Chip8MemoryMap, MemoryMap};
use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub const FLAG_REGISTER: usize = 0xf;
pub const KEY_COUNT: usize = 16;

/// What step() will do next time it is called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// parked on FX0A; holds the register the key will be written into
    AwaitingKey(usize),
    /// terminal
    Halted(Fault),
}

pub struct Chip8Interpreter<R: RngCore = StdRng> {
    memory: Chip8MemoryMap,
    registers: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    display: Framebuffer,
    keys: [bool; KEY_COUNT],
    state: RunState,
    rng: R,
}

impl Chip8Interpreter<StdRng> {
    /// font loaded, PC at 0x200, randomness from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// reproducible CXKK results
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Chip8Interpreter<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Chip8Interpreter<R> {
    pub fn with_rng(rng: R) -> Self {
        let mut i = Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            registers: [0; 16],
            i: 0,
            program_counter: memory::PROGRAM_ADDR,
            stack: Vec::new(),
            delay_timer: 0,
            sound_timer: 0,
            display: Framebuffer::default(),
            keys: [false; KEY_COUNT],
            state: RunState::Running,
            rng,
        };
        i.load_font();
        i
    }

    pub fn load_font(&mut self) {
        self.memory.load_font();
    }

    /// load a chip8 program at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(program)?;
        debug!("loaded {} byte program at {:#05x}", program.len(), memory::PROGRAM_ADDR);
        Ok(())
    }

    /// run one fetch/decode/execute cycle; does nothing when halted or
    /// waiting for a key
    pub fn step(&mut self) {
        if self.state != RunState::Running {
            return;
        }

        let address = self.program_counter;
        let opcode = self.memory.get_word(address);
        self.advance();

        let result = match Instruction::decode(opcode) {
            Some(instruction) => {
                trace!("{:03x}: {:04x} {:?}", address, opcode, instruction);
                self.execute(instruction)
            }
            None => Err(FaultKind::InvalidOpcode),
        };

        if let Err(kind) = result {
            self.halt(kind, address, opcode);
        }
    }

    /// a key went down. Resolves a pending FX0A; the program carries on
    /// from the next step()
    pub fn key_down(&mut self, key: u8) {
        let k = key as usize;
        if k >= KEY_COUNT {
            warn!("ignoring key_down for key {:#x}", key);
            return;
        }
        self.keys[k] = true;
        if let RunState::AwaitingKey(register) = self.state {
            debug!("key {:x} resolves wait into V{:X}", key, register);
            self.registers[register] = key;
            self.state = RunState::Running;
        }
    }

    pub fn key_up(&mut self, key: u8) {
        match self.keys.get_mut(key as usize) {
            Some(k) => *k = false,
            None => warn!("ignoring key_up for key {:#x}", key),
        }
    }

    /// one 60Hz tick's worth of timer countdown
    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn format_fault(&self) -> String {
        fault::format_fault(self.fault())
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.get_ro_slice()
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }

    /// V0..VF; None past VF
    pub fn register(&self, index: usize) -> Option<u8> {
        self.registers.get(index).copied()
    }

    pub fn address_register(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn call_stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn key_state(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn fault(&self) -> Option<&Fault> {
        match &self.state {
            RunState::Halted(f) => Some(f),
            _ => None,
        }
    }

    pub fn pending_key_target(&self) -> Option<usize> {
        match self.state {
            RunState::AwaitingKey(register) => Some(register),
            _ => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, RunState::Halted(_))
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, RunState::AwaitingKey(_))
    }

    fn advance(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2) & memory::ADDRESS_MASK;
    }

    /// latch a fault; PC goes back to the instruction that caused it
    fn halt(&mut self, kind: FaultKind, address: u16, opcode: u16) {
        let f = Fault {
            kind,
            address,
            opcode,
        };
        error!("halting: {}", f);
        self.program_counter = address;
        self.state = RunState::Halted(f);
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), FaultKind> {
        use Instruction::*;

        let v = &mut self.registers;
        match instruction {
            ClearScreen => self.display.clear(),
            Return => {
                self.program_counter = self.stack.pop().ok_or(FaultKind::StackUnderflow)?;
            }
            Jump { addr } => self.program_counter = addr,
            Call { addr } => {
                self.stack.push(self.program_counter);
                self.program_counter = addr;
            }
            SkipEqImm { x, byte } => {
                if v[x] == byte {
                    self.advance();
                }
            }
            SkipNeImm { x, byte } => {
                if v[x] != byte {
                    self.advance();
                }
            }
            SkipEqReg { x, y } => {
                if v[x] == v[y] {
                    self.advance();
                }
            }
            LoadImm { x, byte } => v[x] = byte,
            AddImm { x, byte } => v[x] = v[x].wrapping_add(byte),
            Move { x, y } => v[x] = v[y],
            Or { x, y } => v[x] |= v[y],
            And { x, y } => v[x] &= v[y],
            Xor { x, y } => v[x] ^= v[y],
            // flag goes in last in all of these: X or Y may be VF itself
            AddReg { x, y } => {
                let (sum, carry) = v[x].overflowing_add(v[y]);
                v[x] = sum;
                v[FLAG_REGISTER] = carry as u8;
            }
            SubReg { x, y } => {
                let no_borrow = v[x] >= v[y];
                v[x] = v[x].wrapping_sub(v[y]);
                v[FLAG_REGISTER] = no_borrow as u8;
            }
            SubnReg { x, y } => {
                let no_borrow = v[y] >= v[x];
                v[x] = v[y].wrapping_sub(v[x]);
                v[FLAG_REGISTER] = no_borrow as u8;
            }
            // NB. shifts read VY, not VX, as on the COSMAC VIP
            ShiftRight { x, y } => {
                let lsb = v[x] & 0x01;
                v[x] = v[y] >> 1;
                v[FLAG_REGISTER] = lsb;
            }
            ShiftLeft { x, y } => {
                let msb = v[x] >> 7;
                v[x] = v[y] << 1;
                v[FLAG_REGISTER] = msb;
            }
            SkipNeReg { x, y } => {
                if v[x] != v[y] {
                    self.advance();
                }
            }
            LoadAddr { addr } => self.i = addr,
            JumpOffset { addr } => {
                self.program_counter = addr.wrapping_add(v[0] as u16) & memory::ADDRESS_MASK;
            }
            Random { x, byte } => {
                let r = (self.rng.next_u32() & 0xff) as u8;
                self.registers[x] = r & byte;
            }
            Draw { x, y, height } => self.draw(x, y, height),
            SkipKeyPressed { x } => {
                let key = v[x];
                if self.pressed(key)? {
                    self.advance();
                }
            }
            SkipKeyNotPressed { x } => {
                let key = v[x];
                if !self.pressed(key)? {
                    self.advance();
                }
            }
            GetDelay { x } => v[x] = self.delay_timer,
            WaitKey { x } => {
                debug!("waiting for a key into V{:X}", x);
                self.state = RunState::AwaitingKey(x);
            }
            SetDelay { x } => self.delay_timer = v[x],
            SetSound { x } => self.sound_timer = v[x],
            AddToAddr { x } => {
                self.i = self.i.wrapping_add(v[x] as u16) & memory::ADDRESS_MASK;
            }
            FontAddr { x } => {
                if v[x] as usize >= KEY_COUNT {
                    return Err(FaultKind::InvalidHexDigit);
                }
                self.i = memory::FONT_ADDR + v[x] as u16 * memory::FONT_HEIGHT;
            }
            StoreBcd { x } => {
                let value = v[x];
                self.memory.write(&[value / 100, value / 10 % 10, value % 10], self.i);
            }
            StoreRegs { x } => {
                for r in 0..=x {
                    self.memory.write_byte(self.i, self.registers[r]);
                    self.i = self.i.wrapping_add(1) & memory::ADDRESS_MASK;
                }
            }
            LoadRegs { x } => {
                for r in 0..=x {
                    self.registers[r] = self.memory.read_byte(self.i);
                    self.i = self.i.wrapping_add(1) & memory::ADDRESS_MASK;
                }
            }
        }
        Ok(())
    }

    /// DXYN: sprite rows come from I onwards, wrapping at the top of RAM
    /// VF is cleared before the coordinates are read, so DFYN/DXFN draw at 0
    fn draw(&mut self, x: usize, y: usize, height: u8) {
        self.registers[FLAG_REGISTER] = 0;
        let rows: Vec<u8> = (0..height as u16)
            .map(|row| self.memory.read_byte(self.i.wrapping_add(row)))
            .collect();
        let collided = self
            .display
            .draw_sprite(self.registers[x] as usize, self.registers[y] as usize, &rows);
        if collided {
            self.registers[FLAG_REGISTER] = 1;
        }
    }

    fn pressed(&self, key: u8) -> Result<bool, FaultKind> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(FaultKind::InvalidKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// interpreter with a fixed seed and the given program at 0x200
    fn with_program(prog: &[u8]) -> Chip8Interpreter {
        let mut i = Chip8Interpreter::with_seed(0x5eed);
        i.load_program(prog).unwrap();
        i
    }

    fn run(i: &mut Chip8Interpreter, steps: usize) {
        for _ in 0..steps {
            i.step();
        }
    }

    /// snapshot of everything step() could touch
    fn snapshot(i: &Chip8Interpreter) -> (Vec<u8>, [u8; 16], u16, u16, Vec<u16>, u8, u8, Framebuffer, RunState) {
        (
            i.memory().to_vec(),
            *i.registers(),
            i.address_register(),
            i.program_counter(),
            i.call_stack().to_vec(),
            i.delay_timer(),
            i.sound_timer(),
            i.display().clone(),
            i.run_state(),
        )
    }

    #[test]
    fn test_initial_state() {
        let i = Chip8Interpreter::with_seed(1);
        assert_eq!(i.program_counter(), 0x200);
        assert_eq!(i.registers(), &[0; 16]);
        assert_eq!(i.address_register(), 0);
        assert!(i.call_stack().is_empty());
        assert_eq!(i.run_state(), RunState::Running);
        assert_eq!(i.memory()[..80], memory::CHIP8_FONT);
        assert_eq!(i.format_fault(), "no error");
    }

    #[test]
    fn test_load_and_add() {
        let mut i = with_program(&[0x60, 0x05, 0x70, 0x03]);
        run(&mut i, 2);
        assert_eq!(i.register(0), Some(8));
        assert_eq!(i.program_counter(), 0x204);
        assert_eq!(i.fault(), None);
    }

    #[test]
    fn test_add_imm_wraps_without_flag() {
        let mut i = with_program(&[0x60, 0xff, 0x70, 0x02]);
        run(&mut i, 2);
        assert_eq!(i.register(0), Some(1));
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
    }

    #[test]
    fn test_clear_screen() {
        // draw the 0 glyph, then clear
        let mut i = with_program(&[0xa0, 0x00, 0xd0, 0x05, 0x00, 0xe0]);
        run(&mut i, 2);
        assert!(i.display().lit_count() > 0);
        i.step();
        assert_eq!(i.display().lit_count(), 0);
    }

    #[test]
    fn test_call_and_return() {
        // 200: call 206; 202: ld v1, 1; 204: jp 204; 206: ld v0, 9; 208: ret
        let mut i = with_program(&[
            0x22, 0x06, 0x61, 0x01, 0x12, 0x04, 0x60, 0x09, 0x00, 0xee,
        ]);
        i.step();
        assert_eq!(i.program_counter(), 0x206);
        assert_eq!(i.call_stack(), &[0x202]);
        run(&mut i, 2);
        assert_eq!(i.program_counter(), 0x202);
        assert!(i.call_stack().is_empty());
        run(&mut i, 3);
        assert_eq!(i.register(0), Some(9));
        assert_eq!(i.register(1), Some(1));
        assert_eq!(i.program_counter(), 0x204);
    }

    #[test]
    fn test_return_empty_stack_underflows() {
        let mut i = with_program(&[0x60, 0x01, 0x00, 0xee]);
        run(&mut i, 2);
        assert_eq!(
            i.fault(),
            Some(&Fault {
                kind: FaultKind::StackUnderflow,
                address: 0x202,
                opcode: 0x00ee
            })
        );
        assert_eq!(i.program_counter(), 0x202);
        assert_eq!(
            i.format_fault(),
            "stack underflow at 0x202 (opcode: 0x00ee)"
        );
    }

    #[test]
    fn test_skips() {
        // v0 = 3; se v0,3 (skip); ld v1,1 (skipped); sne v0,3 (no skip); ld v2,1
        let mut i = with_program(&[
            0x60, 0x03, 0x30, 0x03, 0x61, 0x01, 0x40, 0x03, 0x62, 0x01,
        ]);
        run(&mut i, 4);
        assert_eq!(i.register(1), Some(0));
        assert_eq!(i.register(2), Some(1));
        assert_eq!(i.program_counter(), 0x20a);
    }

    #[test]
    fn test_register_skips() {
        // v0 = v1 = 0: 5010 skips, 9010 doesn't
        let mut i = with_program(&[0x50, 0x10, 0x00, 0x00, 0x90, 0x10]);
        i.step();
        assert_eq!(i.program_counter(), 0x204);
        i.step();
        assert_eq!(i.program_counter(), 0x206);
    }

    #[test]
    fn test_skip_reg_with_nonzero_nibble_is_invalid() {
        let mut i = with_program(&[0x51, 0x21]);
        i.step();
        let f = i.fault().copied().unwrap();
        assert_eq!(f.kind, FaultKind::InvalidOpcode);
        assert_eq!(f.opcode, 0x5121);
        assert_eq!(f.address, 0x200);
        assert_eq!(i.program_counter(), 0x200);

        let mut i = with_program(&[0x00, 0xe0, 0x93, 0x4f]);
        run(&mut i, 2);
        let f = i.fault().copied().unwrap();
        assert_eq!((f.kind, f.address, f.opcode), (FaultKind::InvalidOpcode, 0x202, 0x934f));
    }

    #[test]
    fn test_halted_is_noop() {
        let mut i = with_program(&[0xff, 0xff, 0x60, 0x01]);
        i.step();
        assert!(i.is_halted());
        let before = snapshot(&i);
        run(&mut i, 10);
        assert_eq!(snapshot(&i), before);
    }

    #[test]
    fn test_bitwise() {
        let mut i = with_program(&[
            0x60, 0x0c, 0x61, 0x0a, // v0 = 1100b, v1 = 1010b
            0x82, 0x00, 0x82, 0x11, // v2 = v0 | v1
            0x83, 0x00, 0x83, 0x12, // v3 = v0 & v1
            0x84, 0x00, 0x84, 0x13, // v4 = v0 ^ v1
        ]);
        run(&mut i, 8);
        assert_eq!(i.register(2), Some(0x0e));
        assert_eq!(i.register(3), Some(0x08));
        assert_eq!(i.register(4), Some(0x06));
    }

    /// 6XKK 6YKK then the given 8XY? op
    fn alu(vx: u8, vy: u8, x: u8, y: u8, op: u8) -> Chip8Interpreter {
        let mut i = with_program(&[
            0x60 | x,
            vx,
            0x60 | y,
            vy,
            0x80 | x,
            (y << 4) | op,
        ]);
        run(&mut i, 3);
        assert!(!i.is_halted());
        i
    }

    #[test]
    fn test_add_reg_carry() {
        for (a, b) in [(0u8, 0u8), (1, 2), (200, 55), (200, 56), (255, 255), (128, 128)] {
            let i = alu(a, b, 1, 2, 0x4);
            assert_eq!(i.register(1), Some(a.wrapping_add(b)));
            assert_eq!(i.register(FLAG_REGISTER), Some((a as u16 + b as u16 > 255) as u8));
        }
    }

    #[test]
    fn test_sub_reg_borrow() {
        let i = alu(3, 10, 0, 1, 0x5);
        assert_eq!(i.register(0), Some(249));
        assert_eq!(i.register(FLAG_REGISTER), Some(0));

        let i = alu(10, 3, 0, 1, 0x5);
        assert_eq!(i.register(0), Some(7));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));

        let i = alu(5, 5, 0, 1, 0x5);
        assert_eq!(i.register(0), Some(0));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
    }

    #[test]
    fn test_sub_reg_same_register() {
        // VX - VX is always 0 with no borrow
        let mut i = with_program(&[0x63, 0x42, 0x83, 0x35]);
        run(&mut i, 2);
        assert_eq!(i.register(3), Some(0));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
    }

    #[test]
    fn test_flag_register_as_operand() {
        // VF as destination: flag wins over result
        let i = alu(3, 10, 0xf, 1, 0x5);
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
        let i = alu(200, 100, 0xf, 1, 0x4);
        assert_eq!(i.register(FLAG_REGISTER), Some(1));

        // VF as source: borrow uses the value before it was overwritten
        let i = alu(10, 3, 0, 0xf, 0x5);
        assert_eq!(i.register(0), Some(7));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
    }

    #[test]
    fn test_subn_reg() {
        let i = alu(10, 3, 0, 1, 0x7);
        assert_eq!(i.register(0), Some(249));
        assert_eq!(i.register(FLAG_REGISTER), Some(0));

        let i = alu(3, 10, 0, 1, 0x7);
        assert_eq!(i.register(0), Some(7));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
    }

    #[test]
    fn test_shift_right_reads_vy() {
        let i = alu(0x03, 0x10, 0, 1, 0x6);
        assert_eq!(i.register(0), Some(0x08));
        // lsb comes from VX
        assert_eq!(i.register(FLAG_REGISTER), Some(1));

        let i = alu(0x02, 0x11, 0, 1, 0x6);
        assert_eq!(i.register(0), Some(0x08));
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
    }

    #[test]
    fn test_shift_left_reads_vy() {
        let i = alu(0x80, 0x41, 0, 1, 0xe);
        assert_eq!(i.register(0), Some(0x82));
        assert_eq!(i.register(FLAG_REGISTER), Some(1));

        let i = alu(0x7f, 0xc1, 0, 1, 0xe);
        assert_eq!(i.register(0), Some(0x82));
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
    }

    #[test]
    fn test_jump_and_offset() {
        let mut i = with_program(&[0x60, 0x10, 0xb3, 0x00]);
        run(&mut i, 2);
        assert_eq!(i.program_counter(), 0x310);

        let mut i = with_program(&[0x60, 0xff, 0xbf, 0xff]);
        run(&mut i, 2);
        assert_eq!(i.program_counter(), (0xfff + 0xff) & 0xfff);

        let mut i = with_program(&[0x1a, 0xbc]);
        i.step();
        assert_eq!(i.program_counter(), 0xabc);
    }

    #[test]
    fn test_pc_wraps_at_top_of_ram() {
        let mut i = with_program(&[0x1f, 0xfe]);
        i.memory.write(&[0x60, 0x01], 0xffe);
        i.step();
        assert_eq!(i.program_counter(), 0xffe);
        i.step();
        assert_eq!(i.register(0), Some(1));
        assert_eq!(i.program_counter(), 0x000);
    }

    #[test]
    fn test_random_is_masked_and_seeded() {
        let prog = [0xc0, 0x0f, 0xc1, 0xff, 0xc2, 0x00];
        let mut a = with_program(&prog);
        let mut b = with_program(&prog);
        run(&mut a, 3);
        run(&mut b, 3);
        assert_eq!(a.registers(), b.registers());
        assert_eq!(a.registers()[0] & 0xf0, 0);
        assert_eq!(a.register(2), Some(0));
    }

    #[test]
    fn test_draw_wraps_columns() {
        // I = 0x300 holding 0xff; v0 = 60; draw 1 row at (v0, v1)
        let mut i = with_program(&[0xa3, 0x00, 0x60, 0x3c, 0xd0, 0x11]);
        i.memory.write_byte(0x300, 0xff);
        run(&mut i, 3);
        for x in [60, 61, 62, 63, 0, 1, 2, 3] {
            assert!(i.display().pixel(x, 0), "column {}", x);
        }
        assert_eq!(i.display().lit_count(), 8);
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
    }

    #[test]
    fn test_draw_twice_erases_and_flags() {
        let mut i = with_program(&[0x6f, 0x07, 0xa0, 0x0a, 0xd0, 0x05, 0xd0, 0x05]);
        run(&mut i, 3);
        // VF is reset even though it was 7 before
        assert_eq!(i.register(FLAG_REGISTER), Some(0));
        assert_eq!(i.display().lit_count(), 4 + 1 + 4 + 1 + 4);
        i.step();
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
        assert_eq!(i.display().lit_count(), 0);
    }

    #[test]
    fn test_draw_with_vf_as_coordinate() {
        // ld vf, 5 / ld I, 300 / drw vf, vf, 1
        let mut i = with_program(&[0x6f, 0x05, 0xa3, 0x00, 0xdf, 0xf1]);
        i.memory.write_byte(0x300, 0x80);
        run(&mut i, 3);
        assert!(i.display().pixel(0, 0));
        assert!(!i.display().pixel(5, 0));
        assert!(!i.display().pixel(5, 5));
        assert_eq!(i.display().lit_count(), 1);
        assert_eq!(i.register(FLAG_REGISTER), Some(0));

        // ld v0, 5 / ld vf, 9 / ld I, 300 / drw v0, vf, 1 twice
        let mut i = with_program(&[0x60, 0x05, 0x6f, 0x09, 0xa3, 0x00, 0xd0, 0xf1, 0xd0, 0xf1]);
        i.memory.write_byte(0x300, 0x80);
        run(&mut i, 4);
        assert!(i.display().pixel(5, 0));
        assert!(!i.display().pixel(5, 9));
        // the second draw reads VF = 0 again and erases the same pixel
        i.step();
        assert_eq!(i.display().lit_count(), 0);
        assert_eq!(i.register(FLAG_REGISTER), Some(1));
    }

    #[test]
    fn test_register_out_of_range() {
        let i = with_program(&[0x6f, 0x01]);
        assert_eq!(i.register(15), Some(0));
        assert_eq!(i.register(16), None);
    }

    #[test]
    fn test_draw_sprite_rows_wrap_memory() {
        let mut i = with_program(&[0xaf, 0xff, 0xd0, 0x02]);
        i.memory.write_byte(0xfff, 0x80);
        i.memory.write_byte(0x000, 0x80);
        run(&mut i, 2);
        assert!(i.display().pixel(0, 0));
        assert!(i.display().pixel(0, 1));
    }

    #[test]
    fn test_skip_key() {
        // v0 = 4; skp v0; ld v1,1; sknp v0; ld v2,1
        let mut i = with_program(&[
            0x60, 0x04, 0xe0, 0x9e, 0x61, 0x01, 0xe0, 0xa1, 0x62, 0x01,
        ]);
        i.key_down(4);
        run(&mut i, 2);
        assert_eq!(i.program_counter(), 0x206);
        i.key_up(4);
        i.step();
        assert_eq!(i.program_counter(), 0x20a);
        assert_eq!(i.register(1), Some(0));
        assert_eq!(i.register(2), Some(0));
    }

    #[test]
    fn test_skip_key_invalid() {
        let mut i = with_program(&[0x60, 0x10, 0xe0, 0xa1]);
        run(&mut i, 2);
        let f = i.fault().copied().unwrap();
        assert_eq!(f.kind, FaultKind::InvalidKey);
        assert_eq!(f.address, 0x202);
        assert_eq!(f.opcode, 0xe0a1);
    }

    #[test]
    fn test_timers() {
        let mut i = with_program(&[0x60, 0x02, 0xf0, 0x15, 0xf0, 0x18, 0xf1, 0x07]);
        run(&mut i, 3);
        assert_eq!(i.delay_timer(), 2);
        assert_eq!(i.sound_timer(), 2);
        i.decrement_timers();
        i.step();
        assert_eq!(i.register(1), Some(1));
        i.decrement_timers();
        i.decrement_timers();
        assert_eq!(i.delay_timer(), 0);
        assert_eq!(i.sound_timer(), 0);
    }

    #[test]
    fn test_wait_key() {
        let mut i = with_program(&[0xf5, 0x0a, 0x60, 0x01]);
        i.step();
        assert_eq!(i.pending_key_target(), Some(5));
        let before = snapshot(&i);
        run(&mut i, 5);
        assert_eq!(snapshot(&i), before);

        i.key_down(7);
        assert_eq!(i.register(5), Some(7));
        assert_eq!(i.pending_key_target(), None);
        // nothing executed yet
        assert_eq!(i.program_counter(), 0x202);
        i.step();
        assert_eq!(i.register(0), Some(1));
        assert_eq!(i.program_counter(), 0x204);
    }

    #[test]
    fn test_wait_key_ignores_held_key() {
        let mut i = with_program(&[0xf2, 0x0a]);
        i.key_down(3);
        i.step();
        assert!(i.is_awaiting_key());
        i.key_up(3);
        assert!(i.is_awaiting_key());
        i.key_down(3);
        assert!(!i.is_awaiting_key());
        assert_eq!(i.register(2), Some(3));
    }

    #[test]
    fn test_keys_out_of_range_ignored() {
        let mut i = with_program(&[0xf0, 0x0a]);
        i.step();
        i.key_down(16);
        i.key_up(200);
        assert!(i.is_awaiting_key());
        assert_eq!(i.key_state(), &[false; KEY_COUNT]);
    }

    #[test]
    fn test_add_to_addr_wraps() {
        let mut i = with_program(&[0xaf, 0xfe, 0x60, 0x03, 0xf0, 0x1e]);
        run(&mut i, 3);
        assert_eq!(i.address_register(), 0x001);
    }

    #[test]
    fn test_font_addr() {
        for d in 0..16u8 {
            let mut i = with_program(&[0x60, d, 0xf0, 0x29]);
            run(&mut i, 2);
            let addr = i.address_register() as usize;
            assert_eq!(addr, 5 * d as usize);
            assert_eq!(
                i.memory()[addr..addr + 5],
                memory::CHIP8_FONT[5 * d as usize..5 * d as usize + 5]
            );
        }
    }

    #[test]
    fn test_font_addr_invalid_digit() {
        let mut i = with_program(&[0x63, 0x10, 0xf3, 0x29]);
        run(&mut i, 2);
        assert_eq!(i.fault().map(|f| f.kind), Some(FaultKind::InvalidHexDigit));
        assert_eq!(
            i.format_fault(),
            "invalid hex digit at 0x202 (opcode: 0xf329)"
        );
    }

    #[test]
    fn test_store_bcd() {
        let mut i = with_program(&[0x60, 0xfe, 0xa3, 0x00, 0xf0, 0x33]);
        run(&mut i, 3);
        assert_eq!(i.memory()[0x300..0x303], [2, 5, 4]);
        assert_eq!(i.address_register(), 0x300);
    }

    #[test]
    fn test_store_and_load_regs() {
        let mut i = with_program(&[
            0x60, 0x11, 0x61, 0x22, 0x62, 0x33, // v0..v2
            0xa3, 0x00, 0xf2, 0x55, // store v0..v2 at 0x300
            0x60, 0x00, 0x61, 0x00, 0x62, 0x00, 0x63, 0x44, //
            0xa3, 0x00, 0xf3, 0x65, // load v0..v3
        ]);
        run(&mut i, 5);
        assert_eq!(i.memory()[0x300..0x304], [0x11, 0x22, 0x33, 0x00]);
        assert_eq!(i.address_register(), 0x303);
        run(&mut i, 6);
        assert_eq!(i.registers()[..4], [0x11, 0x22, 0x33, 0x00]);
        assert_eq!(i.address_register(), 0x304);
    }

    #[test]
    fn test_store_regs_wraps_i() {
        let mut i = with_program(&[0x60, 0xaa, 0x61, 0xbb, 0xaf, 0xff, 0xf1, 0x55]);
        run(&mut i, 4);
        assert_eq!(i.memory()[0xfff], 0xaa);
        assert_eq!(i.memory()[0x000], 0xbb);
        assert_eq!(i.address_register(), 0x001);
    }

    #[test]
    fn test_unknown_groups_invalid() {
        for word in [0x0000u16, 0x8008, 0xe000, 0xf0ff] {
            let mut i = with_program(&word.to_be_bytes());
            i.step();
            assert_eq!(i.fault().map(|f| f.opcode), Some(word));
        }
    }
}
