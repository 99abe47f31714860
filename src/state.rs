//! # state
//!
//! Everything a CHIP-8 program can see or touch:
//!  * 4k of memory, glyphs at 0x050, program at 0x200
//!  * V0-VF general purpose registers; VF doubles as the carry/flag output
//!  * I, a 16bit address register
//!  * PC, the address of the next instruction to fetch
//!  * the opcode most recently fetched from PC
//!  * a 16 level stack of return addresses, and SP indexing it
//!  * delay and sound timers, decremented at 60Hz by whoever runs the clock
//!  * a 16 key hex keypad, written by an input driver
//!  * a 64x32 monochrome framebuffer, read by a display driver
//!
//! All of it is public so an execution engine can take `&mut Chip8State` and
//! get on with it.

use crate::loader::{self, LoadError};
use crate::memory::{Memory, START_ADDRESS};
use std::path::Path;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// index of the flag register
pub const VF: usize = 0x0f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8State {
    pub memory: Memory,
    pub registers: [u8; REGISTER_COUNT],
    pub index: u16,
    pub pc: u16,
    /// last instruction word fetched; nothing is fetched yet so it stays 0
    pub opcode: u16,
    pub stack: [u16; STACK_DEPTH],
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keypad: Keypad,
    pub framebuffer: Framebuffer,
}

impl Default for Chip8State {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8State {
    /// power-on state: everything zeroed apart from the glyphs and PC
    pub fn new() -> Self {
        Chip8State {
            memory: Memory::new(),
            registers: [0; REGISTER_COUNT],
            index: 0x0000,
            pc: START_ADDRESS,
            opcode: 0x0000,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
        }
    }

    /// load a chip8 program from a file; returns how many bytes were loaded
    pub fn load_program(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        loader::load_program(self, path)
    }
}

/// 16 keys, 0x0-0xF. non-zero means held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    pub keys: [u8; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [0; KEY_COUNT],
        }
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0x0f) as usize] = 1;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0x0f) as usize] = 0;
    }

    pub fn release_all(&mut self) {
        self.keys = [0; KEY_COUNT];
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize] != 0
    }

    /// first key held down, lowest first
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|k| *k != 0).map(|k| k as u8)
    }
}

/// 64x32 monochrome display memory, row-major. true is lit
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("lit", &self.lit_pixels().count())
            .finish()
    }
}

impl Framebuffer {
    pub const WIDTH: usize = DISPLAY_WIDTH;
    pub const HEIGHT: usize = DISPLAY_HEIGHT;

    pub fn new() -> Self {
        Framebuffer {
            pixels: [false; Self::WIDTH * Self::HEIGHT],
        }
    }

    // sprites wrap at the screen edges, so coordinates do too
    fn offset(x: usize, y: usize) -> usize {
        (y % Self::HEIGHT) * Self::WIDTH + (x % Self::WIDTH)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[Self::offset(x, y)] = on;
    }

    pub fn clear(&mut self) {
        self.pixels = [false; Self::WIDTH * Self::HEIGHT];
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// (x, y) of every lit pixel, scanning rows from the top
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(n, _)| (n % Self::WIDTH, n / Self::WIDTH))
    }
}
