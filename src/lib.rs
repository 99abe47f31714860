//! # chip8-core
//!
//! The state of a CHIP-8 machine and the code that brings it up.
//!
//! ## Design
//!
//! * one owned `Chip8State` per session; nothing global. collaborators take
//!   a reference to the part they work on
//! * memory is a fixed 4k image; glyphs go in at 0x050 when the state is
//!   created, a program goes in at 0x200 when asked
//! * a program that doesn't fit is rejected outright, never truncated, and
//!   never half-copied
//! * display and input are traits, so the terminal implementations can be
//!   swapped out (or dummied for tests)
//!
//! Model
//!
//! Session
//!  |-- Chip8State::new()             // registers, stack, timers zeroed; PC = 0x200
//!  |    `-- Memory::new()            // glyphs copied to 0x050
//!  |-- loader::load_program(path)    // program copied to 0x200, or LoadError
//!  `-- main loop (not here yet: fetch/decode/execute, timers)
//!       |-- input.poll(&mut state.keypad)       // writes keys only
//!       `-- display.draw(&state.framebuffer)    // reads pixels only
pub mod display;
pub mod input;
pub mod loader;
pub mod memory;
pub mod state;

pub use loader::{load_program, load_program_from, LoadError};
pub use memory::{Memory, MemoryError, MemoryMap};
pub use state::{Chip8State, Framebuffer, Keypad};
