use crate::loader::LoadError;
use std::error::Error;
use std::fmt;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// where the program is loaded
pub const START_ADDRESS: u16 = 0x0200;

/// where the hex digit glyphs live; ROMs look for them here
pub const FONTSET_START_ADDRESS: u16 = 0x0050;
pub const FONTSET_SIZE: usize = 80;

/// bytes per glyph
pub const GLYPH_SIZE: usize = 5;

/// everything from 0x200 to the top of RAM is available to a program
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - START_ADDRESS as usize;

/// a write that would run off the top of RAM
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryError {
    OutOfRange { addr: u16, len: usize },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfRange { addr, len } => write!(
                f,
                "{} bytes at {:#05x} runs past the end of memory",
                len, addr
            ),
        }
    }
}

impl Error for MemoryError {}

/// Byte-addressed access to a memory image. Everything except the slice
/// accessors has a default implementation.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM", refusing anything that would run off
    /// the end. nothing is written unless all of it fits
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), MemoryError> {
        if addr as usize + data.len() > MEMORY_SIZE {
            return Err(MemoryError::OutOfRange {
                addr,
                len: data.len(),
            });
        }
        self.get_rw_slice(addr, data.len()).copy_from_slice(data);
        Ok(())
    }

    fn read_byte(&self, addr: u16) -> u8 {
        self.get_ro_slice(addr, 1)[0]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.get_rw_slice(addr, 1)[0] = value;
    }

    /// get a two-byte big-endian word (opcodes, stack)
    fn get_word(&self, addr: u16) -> u16 {
        let word = self.get_ro_slice(addr, 2);
        ((word[0] as u16) << 8) + (word[1] as u16)
    }

    /// get a r/w slice of the underlying memory; panics when out of range
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory; panics when out of range
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// The CHIP-8 memory map
///
///   0x0000-0x01ff  interpreter (reserved)
///   0x0050-0x009f  hex digit glyphs 0-F
///   0x0200-0x0fff  program and runtime data
///
/// Only the glyphs and a loaded program are written by this crate; the
/// reserved region is otherwise left zeroed.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl MemoryMap for Memory {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let a = addr as usize;
        &mut self.bytes[a..(a + len)]
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 4k of bytes is no use to anyone in a panic message
        let used = self.bytes.iter().filter(|b| **b != 0).count();
        f.debug_struct("Memory")
            .field("size", &MEMORY_SIZE)
            .field("non_zero_bytes", &used)
            .finish()
    }
}

impl Memory {
    /// zeroed RAM with the glyphs baked in
    pub fn new() -> Self {
        let mut mm = Memory {
            bytes: [0u8; MEMORY_SIZE],
        };
        mm.load_glyphs();
        mm
    }

    fn load_glyphs(&mut self) {
        let a = FONTSET_START_ADDRESS as usize;
        self.bytes[a..(a + FONTSET_SIZE)].copy_from_slice(&FONTSET);
    }

    /// copy a CHIP-8 program in at 0x200. a program that doesn't fit is
    /// rejected before anything is written
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let too_large = LoadError::ProgramTooLarge {
            size: program.len(),
            max: MAX_PROGRAM_SIZE,
        };
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(too_large);
        }
        self.write(START_ADDRESS, program).map_err(|_| too_large)
    }

    /// the whole image, for anything that wants to scan it
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// address of the sprite for hex digit `digit` (low nibble only)
pub fn glyph_address(digit: u8) -> u16 {
    FONTSET_START_ADDRESS + (GLYPH_SIZE as u16) * (digit & 0x0f) as u16
}

pub const FONTSET: [u8; FONTSET_SIZE] = [
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_region_zeroed_except_glyphs() {
        let m = Memory::new();
        assert_eq!(m.bytes[..0x50], [0; 0x50]);
        assert_eq!(m.bytes[0xa0..0x200], [0; 0x160]);
    }

    #[test]
    fn test_program_region_zeroed() {
        let m = Memory::new();
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_glyphs_loaded() {
        let m = Memory::new();
        for (i, b) in FONTSET.iter().enumerate() {
            assert_eq!(m.read_byte(FONTSET_START_ADDRESS + i as u16), *b);
        }
        assert_eq!(m.read_byte(0x050), 0xf0);
        assert_eq!(m.read_byte(0x09f), 0x80);
    }

    #[test]
    fn test_glyph_address() {
        assert_eq!(glyph_address(0x0), 0x050);
        assert_eq!(glyph_address(0xa), 0x082);
        assert_eq!(glyph_address(0xf), 0x09b);
        // only the low nibble counts
        assert_eq!(glyph_address(0x1f), 0x09b);
    }

    #[test]
    fn test_write_slice_ok() -> Result<(), MemoryError> {
        let mut dst = Memory::new();
        dst.write(0x300, &[0, 1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(dst.get_ro_slice(0x2fc, 12), &[0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_write_to_top_of_ram() -> Result<(), MemoryError> {
        let mut dst = Memory::new();
        dst.write(0xffe, &[0xaa, 0xbb])?;
        assert_eq!(dst.get_word(0xffe), 0xaabb);
        Ok(())
    }

    #[test]
    fn test_write_past_top_rejected_untouched() {
        let mut dst = Memory::new();
        let res = dst.write(0xffc, &[1; 8]);
        assert_eq!(res, Err(MemoryError::OutOfRange { addr: 0xffc, len: 8 }));
        assert_eq!(dst.get_ro_slice(0xffc, 4), &[0; 4]);
        assert_eq!(
            res.unwrap_err().to_string(),
            "8 bytes at 0xffc runs past the end of memory"
        );
    }

    #[test]
    fn test_read_write_byte() {
        let mut m = Memory::new();
        m.write_byte(0x234, 0x5a);
        assert_eq!(m.read_byte(0x234), 0x5a);
    }

    #[test]
    fn test_read_word() {
        let mut m = Memory::new();
        m.write_byte(0x204, 0x04);
        m.write_byte(0x205, 0x05);
        assert_eq!(m.get_word(0x204), 0x0405);
    }

    #[test]
    #[should_panic]
    fn test_read_too_much_panic() {
        let m = Memory::new();
        let _ = m.get_ro_slice(4089, 8);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), LoadError> {
        let mut dst = Memory::new();
        dst.load_program(&[0x00, 0xe0])?; // clear screen
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
        assert_eq!(dst.read_byte(0x202), 0);
        Ok(())
    }

    #[test]
    fn test_program_load_max_size() -> Result<(), LoadError> {
        let mut dst = Memory::new();
        dst.load_program(&[0x11; MAX_PROGRAM_SIZE])?;
        assert_eq!(dst.read_byte(0x200), 0x11);
        assert_eq!(dst.read_byte(0xfff), 0x11);
        Ok(())
    }

    #[test]
    fn test_program_load_too_big() {
        let mut dst = Memory::new();
        let res = dst.load_program(&[0x11; MAX_PROGRAM_SIZE + 1]);
        assert!(matches!(
            res,
            Err(LoadError::ProgramTooLarge { size: 3585, max: 3584 })
        ));
        assert_eq!(dst.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_debug_is_short() {
        let m = Memory::new();
        let s = format!("{:?}", m);
        assert!(s.contains("non_zero_bytes"));
        assert!(s.len() < 100);
    }
}
