use crate::state::Keypad;
use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// map of keys read from the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
pub const LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
pub const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
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

/// Input writes key state into the keypad and reads nothing else.
pub trait Input {
    /// bring the keypad up to date with whatever has happened since the last
    /// poll
    fn poll(&mut self, keypad: &mut Keypad) -> Result<(), io::Error>;

    /// has the user asked to stop
    fn quit_requested(&self) -> bool;
}

/// keyboard input from the terminal, using crossterm in raw mode.
///
/// terminals only report presses, never releases, so a key counts as held
/// for the poll after it was seen and released on the one after that
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new(keymap: &[(char, u8)]) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: keymap.iter().copied().collect(),
            quit: false,
        })
    }

    fn map_key(&self, key: char) -> Option<u8> {
        self.keymap.get(&key.to_ascii_lowercase()).copied()
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Warning: couldn't restore terminal: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<(), io::Error> {
        keypad.release_all();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Char(key) => match self.map_key(key) {
                        Some(mapped_key) => keypad.press(mapped_key),
                        None => {
                            eprintln!("Warning: can't map {:?} to a COSMAC key", key);
                        }
                    },
                    KeyCode::Esc => self.quit = true,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; presses the keys it was given on
/// the next poll, then nothing
pub struct DummyInput {
    keys: Vec<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            keys: Vec::from(keys),
        }
    }
}

impl Input for DummyInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<(), io::Error> {
        keypad.release_all();
        for key in self.keys.drain(..) {
            keypad.press(key);
        }
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Chip8State;

    #[test]
    fn test_keymaps_cover_every_key() {
        for keymap in [LITERAL_KEYMAP, CONVENTIONAL_KEYMAP] {
            let mut seen = [false; 16];
            for (_, k) in keymap {
                seen[k as usize] = true;
            }
            assert!(seen.iter().all(|s| *s));
        }
    }

    #[test]
    fn test_dummy_writes_only_keypad() -> Result<(), io::Error> {
        let mut s = Chip8State::new();
        let mut input = DummyInput::new(&[0x1, 0xc]);
        input.poll(&mut s.keypad)?;

        assert!(s.keypad.is_pressed(0x1));
        assert!(s.keypad.is_pressed(0xc));
        assert!(!s.keypad.is_pressed(0x0));

        let mut expected = Chip8State::new();
        expected.keypad = s.keypad;
        assert_eq!(s, expected);
        Ok(())
    }

    #[test]
    fn test_dummy_releases_on_next_poll() -> Result<(), io::Error> {
        let mut keypad = Keypad::new();
        let mut input = DummyInput::new(&[0x5]);
        input.poll(&mut keypad)?;
        assert_eq!(keypad.first_pressed(), Some(0x5));
        input.poll(&mut keypad)?;
        assert_eq!(keypad.first_pressed(), None);
        assert!(!input.quit_requested());
        Ok(())
    }
}
