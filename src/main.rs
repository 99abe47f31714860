use std::env;
use std::error::Error;
use std::process;
use std::time::Duration;

use chip8_core::display::{Display, MonoTermDisplay};
use chip8_core::input::{Input, StdinInput, CONVENTIONAL_KEYMAP, LITERAL_KEYMAP};
use chip8_core::Chip8State;

/// one frame at 60Hz
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn usage() -> ! {
    eprintln!("usage: chip8-core <rom> [--literal-keys]");
    process::exit(2);
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut rom = None;
    let mut keymap: &[(char, u8)] = &CONVENTIONAL_KEYMAP;
    for arg in env::args().skip(1) {
        if arg == "--literal-keys" {
            keymap = &LITERAL_KEYMAP;
        } else if arg == "-h" || arg == "--help" || rom.is_some() {
            usage();
        } else {
            rom = Some(arg);
        }
    }
    let rom = rom.unwrap_or_else(|| usage());

    // initialise
    let mut state = Chip8State::new();
    match state.load_program(&rom) {
        Ok(len) => eprintln!("loaded {} bytes from {} at 0x200", len, rom),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    // nothing executes yet, so this just shows the screen and tracks the
    // keypad until Esc
    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new(keymap)?;
    while !input.quit_requested() {
        input.poll(&mut state.keypad)?;
        display.draw(&state.framebuffer)?;
        spin_sleep::sleep(FRAME_TIME);
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    drop(input);
    for _ in 0..(2 + chip8_core::Framebuffer::HEIGHT) {
        println!();
    }
    Ok(())
}
