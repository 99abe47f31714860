use crate::state::Framebuffer;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display puts a framebuffer on a screen. It only ever gets to look at the
/// framebuffer, never change it, so a variety of kinds of screen can be
/// plugged in without the rest of the machine caring.
pub trait Display {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    // y is flipped so row 0 is at the top of the canvas
    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// expand one bitplane (lit or unlit) into x, y float coords, suitable
    /// for rendering with TUI
    fn bitplane_from_frame<'a>(
        &self,
        frame: &'a Framebuffer,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        frame
            .pixels()
            .iter()
            .enumerate()
            .filter(move |(_, on)| **on == lit)
            .map(move |(n, _)| {
                (
                    (n % w) as f64,        // x
                    -1.0 * (n / w) as f64, // y
                )
            })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(Framebuffer::WIDTH, Framebuffer::HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        debug_assert_eq!(frame.pixels().len(), self.resolution.pixel_count());
        let resolution = &self.resolution;

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);
            let off = resolution.bitplane_from_frame(frame, false).collect::<Vec<_>>();
            let on = resolution.bitplane_from_frame(frame, true).collect::<Vec<_>>();

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; counts frames and remembers the
/// last one it was shown
pub struct DummyDisplay {
    pub frames: usize,
    pub last_lit: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay {
            frames: 0,
            last_lit: 0,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last_lit = frame.lit_pixels().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Chip8State;

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_blank_frame_is_all_unlit() {
        let r = Resolution(64, 32);
        let fb = Framebuffer::new();
        assert_eq!(r.bitplane_from_frame(&fb, false).count(), 2048);
        assert_eq!(r.bitplane_from_frame(&fb, true).count(), 0);
    }

    #[test]
    fn test_lit_pixel_coords() {
        let r = Resolution(64, 32);
        let mut fb = Framebuffer::new();
        fb.set(5, 7, true);
        fb.set(63, 31, true);
        let on = r.bitplane_from_frame(&fb, true).collect::<Vec<_>>();
        assert_eq!(on, vec![(5.0, -7.0), (63.0, -31.0)]);
    }

    // DummyDisplay tests
    #[test]
    fn test_dummy_draws_state_framebuffer() -> Result<(), io::Error> {
        let mut s = Chip8State::new();
        let mut d = DummyDisplay::new();
        d.draw(&s.framebuffer)?;
        s.framebuffer.set(1, 1, true);
        d.draw(&s.framebuffer)?;
        assert_eq!(d.frames, 2);
        assert_eq!(d.last_lit, 1);
        Ok(())
    }

    #[test]
    #[ignore]
    // NB. figure out how to stop rendering during tests
    fn test_draw_blank_frame() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::new()?;
        d.draw(&Framebuffer::new())
    }
}
