//! Crossterm paint backend.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color as CrosstermColor, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tessera_buffer::{GhostPaint, PaintBackend, PaintCell};
use tessera_core::{Color, Error, Result};

/// Paints tile buffers on a terminal.
///
/// Each tile maps to one terminal cell at `(col, row)`. The pixel position
/// and glyph offsets of the tile are ignored, and so is its font. Commands
/// are queued on `W` and flushed once per render.
///
/// A terminal cell holds one glyph, so a decaying glyph is only shown while
/// the new tile has none; its color fades into the cell background.
pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
}

impl CrosstermBackend<Stdout> {
    /// Creates a backend writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    /// Creates a backend writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the backend, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Converts a Color to crossterm's Color type.
    ///
    /// Fully transparent colors map to the terminal default.
    #[inline]
    fn to_crossterm_color(color: Color) -> CrosstermColor {
        if color.a <= 0.0 {
            return CrosstermColor::Reset;
        }
        let (r, g, b) = color.to_rgb_u8();
        CrosstermColor::Rgb { r, g, b }
    }

    fn ghost_glyph(ghost: GhostPaint<'_>, background: Color) -> Option<(char, Color)> {
        let ch = ghost.tile.ch?;
        let base = if background.a <= 0.0 {
            Color::BLACK
        } else {
            background
        };
        let fg = ghost
            .tile
            .fg
            .unwrap_or(Color::WHITE)
            .multiply_alpha(ghost.opacity)
            .blend_over(base);
        Some((ch, fg))
    }
}

impl<W: Write> PaintBackend for CrosstermBackend<W> {
    fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        queue!(self.out, Clear(ClearType::All)).map_err(Error::Io)
    }

    fn paint(&mut self, cell: &PaintCell<'_>) -> Result<()> {
        let (Ok(col), Ok(row)) = (u16::try_from(cell.col), u16::try_from(cell.row)) else {
            return Err(Error::InvalidDimensions(format!(
                "cell ({}, {}) does not fit a terminal",
                cell.col, cell.row
            )));
        };

        let tile = cell.tile;
        let background = tile.bg.unwrap_or(Color::TRANSPARENT);
        let (glyph, foreground) = match (tile.ch, cell.ghost) {
            (Some(ch), _) => (ch, tile.fg.unwrap_or(Color::TRANSPARENT)),
            (None, Some(ghost)) => {
                Self::ghost_glyph(ghost, background).unwrap_or((' ', Color::TRANSPARENT))
            }
            (None, None) => (' ', Color::TRANSPARENT),
        };

        queue!(
            self.out,
            MoveTo(col, row),
            SetBackgroundColor(Self::to_crossterm_color(background)),
            SetForegroundColor(Self::to_crossterm_color(foreground)),
            Print(glyph)
        )
        .map_err(Error::Io)
    }

    fn present(&mut self) -> Result<()> {
        self.out.flush().map_err(Error::Io)
    }
}
