//! Terminal session management.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen},
};
use tessera_buffer::BufferOptions;
use tessera_core::{Error, Result};
use tessera_input::{from_crossterm, InputEvent};
use tracing::{debug, warn};

use crate::backend::CrosstermBackend;

/// Owns the terminal modes a full-screen Tessera UI needs.
///
/// [`Terminal::enter`] switches to raw mode and the alternate screen, hides
/// the cursor and enables mouse and focus reporting. [`Terminal::leave`]
/// undoes it, and so does dropping the value.
pub struct Terminal {
    stdout: Stdout,
    in_raw_mode: bool,
    in_alternate_screen: bool,
    mouse_captured: bool,
    cursor_hidden: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// Creates a session. The terminal is left untouched until `enter`.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            in_raw_mode: false,
            in_alternate_screen: false,
            mouse_captured: false,
            cursor_hidden: false,
        }
    }

    /// Enters full-screen mode.
    pub fn enter(&mut self) -> Result<()> {
        if !self.in_raw_mode {
            enable_raw_mode().map_err(Error::Io)?;
            self.in_raw_mode = true;
        }
        if !self.in_alternate_screen {
            execute!(self.stdout, EnterAlternateScreen).map_err(Error::Io)?;
            self.in_alternate_screen = true;
        }
        if !self.mouse_captured {
            execute!(self.stdout, EnableMouseCapture, EnableFocusChange).map_err(Error::Io)?;
            self.mouse_captured = true;
        }
        if !self.cursor_hidden {
            execute!(self.stdout, Hide).map_err(Error::Io)?;
            self.cursor_hidden = true;
        }
        debug!("terminal entered full-screen mode");
        Ok(())
    }

    /// Restores the terminal.
    pub fn leave(&mut self) -> Result<()> {
        if self.cursor_hidden {
            execute!(self.stdout, Show).map_err(Error::Io)?;
            self.cursor_hidden = false;
        }
        if self.mouse_captured {
            execute!(self.stdout, DisableFocusChange, DisableMouseCapture).map_err(Error::Io)?;
            self.mouse_captured = false;
        }
        if self.in_alternate_screen {
            execute!(self.stdout, LeaveAlternateScreen).map_err(Error::Io)?;
            self.in_alternate_screen = false;
        }
        if self.in_raw_mode {
            disable_raw_mode().map_err(Error::Io)?;
            self.in_raw_mode = false;
        }
        Ok(())
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        size().map_err(Error::Io)
    }

    /// `options` sized to fill the terminal.
    pub fn fit(&self, options: BufferOptions) -> Result<BufferOptions> {
        let (cols, rows) = self.size()?;
        Ok(options.with_size(u32::from(cols), u32::from(rows)))
    }

    /// A paint backend drawing on this terminal.
    pub fn backend(&self) -> CrosstermBackend<Stdout> {
        CrosstermBackend::stdout()
    }

    /// Waits up to `timeout` for a terminal event and normalizes it.
    ///
    /// Returns `None` on timeout and for events with no Tessera equivalent
    /// (scrolling, paste, terminal resize).
    pub fn read_input(
        &self,
        timeout: Duration,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Option<InputEvent>> {
        if !event::poll(timeout).map_err(Error::Io)? {
            return Ok(None);
        }
        let event = event::read().map_err(Error::Io)?;
        Ok(from_crossterm(&event, tile_width, tile_height))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!(%err, "failed to restore the terminal");
        }
    }
}
