//! Terminal output for Tessera.
//!
//! This crate puts Tessera surfaces on a terminal:
//! - [`CrosstermBackend`], a [`PaintBackend`](tessera_buffer::PaintBackend)
//!   writing crossterm commands to any writer
//! - [`Terminal`], which switches the terminal to full-screen mode and reads
//!   normalized input events
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tessera_buffer::{BufferOptions, TileBuffer};
//! use tessera_core::Tile;
//! use tessera_terminal::Terminal;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut terminal = Terminal::new();
//!     terminal.enter()?;
//!
//!     let options = terminal.fit(BufferOptions::default().with_tile_size(1, 1))?;
//!     let mut buffer = TileBuffer::new(&options, Box::new(terminal.backend()))?;
//!     buffer.set_tile(1, 1, &Tile::new().with_char('@'));
//!     buffer.render()?;
//!
//!     while terminal.read_input(Duration::from_millis(100), 1, 1)?.is_none() {}
//!     Ok(())
//! }
//! ```

mod backend;
mod terminal;

pub use backend::CrosstermBackend;
pub use terminal::Terminal;
