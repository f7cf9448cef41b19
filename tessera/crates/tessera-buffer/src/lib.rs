//! Tile buffers for Tessera.
//!
//! This crate holds the drawing side of a surface:
//!
//! - [`TileBuffer`] - A grid of cells with a viewport stack and dirty tracking
//! - [`Cell`] - One buffer cell: pixel position, tile and decay state
//! - [`PaintBackend`] - The trait a buffer flushes its dirty cells to
//! - [`RecordingBackend`] - A headless backend that records every call
//! - [`BufferOptions`] - Buffer size, tile size, clear style and decay
//!
//! # Architecture
//!
//! Writes never reach the backend directly:
//!
//! 1. **Write**: [`TileBuffer::set_tile`] merges a partial tile into a cell,
//!    clipped to the active viewport. Only cells that really changed are
//!    queued.
//!
//! 2. **Flush**: [`TileBuffer::render`] paints the queued cells, in the order
//!    they were queued, and empties the queue.
//!
//! 3. **Decay** (optional): replaced glyphs fade out over a few frames. The
//!    host calls [`TileBuffer::decay_frame`] with the handle returned by
//!    [`TileBuffer::pending_frame`].
//!
//! # Examples
//!
//! ```
//! use tessera_buffer::{BufferOptions, RecordingBackend, TileBuffer};
//! use tessera_core::Tile;
//!
//! let backend = RecordingBackend::new();
//! let log = backend.log();
//! let mut buffer = TileBuffer::new(&BufferOptions::default(), Box::new(backend)).unwrap();
//! assert_eq!(log.borrow().cells.len(), 40 * 20);
//!
//! buffer.set_tile(3, 4, &Tile::new().with_char('@'));
//! buffer.render().unwrap();
//! assert_eq!(log.borrow().cells.len(), 40 * 20 + 1);
//! ```

pub mod buffer;
pub mod cell;
pub mod config;
pub mod decay;
pub mod error;
pub mod paint;

pub use buffer::TileBuffer;
pub use cell::Cell;
pub use config::{default_clear_style, BufferOptions};
pub use decay::FrameHandle;
pub use error::{BufferError, BufferResult};
pub use paint::{GhostPaint, PaintBackend, PaintCell, PaintLog, PaintLogHandle, PaintRecord, RecordingBackend};
