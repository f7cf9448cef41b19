//! Tessera: a tile-grid rendering toolkit for Rust
//!
//! This crate bundles the Tessera crates:
//! - [`core`]: colors, tiles, boxes and viewports
//! - [`buffer`]: the tile buffer with dirty tracking and decay
//! - [`input`]: normalized mouse and key events
//! - [`scene`]: the node tree, elements, focus and compositing
//! - [`terminal`]: a crossterm paint backend
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tessera::prelude::*;
//! use tessera::terminal::Terminal;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut terminal = Terminal::new();
//!     terminal.enter()?;
//!
//!     let mut scene = Scene::new();
//!     let options = terminal.fit(BufferOptions::default().with_tile_size(1, 1))?;
//!     let surface = scene.create_surface(&options, Box::new(terminal.backend()))?;
//!
//!     let button = scene.create_element(
//!         ElementOptions::new().at(2, 1).size(8, 1).focusable().parent(surface),
//!     )?;
//!     for (col, ch) in "[ quit ]".chars().enumerate() {
//!         scene.set_content_tile(button, col as i32, 0, Tile::new().with_char(ch));
//!     }
//!
//!     scene.render(surface)?;
//!     while let Some(input) = terminal.read_input(Duration::from_secs(5), 1, 1)? {
//!         scene.dispatch_input(surface, input)?;
//!         scene.render(surface)?;
//!     }
//!     Ok(())
//! }
//! ```

pub use tessera_buffer as buffer;
pub use tessera_core as core;
pub use tessera_input as input;
pub use tessera_scene as scene;
pub use tessera_terminal as terminal;

/// Common imports.
pub mod prelude {
    pub use tessera_buffer::{BufferOptions, PaintBackend, TileBuffer};
    pub use tessera_core::{Color, Padding, PaddingPatch, Tile, Viewport};
    pub use tessera_input::{input_match, InputDefinition, InputEvent, Modifiers};
    pub use tessera_scene::{
        ElementBehavior, ElementOptions, Event, EventKind, NodeId, Scene, SceneError,
    };
}
