//! # `Tessera` Input
//!
//! Normalized input events for tile surfaces.
//!
//! ## Features
//!
//! - **Payloads**: [`MouseEventData`] carries both the pixel and the tile
//!   position of the pointer; [`KeyEventData`] carries DOM style key names.
//!
//! - **Matching**: [`input_match`] checks an event against a list of partial
//!   [`InputDefinition`]s, which can be loaded from TOML.
//!
//! - **Crossterm**: [`from_crossterm`] turns terminal events into
//!   [`InputEvent`]s, ready to be dispatched to a scene.
//!
//! ## Quick Start
//!
//! ```
//! use tessera_input::{input_match, InputDefinition, InputEvent, KeyEventKind, from_crossterm};
//! use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
//!
//! let event = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
//! let bindings = [InputDefinition::key("Tab").shift(false)];
//!
//! if let Some(InputEvent::Key(KeyEventKind::KeyDown, data)) = from_crossterm(&event, 12, 16) {
//!     assert!(input_match(&bindings, &data));
//! }
//! ```

pub mod event;
pub mod matcher;
pub mod normalize;

pub use event::{InputEvent, KeyEventData, KeyEventKind, Modifiers, MouseEventData, MouseEventKind};
pub use matcher::{input_match, InputData, InputDefinition};
pub use normalize::from_crossterm;
