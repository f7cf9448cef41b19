//! Core types for `Tessera`.
//!
//! This crate provides the building blocks shared by the other Tessera crates:
//!
//! - [`color`]: RGBA colors, parsed from hex strings or names
//! - [`tile`]: partial tile styles and field-wise merging
//! - [`geometry`]: inclusive tile boxes (viewports), padding, clamping
//! - [`matrix`]: a resizable row-major grid
//! - [`error`]: error types for the core library
//!
//! # Examples
//!
//! ```
//! use tessera_core::{Color, Tile, Viewport};
//!
//! let screen = Viewport::from_size(0, 0, 40, 20);
//! let panel = Viewport::new(35, 2, 44, 6);
//! let visible = screen.intersection(panel);
//! assert_eq!(visible, Viewport::new(35, 2, 39, 6));
//!
//! let mut tile = Tile::new().with_char('#').with_fg(Color::WHITE);
//! assert!(tile.merge(&Tile::new().with_bg(Color::BLUE)));
//! assert_eq!(tile.ch, Some('#'));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]

pub mod color;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod tile;

pub use color::Color;
pub use error::{ColorParseError, Error, Result};
pub use geometry::{clamp, is_inside_box, Padding, PaddingPatch, Viewport};
pub use matrix::Matrix;
pub use tile::Tile;
