//! Buffer options.
//!
//! Options can be built in code or loaded from TOML. Every field has a
//! default, so an empty document yields a 40x20 buffer of 12x16 pixel tiles.
//!
//! ```toml
//! cols = 80
//! rows = 24
//! decay_ms = 250
//!
//! [clear_style]
//! bg = "#101010"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera_core::{Color, Tile};

use crate::error::{BufferError, BufferResult};

/// Options used to build a [`TileBuffer`](crate::TileBuffer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferOptions {
    /// Width of one tile, in pixels.
    #[serde(default = "default_tile_width")]
    pub tile_width: u32,

    /// Height of one tile, in pixels.
    #[serde(default = "default_tile_height")]
    pub tile_height: u32,

    /// Number of columns.
    #[serde(default = "default_cols")]
    pub cols: u32,

    /// Number of rows.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Style written by `clear` and used for new cells on resize.
    ///
    /// Fields given in the document are applied over the default clear style.
    #[serde(
        default = "default_clear_style",
        deserialize_with = "clear_style_over_default"
    )]
    pub clear_style: Tile,

    /// Duration of the glyph decay effect, in milliseconds. Disabled if unset.
    #[serde(default)]
    pub decay_ms: Option<u64>,
}

fn default_tile_width() -> u32 {
    12
}

fn default_tile_height() -> u32 {
    16
}

fn default_cols() -> u32 {
    40
}

fn default_rows() -> u32 {
    20
}

/// Default clear style: no glyph, light grey on black.
pub fn default_clear_style() -> Tile {
    Tile {
        ch: None,
        font: Some("bold 12px Courier New".to_string()),
        offset_x: Some(2),
        offset_y: Some(-1),
        fg: Some(Color::from_rgb_u8(0xcc, 0xcc, 0xcc)),
        bg: Some(Color::BLACK),
    }
}

fn clear_style_over_default<'de, D>(deserializer: D) -> Result<Tile, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let patch = Tile::deserialize(deserializer)?;
    Ok(default_clear_style().merged(&patch))
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            tile_width: default_tile_width(),
            tile_height: default_tile_height(),
            cols: default_cols(),
            rows: default_rows(),
            clear_style: default_clear_style(),
            decay_ms: None,
        }
    }
}

impl BufferOptions {
    /// Parses options from a TOML document and validates them.
    pub fn from_toml_str(content: &str) -> BufferResult<Self> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and parses options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Sets the grid size.
    pub fn with_size(mut self, cols: u32, rows: u32) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Sets the tile size in pixels.
    pub fn with_tile_size(mut self, tile_width: u32, tile_height: u32) -> Self {
        self.tile_width = tile_width;
        self.tile_height = tile_height;
        self
    }

    /// Enables the decay effect.
    pub fn with_decay(mut self, duration: Duration) -> Self {
        self.decay_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Decay duration, if the effect is enabled.
    pub fn decay(&self) -> Option<Duration> {
        self.decay_ms.filter(|&ms| ms > 0).map(Duration::from_millis)
    }

    /// Checks that the options describe a drawable buffer.
    pub fn validate(&self) -> BufferResult<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(BufferError::InvalidOptions(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if i32::try_from(self.cols).is_err() || i32::try_from(self.rows).is_err() {
            return Err(BufferError::InvalidOptions(format!(
                "grid size {}x{} is too large",
                self.cols, self.rows
            )));
        }
        Ok(())
    }
}
