//! Tile styles.
//!
//! A [`Tile`] describes what is drawn in one cell: a glyph, the font used for
//! it, a pixel offset for the glyph and the foreground/background colors.
//! Every field is optional. Writing a tile over another one only replaces the
//! fields that are set, so a tile that only carries a background color can be
//! laid over existing text without erasing the glyph.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// A partial or complete tile style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile {
    /// Glyph drawn in the cell.
    #[serde(rename = "char", skip_serializing_if = "Option::is_none")]
    pub ch: Option<char>,
    /// Font description handed to the paint backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Horizontal glyph offset in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<i32>,
    /// Vertical glyph offset in pixels, relative to the bottom of the cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<i32>,
    /// Glyph color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    /// Cell background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
}

impl Tile {
    /// A tile with no field set. Merging it changes nothing.
    pub const EMPTY: Self = Self {
        ch: None,
        font: None,
        offset_x: None,
        offset_y: None,
        fg: None,
        bg: None,
    };

    /// Creates an empty tile.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Sets the glyph.
    pub fn with_char(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    /// Sets the font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Sets the glyph offset.
    pub fn with_offset(mut self, offset_x: i32, offset_y: i32) -> Self {
        self.offset_x = Some(offset_x);
        self.offset_y = Some(offset_y);
        self
    }

    /// Sets the foreground color.
    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Sets the background color.
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.ch.is_none()
            && self.font.is_none()
            && self.offset_x.is_none()
            && self.offset_y.is_none()
            && self.fg.is_none()
            && self.bg.is_none()
    }

    /// Copies every field set in `patch` into `self`.
    ///
    /// Returns true if at least one field ended up with a different value.
    pub fn merge(&mut self, patch: &Tile) -> bool {
        let mut changed = false;

        if patch.ch.is_some() && self.ch != patch.ch {
            self.ch = patch.ch;
            changed = true;
        }
        if let Some(font) = &patch.font {
            if self.font.as_deref() != Some(font.as_str()) {
                self.font = Some(font.clone());
                changed = true;
            }
        }
        if patch.offset_x.is_some() && self.offset_x != patch.offset_x {
            self.offset_x = patch.offset_x;
            changed = true;
        }
        if patch.offset_y.is_some() && self.offset_y != patch.offset_y {
            self.offset_y = patch.offset_y;
            changed = true;
        }
        if patch.fg.is_some() && self.fg != patch.fg {
            self.fg = patch.fg;
            changed = true;
        }
        if patch.bg.is_some() && self.bg != patch.bg {
            self.bg = patch.bg;
            changed = true;
        }

        changed
    }

    /// Returns a copy of `self` with `patch` merged on top.
    pub fn merged(&self, patch: &Tile) -> Self {
        let mut out = self.clone();
        out.merge(patch);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_only_overwrites_set_fields() {
        let mut tile = Tile::new()
            .with_char('a')
            .with_fg(Color::WHITE)
            .with_bg(Color::BLACK);

        let changed = tile.merge(&Tile::new().with_bg(Color::RED));

        assert!(changed);
        assert_eq!(
            tile,
            Tile::new()
                .with_char('a')
                .with_fg(Color::WHITE)
                .with_bg(Color::RED)
        );
    }

    #[test]
    fn test_merge_reports_no_change() {
        let mut tile = Tile::new().with_char('x').with_font("12px mono");
        assert!(!tile.merge(&Tile::new().with_char('x')));
        assert!(!tile.merge(&Tile::new().with_font("12px mono")));
        assert!(!tile.merge(&Tile::EMPTY));
        assert!(tile.merge(&Tile::new().with_offset(1, 0)));
        assert!(!tile.merge(&Tile::new().with_offset(1, 0)));
    }

    #[test]
    fn test_is_empty() {
        assert!(Tile::new().is_empty());
        assert!(!Tile::new().with_bg(Color::BLUE).is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let tile: Tile = toml::from_str("char = \"@\"\nbg = \"red\"").unwrap();
        assert_eq!(tile, Tile::new().with_char('@').with_bg(Color::RED));
    }
}
