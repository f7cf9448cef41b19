//! Input event payloads.
//!
//! Every input source is normalized to the same two payload shapes before it
//! reaches the scene: [`MouseEventData`] for pointer events and
//! [`KeyEventData`] for keyboard events. Key names and codes follow the DOM
//! naming (`"a"`, `"KeyA"`, `65`), so bindings written for one source work
//! for any other.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers pressed.
        const NONE = 0b0000_0000;
        /// Shift modifier.
        const SHIFT = 0b0000_0001;
        /// Control modifier.
        const CTRL = 0b0000_0010;
        /// Alt/Option modifier.
        const ALT = 0b0000_0100;
        /// Meta modifier (Windows key, Command key).
        const META = 0b0000_1000;
    }
}

impl Modifiers {
    /// Returns true if Shift is held.
    #[inline]
    pub fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    /// Returns true if Control is held.
    #[inline]
    pub fn ctrl(self) -> bool {
        self.contains(Modifiers::CTRL)
    }

    /// Returns true if Alt is held.
    #[inline]
    pub fn alt(self) -> bool {
        self.contains(Modifiers::ALT)
    }

    /// Returns true if Meta is held.
    #[inline]
    pub fn meta(self) -> bool {
        self.contains(Modifiers::META)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.meta() {
            parts.push("Meta");
        }
        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as Ct;

        let mut result = Modifiers::NONE;
        if mods.contains(Ct::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(Ct::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(Ct::ALT) {
            result |= Modifiers::ALT;
        }
        if mods.intersects(Ct::SUPER | Ct::META) {
            result |= Modifiers::META;
        }
        result
    }
}

/// The kind of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// A button was pressed and released.
    Click,
    /// A button was pressed.
    MouseDown,
    /// The pointer entered the surface.
    MouseEnter,
    /// The pointer left the surface.
    MouseLeave,
    /// The pointer moved.
    MouseMove,
    /// The pointer moved out of the surface or one of its children.
    MouseOut,
    /// The pointer moved onto the surface or one of its children.
    MouseOver,
    /// A button was released.
    MouseUp,
}

/// The kind of a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// A key was pressed (repeats while held).
    KeyDown,
    /// A key was released.
    KeyUp,
    /// A key producing a character was pressed.
    KeyPress,
}

/// A mouse event, in pixels and in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseEventData {
    /// Button number: 0 left, 1 middle, 2 right.
    pub button: u8,
    /// Horizontal position relative to the surface, in pixels.
    pub x: i32,
    /// Vertical position relative to the surface, in pixels.
    pub y: i32,
    /// Column under the pointer.
    pub col: i32,
    /// Row under the pointer.
    pub row: i32,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl MouseEventData {
    /// Builds a mouse event at pixel position `(x, y)`, deriving the tile
    /// position from the tile size.
    ///
    /// # Panics
    ///
    /// Panics if a tile dimension is zero.
    pub fn at_pixel(button: u8, x: i32, y: i32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            button,
            x,
            y,
            col: x.div_euclid(tile_width as i32),
            row: y.div_euclid(tile_height as i32),
            modifiers: Modifiers::NONE,
        }
    }

    /// Sets the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyEventData {
    /// Name of the key, i.e. `"a"` or `"Enter"`.
    pub key: String,
    /// Physical key code, i.e. `"KeyA"`.
    pub code: String,
    /// Numeric key code, i.e. `65`.
    pub key_code: u32,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl KeyEventData {
    /// Creates a key event without modifiers.
    pub fn new(key: impl Into<String>, code: impl Into<String>, key_code: u32) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            key_code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Sets the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl fmt::Display for KeyEventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// A normalized input event, as delivered to a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A mouse event.
    Mouse(MouseEventKind, MouseEventData),
    /// A keyboard event.
    Key(KeyEventKind, KeyEventData),
    /// The surface gained input focus.
    Focus,
    /// The surface lost input focus.
    Blur,
}
