//! Matching input events against bindings.
//!
//! An [`InputDefinition`] is a partial event: every field it sets must equal
//! the event's, every field it leaves out matches anything. Definitions can
//! be written in code or loaded from configuration:
//!
//! ```toml
//! [[submit]]
//! key = "Enter"
//!
//! [[submit]]
//! key = "s"
//! ctrl = true
//! ```

use serde::{Deserialize, Serialize};

use crate::event::{KeyEventData, Modifiers, MouseEventData};

/// A partial input event used as a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefinition {
    /// Required state of the Shift key.
    pub shift: Option<bool>,
    /// Required state of the Control key.
    pub ctrl: Option<bool>,
    /// Required state of the Alt key.
    pub alt: Option<bool>,
    /// Required state of the Meta key.
    pub meta: Option<bool>,
    /// Required key name. Ignored for mouse events.
    pub key: Option<String>,
    /// Required physical key code. Ignored for mouse events.
    pub code: Option<String>,
    /// Required numeric key code. Ignored for mouse events.
    pub key_code: Option<u32>,
    /// Required mouse button. Ignored for key events.
    pub button: Option<u8>,
}

impl InputDefinition {
    /// A definition matching every event.
    pub fn any() -> Self {
        Self::default()
    }

    /// A definition matching a key name.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// A definition matching a physical key code.
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// A definition matching a numeric key code.
    pub fn key_code(key_code: u32) -> Self {
        Self {
            key_code: Some(key_code),
            ..Self::default()
        }
    }

    /// A definition matching a mouse button.
    pub fn button(button: u8) -> Self {
        Self {
            button: Some(button),
            ..Self::default()
        }
    }

    /// Requires Shift to be held or not.
    pub fn shift(mut self, held: bool) -> Self {
        self.shift = Some(held);
        self
    }

    /// Requires Control to be held or not.
    pub fn ctrl(mut self, held: bool) -> Self {
        self.ctrl = Some(held);
        self
    }

    /// Requires Alt to be held or not.
    pub fn alt(mut self, held: bool) -> Self {
        self.alt = Some(held);
        self
    }

    /// Requires Meta to be held or not.
    pub fn meta(mut self, held: bool) -> Self {
        self.meta = Some(held);
        self
    }

    /// Returns true if this definition matches `data`.
    pub fn matches<'a>(&self, data: impl Into<InputData<'a>>) -> bool {
        let data = data.into();
        self.matches_modifiers(data.modifiers())
            && match data {
                InputData::Key(event) => self.matches_key(event),
                InputData::Mouse(event) => self.matches_mouse(event),
            }
    }

    fn matches_modifiers(&self, modifiers: Modifiers) -> bool {
        wants(self.shift, modifiers.shift())
            && wants(self.ctrl, modifiers.ctrl())
            && wants(self.alt, modifiers.alt())
            && wants(self.meta, modifiers.meta())
    }

    fn matches_key(&self, event: &KeyEventData) -> bool {
        self.key.as_ref().is_none_or(|key| *key == event.key)
            && self.code.as_ref().is_none_or(|code| *code == event.code)
            && wants(self.key_code, event.key_code)
    }

    fn matches_mouse(&self, event: &MouseEventData) -> bool {
        wants(self.button, event.button)
    }
}

fn wants<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
    wanted.is_none_or(|wanted| wanted == actual)
}

/// Event data an [`InputDefinition`] can be matched against.
#[derive(Debug, Clone, Copy)]
pub enum InputData<'a> {
    /// A keyboard event.
    Key(&'a KeyEventData),
    /// A mouse event.
    Mouse(&'a MouseEventData),
}

impl InputData<'_> {
    fn modifiers(&self) -> Modifiers {
        match self {
            InputData::Key(event) => event.modifiers,
            InputData::Mouse(event) => event.modifiers,
        }
    }
}

impl<'a> From<&'a KeyEventData> for InputData<'a> {
    fn from(event: &'a KeyEventData) -> Self {
        InputData::Key(event)
    }
}

impl<'a> From<&'a MouseEventData> for InputData<'a> {
    fn from(event: &'a MouseEventData) -> Self {
        InputData::Mouse(event)
    }
}

/// Returns true if any of the `wanted` definitions matches `data`.
///
/// An empty definition matches every event; an empty list matches none.
///
/// # Examples
///
/// ```
/// use tessera_input::{input_match, InputDefinition, KeyEventData, Modifiers};
///
/// let ctrl_c = KeyEventData::new("c", "KeyC", 67).with_modifiers(Modifiers::CTRL);
/// let bindings = [InputDefinition::key("Escape"), InputDefinition::code("KeyC").ctrl(true)];
/// assert!(input_match(&bindings, &ctrl_c));
/// ```
pub fn input_match<'a>(wanted: &[InputDefinition], data: impl Into<InputData<'a>>) -> bool {
    let data = data.into();
    wanted.iter().any(|definition| definition.matches(data))
}
