//! Normalization of crossterm events.
//!
//! Terminals report positions in cells. A surface drawn on a terminal uses one
//! cell per tile, so pixel positions are rebuilt from the tile size and the
//! tile position is the cell itself.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind as CtKeyKind, MouseButton, MouseEvent,
    MouseEventKind as CtMouseKind,
};

use crate::event::{InputEvent, KeyEventData, KeyEventKind, Modifiers, MouseEventData, MouseEventKind};

/// Converts a crossterm event into an [`InputEvent`].
///
/// Returns `None` for events with no counterpart: scrolling, paste, resize
/// and keys without a DOM name.
pub fn from_crossterm(event: &Event, tile_width: u32, tile_height: u32) -> Option<InputEvent> {
    match event {
        Event::FocusGained => Some(InputEvent::Focus),
        Event::FocusLost => Some(InputEvent::Blur),
        Event::Key(key) => from_key(key).map(|(kind, data)| InputEvent::Key(kind, data)),
        Event::Mouse(mouse) => from_mouse(mouse, tile_width, tile_height)
            .map(|(kind, data)| InputEvent::Mouse(kind, data)),
        _ => None,
    }
}

fn from_mouse(
    event: &MouseEvent,
    tile_width: u32,
    tile_height: u32,
) -> Option<(MouseEventKind, MouseEventData)> {
    let (kind, button) = match event.kind {
        CtMouseKind::Down(button) => (MouseEventKind::MouseDown, button_number(button)),
        CtMouseKind::Up(button) => (MouseEventKind::MouseUp, button_number(button)),
        CtMouseKind::Drag(button) => (MouseEventKind::MouseMove, button_number(button)),
        CtMouseKind::Moved => (MouseEventKind::MouseMove, 0),
        _ => return None,
    };

    let data = MouseEventData {
        button,
        x: i32::from(event.column) * tile_width as i32,
        y: i32::from(event.row) * tile_height as i32,
        col: i32::from(event.column),
        row: i32::from(event.row),
        modifiers: Modifiers::from(event.modifiers),
    };
    Some((kind, data))
}

fn button_number(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
    }
}

fn from_key(event: &KeyEvent) -> Option<(KeyEventKind, KeyEventData)> {
    let kind = match event.kind {
        CtKeyKind::Press | CtKeyKind::Repeat => KeyEventKind::KeyDown,
        CtKeyKind::Release => KeyEventKind::KeyUp,
    };

    let mut modifiers = Modifiers::from(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers |= Modifiers::SHIFT;
    }

    let (key, code, key_code) = dom_key(event.code)?;
    Some((
        kind,
        KeyEventData {
            key,
            code,
            key_code,
            modifiers,
        },
    ))
}

/// DOM `key`, `code` and `keyCode` for a crossterm key.
fn dom_key(code: KeyCode) -> Option<(String, String, u32)> {
    let named = |key: &str, code: &str, key_code: u32| Some((key.to_string(), code.to_string(), key_code));

    match code {
        KeyCode::Char(' ') => named(" ", "Space", 32),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let upper = c.to_ascii_uppercase();
            Some((c.to_string(), format!("Key{upper}"), upper as u32))
        }
        KeyCode::Char(c) if c.is_ascii_digit() => Some((c.to_string(), format!("Digit{c}"), c as u32)),
        KeyCode::Char(c) => Some((c.to_string(), String::new(), 0)),
        KeyCode::Backspace => named("Backspace", "Backspace", 8),
        KeyCode::Tab | KeyCode::BackTab => named("Tab", "Tab", 9),
        KeyCode::Enter => named("Enter", "Enter", 13),
        KeyCode::Esc => named("Escape", "Escape", 27),
        KeyCode::PageUp => named("PageUp", "PageUp", 33),
        KeyCode::PageDown => named("PageDown", "PageDown", 34),
        KeyCode::End => named("End", "End", 35),
        KeyCode::Home => named("Home", "Home", 36),
        KeyCode::Left => named("ArrowLeft", "ArrowLeft", 37),
        KeyCode::Up => named("ArrowUp", "ArrowUp", 38),
        KeyCode::Right => named("ArrowRight", "ArrowRight", 39),
        KeyCode::Down => named("ArrowDown", "ArrowDown", 40),
        KeyCode::Insert => named("Insert", "Insert", 45),
        KeyCode::Delete => named("Delete", "Delete", 46),
        KeyCode::F(n @ 1..=24) => {
            let name = format!("F{n}");
            Some((name.clone(), name, 111 + u32::from(n)))
        }
        _ => None,
    }
}
