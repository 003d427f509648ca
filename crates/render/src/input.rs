//! Translation from winit keyboard events to the control core's key codes.

use control::{Key, Modifiers};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Maps a physical key to a [`Key`]. Layout independent, so the arrows and
/// `R` sit in the same place on every keyboard.
pub fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) => Key::Left,
        PhysicalKey::Code(KeyCode::ArrowRight) => Key::Right,
        PhysicalKey::Code(KeyCode::ArrowDown) => Key::Down,
        PhysicalKey::Code(KeyCode::ArrowUp) => Key::Up,
        PhysicalKey::Code(KeyCode::Tab) => Key::Tab,
        PhysicalKey::Code(KeyCode::KeyR) => Key::R,
        _ => Key::Other,
    }
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    [
        (state.shift_key(), Modifiers::SHIFT),
        (state.control_key(), Modifiers::CTRL),
        (state.alt_key(), Modifiers::ALT),
        (state.super_key(), Modifiers::SUPER),
    ]
    .into_iter()
    .filter(|(held, _)| *held)
    .fold(Modifiers::NONE, |acc, (_, m)| acc.union(m))
}
