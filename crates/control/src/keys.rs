//! Keyboard vocabulary shared by the control core and windowing hosts.

/// Key codes the control core understands.
///
/// Hosts map their native codes onto this enum; anything else arrives as
/// [`Key::Other`] and is ignored by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Tab,
    R,
    /// Any key with no meaning to the control core.
    Other,
}

/// Directional keys in [`KeyState`] bit order.
pub const DIRECTIONS: [Key; 4] = [Key::Left, Key::Right, Key::Down, Key::Up];

impl Key {
    /// Bit position of a directional key inside [`KeyState`].
    #[must_use]
    pub const fn direction_bit(self) -> Option<usize> {
        match self {
            Key::Left => Some(0),
            Key::Right => Some(1),
            Key::Down => Some(2),
            Key::Up => Some(3),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_direction(self) -> bool {
        self.direction_bit().is_some()
    }
}

/// Modifier keys held during a key event. Carried through for hosts, unused
/// by the handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const SUPER: Self = Self(1 << 3);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Held state of the four directional keys, ordered `{left, right, down, up}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState([bool; 4]);

impl KeyState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears the bit for `key`. Non-directional keys are ignored.
    pub fn set(&mut self, key: Key, held: bool) {
        if let Some(bit) = key.direction_bit() {
            self.0[bit] = held;
        }
    }

    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        key.direction_bit().is_some_and(|bit| self.0[bit])
    }

    /// Bit value (0 or 1) of a directional key.
    #[must_use]
    pub fn bit(&self, key: Key) -> i8 {
        i8::from(self.is_held(key))
    }

    #[must_use]
    pub fn held_count(&self) -> usize {
        self.0.iter().filter(|held| **held).count()
    }

    /// The directional key that is held, if exactly one is.
    #[must_use]
    pub fn sole_held(&self) -> Option<Key> {
        if self.held_count() == 1 {
            DIRECTIONS.into_iter().find(|key| self.is_held(*key))
        } else {
            None
        }
    }

    #[must_use]
    pub fn bits(&self) -> [bool; 4] {
        self.0
    }
}

/// Receiver of raw key events from a windowing host.
///
/// Hosts must deliver calls serially with respect to the control loop tick:
/// an event handler always runs to completion before the next tick reads the
/// session.
pub trait KeyListener {
    fn on_press(&mut self, key: Key, modifiers: Modifiers);
    fn on_release(&mut self, key: Key, modifiers: Modifiers);
}
