//! # Action Encoding
//!
//! Converts the operator's key state into the action applied to the selected
//! agent. The action space is fixed for a session by the environment.
//!
//! - **Continuous:** always `(right - left, up - down)` from the full key
//!   state, so opposite keys cancel.
//! - **Discrete, press:** the last pressed direction wins, whatever else is
//!   held.
//! - **Discrete, release:** if exactly one direction is still held the action
//!   becomes that direction, otherwise no-op. Releasing one of two held keys
//!   therefore stops the agent instead of reverting to the other key.

use crate::keys::{Key, KeyState};

/// Action domain declared by an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpace {
    Discrete,
    Continuous,
}

impl ActionSpace {
    #[must_use]
    pub fn from_continuous_flag(continuous: bool) -> Self {
        if continuous {
            Self::Continuous
        } else {
            Self::Discrete
        }
    }

    /// Neutral action of this space.
    #[must_use]
    pub fn noop(self) -> Action {
        match self {
            Self::Discrete => Action::Discrete(DiscreteAction::Noop),
            Self::Continuous => Action::Continuous([0.0, 0.0]),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Discrete => "discrete",
            Self::Continuous => "continuous",
        }
    }
}

/// Discrete movement actions, numbered as environments expect them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DiscreteAction {
    #[default]
    Noop = 0,
    Left = 1,
    Right = 2,
    Down = 3,
    Up = 4,
}

impl DiscreteAction {
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Action bound to a directional key.
    #[must_use]
    pub const fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Left => Some(Self::Left),
            Key::Right => Some(Self::Right),
            Key::Down => Some(Self::Down),
            Key::Up => Some(Self::Up),
            _ => None,
        }
    }

    /// Unit direction `[x, y]` of the action.
    #[must_use]
    pub const fn direction(self) -> [f32; 2] {
        match self {
            Self::Noop => [0.0, 0.0],
            Self::Left => [-1.0, 0.0],
            Self::Right => [1.0, 0.0],
            Self::Down => [0.0, -1.0],
            Self::Up => [0.0, 1.0],
        }
    }
}

/// One agent's action for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Discrete(DiscreteAction),
    /// Horizontal and vertical components, each in `[-1, 1]`.
    Continuous([f32; 2]),
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Discrete(_) => ActionSpace::Discrete.name(),
            Self::Continuous(_) => ActionSpace::Continuous.name(),
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Discrete(action) => *action == DiscreteAction::Noop,
            Self::Continuous([x, y]) => *x == 0.0 && *y == 0.0,
        }
    }
}

/// Holds the current action and re-derives it on every key event.
#[derive(Debug, Clone)]
pub struct ActionEncoder {
    space: ActionSpace,
    current: Action,
}

impl ActionEncoder {
    #[must_use]
    pub fn new(space: ActionSpace) -> Self {
        Self {
            space,
            current: space.noop(),
        }
    }

    #[must_use]
    pub fn space(&self) -> ActionSpace {
        self.space
    }

    #[must_use]
    pub fn current(&self) -> Action {
        self.current
    }

    /// Updates the action after `key` was pressed. `keys` already has the
    /// key's bit set.
    pub fn on_press(&mut self, key: Key, keys: &KeyState) {
        if !key.is_direction() {
            return;
        }
        self.current = match self.space {
            ActionSpace::Continuous => Self::continuous(keys),
            ActionSpace::Discrete => Action::Discrete(
                DiscreteAction::from_key(key).unwrap_or(DiscreteAction::Noop),
            ),
        };
    }

    /// Updates the action after `key` was released. `keys` already has the
    /// key's bit cleared.
    pub fn on_release(&mut self, key: Key, keys: &KeyState) {
        if !key.is_direction() {
            return;
        }
        self.current = match self.space {
            ActionSpace::Continuous => Self::continuous(keys),
            ActionSpace::Discrete => Action::Discrete(
                keys.sole_held()
                    .and_then(DiscreteAction::from_key)
                    .unwrap_or(DiscreteAction::Noop),
            ),
        };
    }

    fn continuous(keys: &KeyState) -> Action {
        let horizontal = keys.bit(Key::Right) - keys.bit(Key::Left);
        let vertical = keys.bit(Key::Up) - keys.bit(Key::Down);
        Action::Continuous([f32::from(horizontal), f32::from(vertical)])
    }
}
