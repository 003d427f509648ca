//! Operator session state and the key event handlers that mutate it.

use crate::action::{Action, ActionEncoder, ActionSpace};
use crate::keys::{Key, KeyListener, KeyState, Modifiers};
use crate::selector::AgentSelector;

/// Per-agent sum of rewards since the last reset.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeReward(Vec<f32>);

impl CumulativeReward {
    #[must_use]
    pub fn new(agent_count: usize) -> Self {
        Self(vec![0.0; agent_count])
    }

    /// Adds one step of rewards element-wise.
    pub fn accumulate(&mut self, rewards: &[f32]) {
        for (total, reward) in self.0.iter_mut().zip(rewards) {
            *total += reward;
        }
    }

    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(|total| *total = 0.0);
    }

    #[must_use]
    pub fn get(&self, agent: usize) -> f32 {
        self.0.get(agent).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// All mutable operator state of one interactive session.
///
/// Key state and agent selection live for the whole session; the reset flag
/// and cumulative rewards are reinitialized by every environment reset.
#[derive(Debug, Clone)]
pub struct Session {
    keys: KeyState,
    encoder: ActionEncoder,
    selector: AgentSelector,
    reset_requested: bool,
    returns: CumulativeReward,
}

impl Session {
    #[must_use]
    pub fn new(agent_count: usize, space: ActionSpace) -> Self {
        Self {
            keys: KeyState::new(),
            encoder: ActionEncoder::new(space),
            selector: AgentSelector::new(agent_count),
            reset_requested: false,
            returns: CumulativeReward::new(agent_count),
        }
    }

    #[must_use]
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.encoder.current()
    }

    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        self.encoder.space()
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selector.selected()
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.selector.agent_count()
    }

    #[must_use]
    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    /// Arms a reset for the top of the next tick.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Consumes the reset flag, returning whether a reset was pending.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_requested)
    }

    #[must_use]
    pub fn returns(&self) -> &CumulativeReward {
        &self.returns
    }

    pub fn returns_mut(&mut self) -> &mut CumulativeReward {
        &mut self.returns
    }

    /// Action batch for one step: no-op everywhere except the selected agent.
    #[must_use]
    pub fn action_batch(&self) -> Vec<Action> {
        let mut batch = vec![self.encoder.space().noop(); self.agent_count()];
        if let Some(slot) = batch.get_mut(self.selected()) {
            *slot = self.action();
        }
        batch
    }
}

impl KeyListener for Session {
    fn on_press(&mut self, key: Key, _modifiers: Modifiers) {
        match key {
            Key::Left | Key::Right | Key::Down | Key::Up => self.keys.set(key, true),
            Key::Tab => {
                let selected = self.selector.advance();
                tracing::debug!("Selected agent {selected}");
            }
            Key::R => {
                self.reset_requested = true;
                tracing::debug!("Reset requested");
            }
            Key::Other => return,
        }
        self.encoder.on_press(key, &self.keys);
    }

    fn on_release(&mut self, key: Key, _modifiers: Modifiers) {
        match key {
            Key::Left | Key::Right | Key::Down | Key::Up => self.keys.set(key, false),
            Key::R => {
                if std::mem::take(&mut self.reset_requested) {
                    tracing::debug!("Reset flag cleared on R release");
                }
            }
            Key::Tab | Key::Other => return,
        }
        self.encoder.on_release(key, &self.keys);
    }
}
