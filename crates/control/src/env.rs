//! Contract of the simulated multi-agent environment driven by the control
//! loop. The simulation itself is out of scope for this crate.

use std::collections::BTreeMap;

use crate::action::{Action, ActionSpace};
use crate::EnvError;

/// Display information for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDescriptor {
    pub name: String,
    /// RGB in `[0, 1]`.
    pub color: [f32; 3],
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Result of one environment step, indexed by agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub observations: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
    pub info: Vec<BTreeMap<String, f32>>,
}

/// A drawable primitive in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub position: [f32; 2],
    pub radius: f32,
    pub color: [f32; 3],
    /// Drawn as an outline ring instead of a filled disc.
    pub hollow: bool,
}

/// Everything a render surface needs to draw the current frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Half-width of the square world, centered on the origin.
    pub extent: f32,
    pub shapes: Vec<Shape>,
    /// Index into `shapes` of the agent the operator controls, if any.
    pub highlighted: Option<usize>,
}

/// A multi-agent environment stepped with one action per agent.
pub trait Environment {
    /// Returns the environment to its initial state.
    ///
    /// # Errors
    ///
    /// Propagates any backend failure; the control loop treats it as fatal.
    fn reset(&mut self) -> Result<(), EnvError>;

    /// Advances the simulation by one step.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionCount`] or [`EnvError::ActionKind`] for a
    /// malformed batch, or any backend failure.
    fn step(&mut self, actions: &[Action]) -> Result<Step, EnvError>;

    fn agent_count(&self) -> usize;

    fn continuous_actions(&self) -> bool;

    /// Agent descriptors in index order.
    fn agents(&self) -> &[AgentDescriptor];

    /// Snapshot of the drawable state. `selected` marks the controlled agent.
    fn scene(&self, selected: usize) -> Scene;

    fn action_space(&self) -> ActionSpace {
        ActionSpace::from_continuous_flag(self.continuous_actions())
    }
}
