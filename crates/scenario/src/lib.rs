#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Scenarios
//!
//! Small 2-D multi-agent worlds that can be driven interactively.
//!
//! Every scenario is a [`World`] of point-mass agents with drag, pushed by
//! unit forces (discrete actions) or clamped force vectors (continuous
//! actions). Agents collide with each other, with static obstacles and with
//! the world boundary. Each agent is rewarded for closing the distance to its
//! goal, and the episode ends for everyone once all goals are reached or the
//! step horizon runs out.
//!
//! -   **`waterfall`:** agents start in a row at the top and must drop to the
//!     goal line at the bottom through a field of obstacles.
//! -   **`navigation`:** agents and goal landmarks are scattered at random.

pub mod layout;
pub mod world;

use control::EnvError;
use thiserror::Error;

pub use layout::{Layout, Obstacle};
pub use world::{Body, LayoutFn, World};

/// Names accepted by [`make_env`].
pub const SCENARIOS: [&str; 2] = ["waterfall", "navigation"];

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("unknown scenario '{name}', available: {}", SCENARIOS.join(", "))]
    Unknown { name: String },
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Per-scenario settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub n_agents: usize,
    pub continuous_actions: bool,
    /// Steps after which every agent is done.
    pub max_steps: u32,
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            n_agents: 4,
            continuous_actions: false,
            max_steps: 200,
            seed: 0,
        }
    }
}

/// Builds the named scenario.
///
/// # Errors
///
/// Returns [`ScenarioError::Unknown`] for a name not in [`SCENARIOS`] and
/// [`ScenarioError::Env`] for an invalid configuration.
pub fn make_env(name: &str, config: &ScenarioConfig) -> Result<World, ScenarioError> {
    let builder: LayoutFn = match name {
        "waterfall" => layout::waterfall,
        "navigation" => layout::navigation,
        _ => {
            return Err(ScenarioError::Unknown {
                name: name.to_owned(),
            })
        }
    };
    let world = World::new(builder, config)?;
    tracing::info!(
        "Created scenario '{}' with {} agents ({} actions)",
        name,
        config.n_agents,
        if config.continuous_actions { "continuous" } else { "discrete" }
    );
    Ok(world)
}
