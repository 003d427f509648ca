//! Command-line options.

use clap::Parser;
use control::DEFAULT_FONT_SIZE;
use scenario::ScenarioConfig;

/// Drive one agent of a multi-agent scenario with the arrow keys.
///
/// TAB cycles the controlled agent, R resets the episode.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "teleop", version, about)]
pub struct Cli {
    /// Scenario to load.
    #[arg(long, default_value = "waterfall")]
    pub scenario: String,

    /// Number of agents in the scenario.
    #[arg(long, default_value_t = 4)]
    pub n_agents: usize,

    /// Use a continuous action space instead of discrete actions.
    #[arg(long)]
    pub continuous: bool,

    /// Steps after which the episode ends for every agent.
    #[arg(long, default_value_t = 200)]
    pub max_steps: u32,

    /// Seed for randomized scenario layouts.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Overlay font size in pixels.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: u32,

    /// Ticks to run when no window is available.
    #[arg(long, default_value_t = 1000)]
    pub ticks: u64,
}

impl Cli {
    pub fn scenario_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            n_agents: self.n_agents,
            continuous_actions: self.continuous,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}
