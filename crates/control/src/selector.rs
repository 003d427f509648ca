/// Index of the agent that currently receives operator input.
///
/// Always in `[0, agent_count)`; [`advance`](Self::advance) is the only way to
/// change it and wraps back to 0 after the last agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSelector {
    selected: usize,
    agent_count: usize,
}

impl AgentSelector {
    /// Starts with agent 0 selected. `agent_count` is clamped to at least 1.
    #[must_use]
    pub fn new(agent_count: usize) -> Self {
        Self {
            selected: 0,
            agent_count: agent_count.max(1),
        }
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    /// Selects the next agent, wrapping to 0.
    pub fn advance(&mut self) -> usize {
        self.selected = (self.selected + 1) % self.agent_count;
        self.selected
    }
}
