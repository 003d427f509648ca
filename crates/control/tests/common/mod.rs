#![allow(dead_code)]

use std::collections::VecDeque;

use control::{
    Action, AgentDescriptor, EnvError, Environment, FrameStatus, Key, KeyListener, Modifiers,
    RenderSurface, Scene, Step, SurfaceError, TextLine,
};

/// Environment that records every call and replays scripted outcomes.
///
/// Agent `i` observes `[tick, i, 0.5, 0.25]` and is rewarded `i + 1` every
/// step; `done` is raised on the steps listed in `done_on`, either per agent
/// or as one shared flag.
pub struct ScriptedEnv {
    agents: Vec<AgentDescriptor>,
    continuous: bool,
    pub steps: u64,
    pub resets: u64,
    pub batches: Vec<Vec<Action>>,
    pub done_on: Vec<u64>,
    pub fail_step_on: Option<u64>,
    pub fail_reset: bool,
    pub shared_done: bool,
    /// Truncates the observation list to this many entries.
    pub observation_count: Option<usize>,
    /// Resets observed before each step, indexed by step.
    pub resets_before_step: Vec<u64>,
}

impl ScriptedEnv {
    pub fn new(agent_count: usize, continuous: bool) -> Self {
        let agents = (0..agent_count)
            .map(|i| AgentDescriptor::new(format!("agent_{i}"), [1.0, 1.0, 1.0]))
            .collect();
        Self {
            agents,
            continuous,
            steps: 0,
            resets: 0,
            batches: Vec::new(),
            done_on: Vec::new(),
            fail_step_on: None,
            fail_reset: false,
            shared_done: false,
            observation_count: None,
            resets_before_step: Vec::new(),
        }
    }

    pub fn done_on(mut self, steps: &[u64]) -> Self {
        self.done_on = steps.to_vec();
        self
    }
}

impl Environment for ScriptedEnv {
    fn reset(&mut self) -> Result<(), EnvError> {
        self.resets += 1;
        if self.fail_reset {
            return Err(EnvError::Config("scripted reset failure".into()));
        }
        Ok(())
    }

    fn step(&mut self, actions: &[Action]) -> Result<Step, EnvError> {
        self.steps += 1;
        if self.fail_step_on == Some(self.steps) {
            return Err(EnvError::Config("scripted failure".into()));
        }
        if actions.len() != self.agents.len() {
            return Err(EnvError::ActionCount {
                expected: self.agents.len(),
                got: actions.len(),
            });
        }
        self.batches.push(actions.to_vec());
        self.resets_before_step.push(self.resets);

        let n = self.agents.len();
        #[allow(clippy::cast_precision_loss)]
        let observations = (0..self.observation_count.unwrap_or(n))
            .map(|i| vec![self.steps as f32, i as f32, 0.5, 0.25])
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let rewards = (0..n).map(|i| (i + 1) as f32).collect();
        let done = self.done_on.contains(&self.steps);
        let dones = if self.shared_done {
            vec![done]
        } else {
            vec![done; n]
        };
        Ok(Step {
            observations,
            rewards,
            dones,
            info: Vec::new(),
        })
    }

    fn agent_count(&self) -> usize {
        self.agents.len()
    }

    fn continuous_actions(&self) -> bool {
        self.continuous
    }

    fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    fn scene(&self, selected: usize) -> Scene {
        Scene {
            extent: 1.0,
            shapes: Vec::new(),
            highlighted: Some(selected),
        }
    }
}

/// A key event delivered by [`ScriptedSurface`] while presenting.
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Press(Key),
    Release(Key),
}

/// Render surface that replays one batch of key events per `present` call.
///
/// The first `present` happens while the session is constructed, so the
/// first scripted batch is delivered at construction time.
pub struct ScriptedSurface {
    pub lines: Option<Vec<TextLine>>,
    pub frames: Vec<Vec<String>>,
    pub script: VecDeque<Vec<Input>>,
    pub close_after: Option<usize>,
    /// Frame number, counting the construction frame as 1, that fails.
    pub fail_present_on: Option<usize>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self {
            lines: None,
            frames: Vec::new(),
            script: VecDeque::new(),
            close_after: None,
            fail_present_on: None,
        }
    }

    /// Surface that already carries `count` lines from another user.
    pub fn with_existing_lines(count: usize) -> Self {
        let mut surface = Self::new();
        surface.lines = Some((0..count).map(TextLine::new).collect());
        surface
    }

    pub fn script(mut self, batches: Vec<Vec<Input>>) -> Self {
        self.script = batches.into();
        self
    }

    pub fn last_frame(&self) -> &[String] {
        self.frames.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl RenderSurface for ScriptedSurface {
    fn text_lines(&self) -> Option<&[TextLine]> {
        self.lines.as_deref()
    }

    fn push_text_line(&mut self, line: TextLine) {
        self.lines.get_or_insert_with(Vec::new).push(line);
    }

    fn text_line_mut(&mut self, index: usize) -> Option<&mut TextLine> {
        self.lines.as_mut().and_then(|lines| lines.get_mut(index))
    }

    fn present(
        &mut self,
        _scene: &Scene,
        input: &mut dyn KeyListener,
    ) -> Result<FrameStatus, SurfaceError> {
        let frame = self
            .lines
            .iter()
            .flatten()
            .map(|line| line.message.clone())
            .collect();
        self.frames.push(frame);
        if self.fail_present_on == Some(self.frames.len()) {
            return Err(SurfaceError::backend("gpu lost"));
        }

        for event in self.script.pop_front().unwrap_or_default() {
            match event {
                Input::Press(key) => input.on_press(key, Modifiers::NONE),
                Input::Release(key) => input.on_release(key, Modifiers::NONE),
            }
        }

        if self.close_after.is_some_and(|n| self.frames.len() >= n) {
            Ok(FrameStatus::Closed)
        } else {
            Ok(FrameStatus::Presented)
        }
    }
}

pub fn press(listener: &mut dyn KeyListener, key: Key) {
    listener.on_press(key, Modifiers::NONE);
}

pub fn release(listener: &mut dyn KeyListener, key: Key) {
    listener.on_release(key, Modifiers::NONE);
}
