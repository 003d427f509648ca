//! # Control Loop
//!
//! The perpetual reset / step / overlay / render cycle.
//!
//! Each tick:
//!
//! 1. performs a pending reset and zeroes the cumulative rewards,
//! 2. builds the action batch (no-op for every agent but the selected one),
//! 3. steps the environment and accumulates rewards,
//! 4. rewrites the six overlay slots for the selected agent,
//! 5. presents the frame, which is also when key events are delivered,
//! 6. arms a reset if the selected agent is done.
//!
//! The reset in step 6 is deferred to the top of the next tick so the terminal
//! frame is still drawn. Everything runs on one thread; the only blocking
//! calls are the environment step and the frame presentation.

use crate::action::Action;
use crate::env::Environment;
use crate::overlay::{OverlayLines, OverlayWriter, DEFAULT_FONT_SIZE};
use crate::session::Session;
use crate::surface::{FrameStatus, RenderSurface};
use crate::ControlError;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick counter for the session.
    pub tick: u64,
    /// A reset ran at the top of this tick.
    pub reset: bool,
    pub selected: usize,
    pub batch: Vec<Action>,
    pub reward: f32,
    pub cumulative: f32,
    pub done: bool,
    pub lines: OverlayLines,
    pub status: FrameStatus,
}

/// Drives an [`Environment`] from operator input shown on a [`RenderSurface`].
pub struct ControlLoop<E, S> {
    env: E,
    surface: S,
    session: Session,
    overlay: OverlayWriter,
    tick: u64,
    closed: bool,
}

impl<E: Environment, S: RenderSurface> ControlLoop<E, S> {
    /// Creates a session at the default overlay font size.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NoAgents`] for an environment without agents
    /// and [`ControlError::Render`] if the first frame cannot be presented.
    pub fn new(env: E, surface: S) -> Result<Self, ControlError> {
        Self::with_font_size(env, surface, DEFAULT_FONT_SIZE)
    }

    /// Creates a session, presents a first frame and reserves the overlay
    /// slots after any lines already on the surface.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NoAgents`] for an environment without agents
    /// and [`ControlError::Render`] if the first frame cannot be presented.
    pub fn with_font_size(env: E, mut surface: S, font_size: u32) -> Result<Self, ControlError> {
        if env.agent_count() == 0 {
            return Err(ControlError::NoAgents);
        }
        let mut session = Session::new(env.agent_count(), env.action_space());

        let scene = env.scene(session.selected());
        let closed = surface.present(&scene, &mut session)? == FrameStatus::Closed;

        let overlay = OverlayWriter::attach(&mut surface, font_size);
        tracing::info!(
            "Interactive session started: {} agents, {} actions, overlay base slot {}",
            env.agent_count(),
            env.action_space().name(),
            overlay.base()
        );

        Ok(Self {
            env,
            surface,
            session,
            overlay,
            tick: 0,
            closed,
        })
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Session state for hosts that deliver key events outside of
    /// [`RenderSurface::present`].
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayWriter {
        &self.overlay
    }

    /// Runs one reset/step/overlay/render cycle.
    ///
    /// # Errors
    ///
    /// Environment and surface failures are returned unchanged; nothing is
    /// retried.
    pub fn tick(&mut self) -> Result<TickReport, ControlError> {
        self.tick += 1;

        let reset = self.session.take_reset();
        if reset {
            self.env.reset().map_err(ControlError::Reset)?;
            self.session.returns_mut().clear();
            tracing::info!("Environment reset at tick {}", self.tick);
        }

        let selected = self.session.selected();
        let batch = self.session.action_batch();
        let step = self.env.step(&batch).map_err(ControlError::Step)?;
        let agents = self.env.agent_count();
        check_len("observations", agents, step.observations.len())?;
        check_len("rewards", agents, step.rewards.len())?;
        if step.dones.len() != 1 {
            check_len("done flags", agents, step.dones.len())?;
        }

        self.session.returns_mut().accumulate(&step.rewards);

        let reward = step.rewards[selected];
        let cumulative = self.session.returns().get(selected);
        let done = if step.dones.len() == 1 {
            step.dones[0]
        } else {
            step.dones[selected]
        };
        let name = self
            .env
            .agents()
            .get(selected)
            .map_or_else(|| format!("agent {selected}"), |agent| agent.name.clone());

        let observation = &step.observations[selected];
        let lines = OverlayLines::format(observation, reward, cumulative, done, &name);
        self.overlay.write_all(&mut self.surface, &lines);

        let scene = self.env.scene(selected);
        let status = self.surface.present(&scene, &mut self.session)?;

        if done {
            self.session.request_reset();
            tracing::info!("Episode done at tick {}, reset armed", self.tick);
        }

        tracing::trace!(
            tick = self.tick,
            selected,
            reward,
            cumulative,
            "Tick complete"
        );
        if !step.info.is_empty() {
            tracing::trace!(info = ?step.info.get(selected), "Step info");
        }

        Ok(TickReport {
            tick: self.tick,
            reset,
            selected,
            batch,
            reward,
            cumulative,
            done,
            lines,
            status,
        })
    }

    /// Ticks until the surface reports that its window was closed.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a tick.
    pub fn run(&mut self) -> Result<(), ControlError> {
        while !self.closed {
            if self.tick()?.status == FrameStatus::Closed {
                self.closed = true;
            }
        }
        tracing::info!("Render surface closed after {} ticks", self.tick);
        Ok(())
    }

    /// Ticks at most `ticks` times, stopping early if the surface closes.
    /// Returns the number of ticks run.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a tick.
    pub fn run_for(&mut self, ticks: u64) -> Result<u64, ControlError> {
        let mut ran = 0;
        while ran < ticks && !self.closed {
            if self.tick()?.status == FrameStatus::Closed {
                self.closed = true;
            }
            ran += 1;
        }
        Ok(ran)
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), ControlError> {
    if expected == got {
        Ok(())
    } else {
        Err(ControlError::ObservationShape { what, expected, got })
    }
}
