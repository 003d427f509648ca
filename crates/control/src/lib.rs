#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Teleop Control Core
//!
//! The interactive control loop that lets a human operator drive one agent of
//! a multi-agent environment from the keyboard.
//!
//! ## Key Components
//!
//! -   **Keys:** [`Key`], [`Modifiers`] and the held-key bitset [`KeyState`]
//!     live in [`keys`].
//! -   **Action encoding:** [`ActionEncoder`] turns the key state into an
//!     [`Action`] for the selected agent, with separate policies for discrete
//!     and continuous action spaces.
//! -   **Agent selection:** [`AgentSelector`] cycles the controlled agent.
//! -   **Overlay:** [`OverlayWriter`] owns six text slots on the render surface
//!     and rewrites them every tick.
//! -   **Session:** [`Session`] bundles all mutable operator state and receives
//!     key events through the [`KeyListener`] trait.
//! -   **Control loop:** [`ControlLoop`] resets, steps, accumulates, writes the
//!     overlay and renders, once per tick.
//!
//! The simulated environment and the render surface are collaborators behind
//! the [`Environment`] and [`RenderSurface`] traits.
//!
//! ```rust,ignore
//! use control::ControlLoop;
//!
//! let mut control = ControlLoop::new(env, viewer)?;
//! control.run()?;
//! ```

pub mod action;
pub mod control_loop;
pub mod env;
pub mod keys;
pub mod overlay;
pub mod selector;
pub mod session;
pub mod surface;

use thiserror::Error;

pub use action::{Action, ActionEncoder, ActionSpace, DiscreteAction};
pub use control_loop::{ControlLoop, TickReport};
pub use env::{AgentDescriptor, Environment, Scene, Shape, Step};
pub use keys::{Key, KeyListener, KeyState, Modifiers};
pub use overlay::{OverlayLines, OverlayWriter, TextLine, DEFAULT_FONT_SIZE, OVERLAY_SLOTS};
pub use selector::AgentSelector;
pub use session::{CumulativeReward, Session};
pub use surface::{FrameStatus, RenderSurface};

/// Errors raised by an [`Environment`].
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("action batch has {got} entries, expected {expected}")]
    ActionCount { expected: usize, got: usize },
    #[error("agent {agent} received a {got} action in a {expected} action space")]
    ActionKind {
        agent: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("invalid environment configuration: {0}")]
    Config(String),
}

/// Error reported by a [`RenderSurface`] backend.
#[derive(Error, Debug)]
#[error("render surface failed: {0}")]
pub struct SurfaceError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl SurfaceError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Errors that end a [`ControlLoop`]. None of them are recovered locally.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("environment reset failed")]
    Reset(#[source] EnvError),
    #[error("environment step failed")]
    Step(#[source] EnvError),
    #[error("rendering failed")]
    Render(#[from] SurfaceError),
    #[error("environment has no agents to control")]
    NoAgents,
    #[error("environment returned {got} {what} for {expected} agents")]
    ObservationShape {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
