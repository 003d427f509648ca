//! # Teleop
//!
//! Keyboard teleoperation of multi-agent scenarios.
//!
//! -   [`cli`] parses the command line into a [`scenario::ScenarioConfig`].
//! -   [`app`] wires the scenario, the render surface and the
//!     [`control::ControlLoop`] together.
//! -   [`headless`] provides the logging surface used without a window.

pub mod app;
pub mod cli;
pub mod headless;

pub use cli::Cli;
