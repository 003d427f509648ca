//! # Teleop Application Logic
//!
//! Builds the requested scenario and hands it to a [`ControlLoop`]. With the
//! `render` feature the loop runs against a [`render::Viewer`] window until
//! it is closed; otherwise it runs headless against a [`LogSurface`] for a
//! fixed number of ticks.

use anyhow::{Context, Result};
use control::ControlLoop;

use crate::cli::Cli;
use crate::headless::LogSurface;

/// Ticks between overlay log lines in headless mode.
const HEADLESS_LOG_EVERY: u64 = 50;

/// Runs an interactive session described by `cli`.
///
/// # Errors
///
/// Returns an error for an unknown scenario or invalid configuration, if the
/// window cannot be created, or when the environment or surface fails.
pub fn run(cli: &Cli, enable_render: bool) -> Result<()> {
    let env = scenario::make_env(&cli.scenario, &cli.scenario_config())
        .with_context(|| format!("failed to build scenario '{}'", cli.scenario))?;

    #[cfg(feature = "render")]
    if enable_render {
        tracing::info!("Arrow keys move, TAB switches agent, R resets");
        let viewer = render::Viewer::new(&format!("teleop: {}", cli.scenario))?;
        let mut control = ControlLoop::with_font_size(env, viewer, cli.font_size)?;
        control.run()?;
        return Ok(());
    }
    #[cfg(not(feature = "render"))]
    let _ = enable_render;

    run_headless(env, cli)
}

fn run_headless(env: scenario::World, cli: &Cli) -> Result<()> {
    tracing::info!("Running headless for {} ticks", cli.ticks);
    let surface = LogSurface::new(HEADLESS_LOG_EVERY);
    let mut control = ControlLoop::with_font_size(env, surface, cli.font_size)?;
    let ran = control.run_for(cli.ticks)?;
    tracing::info!(
        "Headless run finished after {} ticks, cumulative rewards {:?}",
        ran,
        control.session().returns().as_slice()
    );
    Ok(())
}
