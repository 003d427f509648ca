//! # Teleop
//!
//! Entry point for the teleoperation binary. Builds with a window by
//! default; without the `render` feature the session runs headless.

use anyhow::Result;
use clap::Parser;
use teleop::{app, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    app::run(&cli, cfg!(feature = "render"))
}
