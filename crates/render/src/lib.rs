//! # Teleop Viewer
//!
//! A winit + wgpu window implementing [`control::RenderSurface`]. It draws
//! the environment [`control::Scene`] as flat discs and rings, renders the
//! overlay text lines with a built-in bitmap font, and forwards keyboard
//! events to the control session each time a frame is presented.

pub mod font;
pub mod geometry;
pub mod input;
pub mod viewer;

pub use viewer::Viewer;
