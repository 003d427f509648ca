//! # Diagnostic Overlay
//!
//! Six text slots reserved on the render surface at session start, placed
//! right after any lines that already exist there, and rewritten every tick.

use crate::surface::RenderSurface;

/// Number of overlay slots a session reserves.
pub const OVERLAY_SLOTS: usize = 6;

/// Font size used when none is configured.
pub const DEFAULT_FONT_SIZE: u32 = 15;

/// Decimal places shown for observations.
const OBS_DECIMALS: i32 = 2;
/// Decimal places shown for rewards.
const REWARD_DECIMALS: usize = 3;

/// A positioned line of text on the render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub index: usize,
    pub message: String,
    pub font_size: u32,
}

impl TextLine {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            message: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn set_text(&mut self, message: &str, font_size: u32) {
        message.clone_into(&mut self.message);
        self.font_size = font_size;
    }
}

/// The six strings shown for the selected agent, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLines(pub [String; OVERLAY_SLOTS]);

impl OverlayLines {
    /// Formats the diagnostics of the selected agent.
    ///
    /// The observation is rounded for display and split in two halves; the
    /// second half comes first so it sits in the lowest slot, under the
    /// `Obs:` line.
    #[must_use]
    pub fn format(
        observation: &[f32],
        reward: f32,
        cumulative: f32,
        done: bool,
        agent_name: &str,
    ) -> Self {
        let rounded: Vec<f32> = observation.iter().map(|v| round_to(*v, OBS_DECIMALS)).collect();
        let (head, tail) = rounded.split_at(rounded.len() / 2);
        Self([
            format!("\t\t{}", format_vector(tail)),
            format!("Obs: {}", format_vector(head)),
            format!("Rew: {reward:.REWARD_DECIMALS$}"),
            format!("Total rew: {cumulative:.REWARD_DECIMALS$}"),
            format!("Done: {done}"),
            format!("Selected: {agent_name}"),
        ])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Writes overlay lines into the slots a session reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayWriter {
    base: usize,
    font_size: u32,
}

impl OverlayWriter {
    /// Reserves [`OVERLAY_SLOTS`] lines after the surface's existing ones.
    ///
    /// A surface without a text-line list yet is treated as having none.
    pub fn attach(surface: &mut dyn RenderSurface, font_size: u32) -> Self {
        let base = surface.text_lines().map_or(0, <[_]>::len);
        for i in 0..OVERLAY_SLOTS {
            surface.push_text_line(TextLine::new(base + i));
        }
        tracing::debug!("Overlay attached at slots {}..{}", base, base + OVERLAY_SLOTS);
        Self { base, font_size }
    }

    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Overwrites one line. `slot` is the absolute line index on the surface.
    pub fn write(
        &self,
        surface: &mut dyn RenderSurface,
        slot: usize,
        message: &str,
        font_size: u32,
    ) {
        match surface.text_line_mut(slot) {
            Some(line) => line.set_text(message, font_size),
            None => tracing::warn!("Overlay slot {slot} missing from render surface"),
        }
    }

    /// Writes all six lines at the configured font size.
    pub fn write_all(&self, surface: &mut dyn RenderSurface, lines: &OverlayLines) {
        for (i, message) in lines.as_slice().iter().enumerate() {
            self.write(surface, self.base + i, message, self.font_size);
        }
    }
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

fn format_vector(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
    format!("[{}]", parts.join(", "))
}
