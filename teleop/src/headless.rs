//! A render surface for machines without a display.

use control::{FrameStatus, KeyListener, RenderSurface, Scene, SurfaceError, TextLine};

/// Surface that logs the overlay instead of drawing it.
///
/// It never delivers key events and never closes, so a session on it only
/// ends when the caller stops ticking.
#[derive(Debug, Default)]
pub struct LogSurface {
    text_lines: Option<Vec<TextLine>>,
    frames: u64,
    /// Log the overlay every this many frames. Zero disables it.
    log_every: u64,
}

impl LogSurface {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSurface for LogSurface {
    fn text_lines(&self) -> Option<&[TextLine]> {
        self.text_lines.as_deref()
    }

    fn push_text_line(&mut self, line: TextLine) {
        self.text_lines.get_or_insert_with(Vec::new).push(line);
    }

    fn text_line_mut(&mut self, index: usize) -> Option<&mut TextLine> {
        self.text_lines.as_mut()?.get_mut(index)
    }

    fn present(
        &mut self,
        scene: &Scene,
        _input: &mut dyn KeyListener,
    ) -> Result<FrameStatus, SurfaceError> {
        self.frames += 1;
        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let overlay: Vec<&str> = self
                .text_lines
                .iter()
                .flatten()
                .rev()
                .map(|line| line.message.as_str())
                .collect();
            tracing::info!(
                frame = self.frames,
                shapes = scene.shapes.len(),
                "{}",
                overlay.join(" | ")
            );
        }
        Ok(FrameStatus::Presented)
    }
}
