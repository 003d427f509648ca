//! Contract of the render surface / windowing host.

use crate::env::Scene;
use crate::keys::KeyListener;
use crate::overlay::TextLine;
use crate::SurfaceError;

/// Outcome of presenting a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// The window was closed; the session should end.
    Closed,
}

/// A surface that draws scenes, owns an ordered list of text lines and
/// dispatches key events.
pub trait RenderSurface {
    /// Text lines already on the surface, or `None` if the list has not been
    /// created yet.
    fn text_lines(&self) -> Option<&[TextLine]>;

    /// Appends a line, creating the list on first use.
    fn push_text_line(&mut self, line: TextLine);

    fn text_line_mut(&mut self, index: usize) -> Option<&mut TextLine>;

    /// Draws `scene` plus the text lines and delivers any pending key events
    /// to `input` before returning. Blocks until the frame is presented.
    ///
    /// # Errors
    ///
    /// Returns a [`SurfaceError`] when the backend fails to draw.
    fn present(
        &mut self,
        scene: &Scene,
        input: &mut dyn KeyListener,
    ) -> Result<FrameStatus, SurfaceError>;
}
