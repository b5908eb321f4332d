//! The editing surface a document is shown in
//!
//! The surface owns the live text while a document is active. The session
//! store pulls from it when switching away from a document and pushes the
//! next document into it when switching in.

use serde::{Deserialize, Serialize};

/// Caret and scroll position within a buffer.
///
/// Cursor offsets are codepoint indices into the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub cursor_start: usize,
    pub cursor_end: usize,
    pub scroll_top: f64,
    pub scroll_left: f64,
}

impl Viewport {
    pub fn caret(position: usize) -> Self {
        Self::selection(position, position)
    }

    pub fn selection(start: usize, end: usize) -> Self {
        Self {
            cursor_start: start,
            cursor_end: end,
            ..Self::default()
        }
    }

    /// Clamp the selection into a buffer of `len` codepoints
    pub fn clamped(mut self, len: usize) -> Self {
        self.cursor_end = self.cursor_end.min(len);
        self.cursor_start = self.cursor_start.min(self.cursor_end);
        self
    }
}

pub trait EditingSurface {
    /// Current text shown in the surface
    fn content(&self) -> String;

    fn viewport(&self) -> Viewport;

    /// Replace text, selection and scroll position in one step
    fn load(&mut self, content: &str, viewport: Viewport);
}

/// Headless surface backed by a plain string
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    content: String,
    viewport: Viewport,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate typing: the whole buffer is replaced, caret moves to `viewport`
    pub fn input(&mut self, content: impl Into<String>, viewport: Viewport) {
        self.content = content.into();
        self.viewport = viewport.clamped(self.content.chars().count());
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let scroll = self.viewport;
        self.viewport = Viewport {
            scroll_top: scroll.scroll_top,
            scroll_left: scroll.scroll_left,
            ..Viewport::selection(start, end)
        }
        .clamped(self.content.chars().count());
    }

    pub fn scroll_to(&mut self, top: f64, left: f64) {
        self.viewport.scroll_top = top;
        self.viewport.scroll_left = left;
    }
}

impl EditingSurface for BufferSurface {
    fn content(&self) -> String {
        self.content.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn load(&mut self, content: &str, viewport: Viewport) {
        self.content = content.to_string();
        self.viewport = viewport.clamped(self.content.chars().count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        let viewport = Viewport::selection(4, 10).clamped(6);
        assert_eq!(viewport.cursor_start, 4);
        assert_eq!(viewport.cursor_end, 6);

        let viewport = Viewport::selection(9, 10).clamped(3);
        assert_eq!((viewport.cursor_start, viewport.cursor_end), (3, 3));
    }

    #[test]
    fn test_buffer_surface_counts_codepoints() {
        let mut surface = BufferSurface::new();
        surface.input("héllo", Viewport::caret(99));
        assert_eq!(surface.viewport().cursor_end, 5);

        surface.select(1, 3);
        surface.scroll_to(40.0, 0.0);
        assert_eq!(surface.viewport(), Viewport {
            cursor_start: 1,
            cursor_end: 3,
            scroll_top: 40.0,
            scroll_left: 0.0,
        });
    }
}
