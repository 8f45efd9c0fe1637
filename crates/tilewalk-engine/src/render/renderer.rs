//! The drawing surface the engine talks to, and two headless surfaces.
//!
//! A real window adapter implements [`Renderer`] by blitting textures; the
//! engine itself only issues calls. [`RecordingRenderer`] keeps every call
//! as a [`DrawCall`] for inspection, and [`LogRenderer`] reports each frame
//! through `tracing`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// A 2D drawing surface. Coordinates are screen pixels, origin top-left.
pub trait Renderer {
    /// Start a new frame.
    fn clear(&mut self);
    /// Draw a square tile texture of `size` pixels.
    fn draw_tile(&mut self, texture: &str, x: f32, y: f32, size: u32);
    /// Draw an entity sprite.
    fn draw_entity(&mut self, texture: &str, x: f32, y: f32, width: u32, height: u32);
    /// Draw text lines over the scene.
    fn draw_overlay(&mut self, _lines: &[String]) {}
    /// Show the finished frame.
    fn present(&mut self);
}

// ---------------------------------------------------------------------------
// DrawCall
// ---------------------------------------------------------------------------

/// One recorded [`Renderer`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCall {
    Clear,
    Tile {
        texture: String,
        x: f32,
        y: f32,
        size: u32,
    },
    Entity {
        texture: String,
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
    Overlay(Vec<String>),
    Present,
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// Stores every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Vec<DrawCall>,
    frames_presented: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call since construction or the last [`take_calls`](Self::take_calls).
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Calls belonging to the most recent complete frame, from its `Clear`
    /// through its `Present`.
    pub fn last_frame(&self) -> &[DrawCall] {
        let Some(end) = self.calls.iter().rposition(|c| *c == DrawCall::Present) else {
            return &[];
        };
        let start = self.calls[..end]
            .iter()
            .rposition(|c| *c == DrawCall::Clear)
            .unwrap_or(0);
        &self.calls[start..=end]
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn draw_tile(&mut self, texture: &str, x: f32, y: f32, size: u32) {
        self.calls.push(DrawCall::Tile {
            texture: texture.to_owned(),
            x,
            y,
            size,
        });
    }

    fn draw_entity(&mut self, texture: &str, x: f32, y: f32, width: u32, height: u32) {
        self.calls.push(DrawCall::Entity {
            texture: texture.to_owned(),
            x,
            y,
            width,
            height,
        });
    }

    fn draw_overlay(&mut self, lines: &[String]) {
        self.calls.push(DrawCall::Overlay(lines.to_vec()));
    }

    fn present(&mut self) {
        self.calls.push(DrawCall::Present);
        self.frames_presented += 1;
    }
}

// ---------------------------------------------------------------------------
// LogRenderer
// ---------------------------------------------------------------------------

/// Counts draws per frame and logs a summary on present. Sprites are logged
/// individually at trace level.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frame: u64,
    tiles: usize,
    entities: usize,
    overlay: Vec<String>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Renderer for LogRenderer {
    fn clear(&mut self) {
        self.tiles = 0;
        self.entities = 0;
        self.overlay.clear();
    }

    fn draw_tile(&mut self, _texture: &str, _x: f32, _y: f32, _size: u32) {
        self.tiles += 1;
    }

    fn draw_entity(&mut self, texture: &str, x: f32, y: f32, width: u32, height: u32) {
        self.entities += 1;
        tracing::trace!(texture, x, y, width, height, "draw entity");
    }

    fn draw_overlay(&mut self, lines: &[String]) {
        self.overlay = lines.to_vec();
    }

    fn present(&mut self) {
        self.frame += 1;
        tracing::debug!(
            frame = self.frame,
            tiles = self.tiles,
            entities = self.entities,
            overlay = %self.overlay.join(" / "),
            "frame presented"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_frame_spans_clear_to_present() {
        let mut r = RecordingRenderer::new();
        r.clear();
        r.draw_tile("grass.png", 0.0, 0.0, 32);
        r.present();
        r.clear();
        r.draw_entity("npc.png", 1.0, 2.0, 32, 32);
        r.present();
        r.clear();

        let frame = r.last_frame();
        assert_eq!(frame.len(), 3);
        assert!(matches!(frame[1], DrawCall::Entity { .. }));
        assert_eq!(r.frames_presented(), 2);
    }

    #[test]
    fn overlay_is_a_no_op_by_default() {
        struct Bare(usize);
        impl Renderer for Bare {
            fn clear(&mut self) {}
            fn draw_tile(&mut self, _: &str, _: f32, _: f32, _: u32) {
                self.0 += 1;
            }
            fn draw_entity(&mut self, _: &str, _: f32, _: f32, _: u32, _: u32) {}
            fn present(&mut self) {}
        }
        let mut bare = Bare(0);
        bare.draw_overlay(&["hello".to_owned()]);
        assert_eq!(bare.0, 0);
    }

    #[test]
    fn log_renderer_counts_frames() {
        let mut r = LogRenderer::new();
        r.clear();
        r.draw_tile("grass.png", 0.0, 0.0, 32);
        r.present();
        assert_eq!(r.frame(), 1);
    }
}
