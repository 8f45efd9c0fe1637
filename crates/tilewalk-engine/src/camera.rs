//! Scrolling camera with exponential smoothing towards a followed entity.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tilewalk_ecs::prelude::*;

use crate::tile::TileGrid;

/// Fraction of the remaining distance covered per update.
///
/// Applied once per update call and not scaled by `dt`, so the feel of the
/// follow depends on the frame rate.
pub const SMOOTHING: f32 = 0.1;

/// Grid cells overlapping the view, as half-open column and row ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleTiles {
    pub columns: Range<usize>,
    pub rows: Range<usize>,
}

/// Top-left world position of the view plus its size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub view_width: f32,
    pub view_height: f32,
    target: Option<EntityId>,
}

impl Camera {
    /// A camera at the origin following nothing.
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            view_width,
            view_height,
            target: None,
        }
    }

    /// Follow `entity` from the next update on.
    pub fn follow(&mut self, entity: EntityId) {
        self.target = Some(entity);
    }

    pub fn unfollow(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Move a [`SMOOTHING`] fraction of the way towards centring the target.
    ///
    /// Stays put when there is no target or the target has no position.
    pub fn update(&mut self, world: &World) {
        let Some(pos) = self.target.and_then(|e| world.get::<Position>(e)) else {
            return;
        };
        let desired_x = pos.x - self.view_width / 2.0;
        let desired_y = pos.y - self.view_height / 2.0;
        self.x += (desired_x - self.x) * SMOOTHING;
        self.y += (desired_y - self.y) * SMOOTHING;
    }

    /// Cells to draw for `grid`: from the cell under the view's top-left
    /// corner, one view's worth of cells plus a margin of two, clamped to the
    /// grid.
    pub fn visible_tiles(&self, grid: &TileGrid) -> VisibleTiles {
        let ts = grid.tile_size() as f32;
        let span = |origin: f32, view: f32, limit: usize| {
            let start = ((origin / ts) as i64).max(0) as usize;
            let end = (start + (view / ts) as usize + 2).min(limit);
            start.min(end)..end
        };
        VisibleTiles {
            columns: span(self.x, self.view_width, grid.width()),
            rows: span(self.y, self.view_height, grid.height()),
        }
    }

    /// Screen coordinates of world point `(wx, wy)`.
    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx - self.x, wy - self.y)
    }

    /// Whether a `width` x `height` sprite at world `(wx, wy)` overlaps the
    /// view.
    pub fn is_visible(&self, wx: f32, wy: f32, width: f32, height: f32) -> bool {
        let (sx, sy) = self.world_to_screen(wx, wy);
        sx > -width && sx < self.view_width && sy > -height && sy < self.view_height
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
