//! Scene render pass.
//!
//! [`render_scene`] issues the draw calls for one state: the visible tiles
//! row by row from the top, then every on-screen entity with a `Position` and
//! a `Render` in registry order, then the overlay lines. Clearing and
//! presenting the frame is up to the caller.

pub mod renderer;

pub use renderer::{DrawCall, LogRenderer, RecordingRenderer, Renderer};

use tilewalk_ecs::prelude::*;

use crate::camera::Camera;
use crate::tile::TileGrid;

/// Draw `tiles`, then `world`'s sprites, then `overlay`, as seen by `camera`.
pub fn render_scene(
    renderer: &mut dyn Renderer,
    tiles: &TileGrid,
    world: &World,
    camera: &Camera,
    overlay: &[String],
) {
    let ts = tiles.tile_size();
    let visible = camera.visible_tiles(tiles);
    for y in visible.rows.clone() {
        for x in visible.columns.clone() {
            let tile = tiles.tile(x as i32, y as i32);
            let (sx, sy) = camera.world_to_screen((x as u32 * ts) as f32, (y as u32 * ts) as f32);
            renderer.draw_tile(tile.texture_path(), sx, sy, ts);
        }
    }

    for (_, (pos, render)) in world.query::<(&Position, &Render)>() {
        let (w, h) = (render.width as f32, render.height as f32);
        if !camera.is_visible(pos.x, pos.y, w, h) {
            continue;
        }
        let (sx, sy) = camera.world_to_screen(pos.x, pos.y);
        renderer.draw_entity(&render.texture_path, sx, sy, render.width, render.height);
    }

    if !overlay.is_empty() {
        renderer.draw_overlay(overlay);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    #[test]
    fn tiles_then_entities_then_overlay() {
        let mut tiles = TileGrid::new(2, 2, 32);
        tiles.set_tile(1, 0, Tile::Water);
        let mut world = World::new();
        world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(10.0, 20.0))
                .with(Render::new("player.png", 32, 32)),
        );
        world.spawn_with(Position::new(0.0, 0.0));
        let camera = Camera::new(800.0, 600.0);

        let mut r = RecordingRenderer::new();
        render_scene(&mut r, &tiles, &world, &camera, &["hint".to_owned()]);

        let calls = r.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(
            calls[1],
            DrawCall::Tile {
                texture: "water.png".to_owned(),
                x: 32.0,
                y: 0.0,
                size: 32
            }
        );
        assert!(matches!(calls[2], DrawCall::Tile { y, .. } if y == 32.0));
        assert_eq!(
            calls[4],
            DrawCall::Entity {
                texture: "player.png".to_owned(),
                x: 10.0,
                y: 20.0,
                width: 32,
                height: 32
            }
        );
        assert_eq!(calls[5], DrawCall::Overlay(vec!["hint".to_owned()]));
    }

    #[test]
    fn off_screen_entities_are_culled() {
        let tiles = TileGrid::new(1, 1, 32);
        let mut world = World::new();
        world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(2_000.0, 0.0))
                .with(Render::new("npc.png", 32, 32)),
        );
        let mut r = RecordingRenderer::new();
        render_scene(&mut r, &tiles, &world, &Camera::new(800.0, 600.0), &[]);
        assert!(r.calls().iter().all(|c| matches!(c, DrawCall::Tile { .. })));
    }

    #[test]
    fn camera_offset_shifts_everything() {
        let tiles = TileGrid::new(4, 4, 32);
        let world = World::new();
        let mut camera = Camera::new(64.0, 64.0);
        camera.x = 40.0;
        camera.y = 0.0;
        let mut r = RecordingRenderer::new();
        render_scene(&mut r, &tiles, &world, &camera, &[]);
        assert_eq!(
            r.calls()[0],
            DrawCall::Tile {
                texture: "grass.png".to_owned(),
                x: -8.0,
                y: 0.0,
                size: 32
            }
        );
    }
}
