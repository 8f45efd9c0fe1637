//! Tile kinds and the fixed-size tile grid used for collision and drawing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A built-in tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Grass,
    Stone,
    Water,
    Tree,
}

impl Tile {
    pub const ALL: [Tile; 4] = [Tile::Grass, Tile::Stone, Tile::Water, Tile::Tree];

    /// Numeric id of the kind.
    pub const fn id(self) -> u8 {
        match self {
            Tile::Grass => 0,
            Tile::Stone => 1,
            Tile::Water => 2,
            Tile::Tree => 3,
        }
    }

    /// Whether entities are blocked from entering this tile.
    pub const fn is_solid(self) -> bool {
        !matches!(self, Tile::Grass)
    }

    pub const fn texture_path(self) -> &'static str {
        match self {
            Tile::Grass => "grass.png",
            Tile::Stone => "stone.png",
            Tile::Water => "water.png",
            Tile::Tree => "tree.png",
        }
    }

    /// Kind with the given numeric id.
    pub fn from_id(id: u8) -> Option<Tile> {
        Tile::ALL.into_iter().find(|t| t.id() == id)
    }
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// Row-major grid of tiles with its origin at the top-left corner.
///
/// Anything outside the grid reads as [`Tile::Stone`], so the world edge is
/// always solid. Deserializing checks the same invariants as [`TileGrid::new`]
/// and rejects a tile list whose length is not `width * height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTileGrid")]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: u32,
    tiles: Vec<Tile>,
}

/// Unchecked wire form of [`TileGrid`].
#[derive(Deserialize)]
struct RawTileGrid {
    width: usize,
    height: usize,
    tile_size: u32,
    tiles: Vec<Tile>,
}

impl TryFrom<RawTileGrid> for TileGrid {
    type Error = String;

    fn try_from(raw: RawTileGrid) -> Result<Self, Self::Error> {
        if raw.tile_size == 0 {
            return Err("tile_size must be non-zero".to_owned());
        }
        let expected = raw
            .width
            .checked_mul(raw.height)
            .ok_or_else(|| format!("grid of {}x{} tiles is too large", raw.width, raw.height))?;
        if raw.tiles.len() != expected {
            return Err(format!(
                "{}x{} grid needs {expected} tiles, got {}",
                raw.width,
                raw.height,
                raw.tiles.len()
            ));
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            tile_size: raw.tile_size,
            tiles: raw.tiles,
        })
    }
}

impl TileGrid {
    /// Tile returned for every out-of-bounds read.
    pub const BOUNDARY: Tile = Tile::Stone;

    /// A `width` x `height` grid filled with grass.
    ///
    /// # Panics
    ///
    /// Panics if `tile_size` is zero.
    pub fn new(width: usize, height: usize, tile_size: u32) -> Self {
        assert!(tile_size > 0, "tile_size must be non-zero");
        Self {
            width,
            height,
            tile_size,
            tiles: vec![Tile::Grass; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn slot(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Tile at grid cell `(x, y)`, or [`Self::BOUNDARY`] outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.slot(x, y).map_or(Self::BOUNDARY, |i| self.tiles[i])
    }

    /// Set the tile at `(x, y)`. Writes outside the grid are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        match self.slot(x, y) {
            Some(i) => self.tiles[i] = tile,
            None => tracing::trace!(x, y, "ignoring out-of-bounds tile write"),
        }
    }

    /// Grid cell containing world point `(wx, wy)`.
    ///
    /// The division truncates toward zero, so points in `(-tile_size, 0)`
    /// land in cell 0.
    pub fn world_to_cell(&self, wx: f32, wy: f32) -> (i32, i32) {
        let ts = self.tile_size as f32;
        ((wx / ts) as i32, (wy / ts) as i32)
    }

    /// Tile under world point `(wx, wy)`.
    pub fn tile_at_world(&self, wx: f32, wy: f32) -> Tile {
        let (x, y) = self.world_to_cell(wx, wy);
        self.tile(x, y)
    }

    /// Whether the world point `(wx, wy)` is inside a solid tile.
    pub fn is_solid_at(&self, wx: f32, wy: f32) -> bool {
        self.tile_at_world(wx, wy).is_solid()
    }

    /// Fill the outermost ring of cells with `tile`.
    pub fn fill_border(&mut self, tile: Tile) {
        let (w, h) = (self.width as i32, self.height as i32);
        for x in 0..w {
            self.set_tile(x, 0, tile);
            self.set_tile(x, h - 1, tile);
        }
        for y in 0..h {
            self.set_tile(0, y, tile);
            self.set_tile(w - 1, y, tile);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
