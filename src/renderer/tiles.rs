//! Fixed-size tiles sliced from a sprite sheet

use super::surface::Surface;

/// Equal-sized tiles cut row-major out of a sheet
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Surface>,
    pub tile_w: i32,
    pub tile_h: i32,
    pub columns: i32,
}

impl TileSet {
    /// Slice `sheet` into `tile_w` x `tile_h` tiles.
    ///
    /// Non-positive sizes are treated as 1, and a sheet smaller than one tile
    /// still yields a single (padded) tile.
    pub fn new(sheet: &Surface, tile_w: i32, tile_h: i32) -> Self {
        let tile_w = tile_w.max(1);
        let tile_h = tile_h.max(1);
        let columns = (sheet.width() / tile_w).max(1);
        let rows = (sheet.height() / tile_h).max(1);

        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                tiles.push(sheet.sub_surface(col * tile_w, row * tile_h, tile_w, tile_h));
            }
        }

        Self {
            tiles,
            tile_w,
            tile_h,
            columns,
        }
    }

    /// Tile by index. Negative indices map to 0, indices past the end wrap.
    pub fn tile(&self, index: i32) -> &Surface {
        let index = index.max(0) as usize % self.tiles.len();
        &self.tiles[index]
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
