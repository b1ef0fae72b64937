//! Tile grid geometry and windowed drawing
//!
//! A `TileMap` is an immutable row-major grid of tile indices. The simulation
//! reads it for floor collision, the renderer draws a camera window of it.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::renderer::{Surface, TileSet};

/// A rectangular grid of tile indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// Rows of tile indices (row-major)
    pub data: Vec<Vec<u32>>,
    pub tile_w: i32,
    pub tile_h: i32,
    /// Derived pixel width (columns of the first row * tile width)
    pub width_px: i32,
    /// Derived pixel height (rows * tile height)
    pub height_px: i32,
}

impl TileMap {
    pub fn new(data: Vec<Vec<u32>>, tile_w: i32, tile_h: i32) -> Self {
        let tile_w = tile_w.max(1);
        let tile_h = tile_h.max(1);
        let width_px = data.first().map_or(0, |row| row.len() as i32 * tile_w);
        let height_px = data.len() as i32 * tile_h;
        Self {
            data,
            tile_w,
            tile_h,
            width_px,
            height_px,
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns (taken from the first row)
    #[inline]
    pub fn columns(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.columns() == 0
    }

    /// Tile index at a grid coordinate, `None` outside the grid
    pub fn tile_at(&self, col: i32, row: i32) -> Option<u32> {
        if col < 0 || row < 0 {
            return None;
        }
        self.data
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Largest tile index in the grid (0 for an empty map)
    pub fn max_tile_index(&self) -> u32 {
        self.data
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Clamp a requested scroll offset so the view never leaves the content.
    ///
    /// Each axis is clamped into `[0, content - view]`, or pinned to 0 when the
    /// content is smaller than the view.
    pub fn clip(&self, offset: IVec2, view: IVec2) -> IVec2 {
        let max_x = (self.width_px - view.x).max(0);
        let max_y = (self.height_px - view.y).max(0);
        IVec2::new(offset.x.clamp(0, max_x), offset.y.clamp(0, max_y))
    }

    /// Draw a `view`-sized window of the map, scrolled by `offset`, at `dst_pos`.
    ///
    /// The window covers `view / tile + 2` tiles per axis so partially visible
    /// edge tiles are included. Grid coordinates outside the map are skipped.
    pub fn draw(&self, tiles: &TileSet, dst: &mut Surface, offset: IVec2, dst_pos: IVec2, view: IVec2) {
        if self.is_empty() || tiles.is_empty() {
            return;
        }
        let offset = self.clip(offset, view);
        let start_x = offset.x / self.tile_w;
        let start_y = offset.y / self.tile_h;
        let off_x = offset.x % self.tile_w;
        let off_y = offset.y % self.tile_h;
        let tiles_x = view.x / self.tile_w + 2;
        let tiles_y = view.y / self.tile_h + 2;

        for y in 0..tiles_y {
            for x in 0..tiles_x {
                let Some(index) = self.tile_at(start_x + x, start_y + y) else {
                    continue;
                };
                let px = dst_pos.x + x * self.tile_w - off_x;
                let py = dst_pos.y + y * self.tile_h - off_y;
                dst.draw(tiles.tile(index as i32), px, py);
            }
        }
    }

    /// Like [`TileMap::draw`], but the horizontal offset wraps around the
    /// map's pixel width instead of clamping, so the strip loops forever.
    pub fn draw_wrapped(&self, tiles: &TileSet, dst: &mut Surface, offset_x: i64, dst_pos: IVec2, view: IVec2) {
        if self.is_empty() || tiles.is_empty() || self.width_px <= 0 {
            return;
        }
        let offset = offset_x.rem_euclid(self.width_px as i64) as i32;
        let columns = self.columns() as i32;
        let start_x = offset / self.tile_w;
        let off_x = offset % self.tile_w;
        let tiles_x = view.x / self.tile_w + 2;
        let tiles_y = (view.y / self.tile_h + 2).min(self.rows() as i32);

        for y in 0..tiles_y {
            for x in 0..tiles_x {
                let col = (start_x + x) % columns;
                let Some(index) = self.tile_at(col, y) else {
                    continue;
                };
                let px = dst_pos.x + x * self.tile_w - off_x;
                let py = dst_pos.y + y * self.tile_h;
                dst.draw(tiles.tile(index as i32), px, py);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgba;

    fn map(cols: usize, rows: usize) -> TileMap {
        let data = (0..rows)
            .map(|r| (0..cols).map(|c| (r * cols + c) as u32).collect())
            .collect();
        TileMap::new(data, 32, 32)
    }

    #[test]
    fn test_derived_size() {
        let m = map(10, 4);
        assert_eq!(m.width_px, 320);
        assert_eq!(m.height_px, 128);
        assert_eq!(m.max_tile_index(), 39);
    }

    #[test]
    fn test_clip_too_far_right_and_negative() {
        let m = map(40, 20); // 1280 x 640
        let view = IVec2::new(768, 400);
        assert_eq!(m.clip(IVec2::new(m.width_px, 0), view).x, m.width_px - 768);
        assert_eq!(m.clip(IVec2::new(-50, 0), view).x, 0);
        assert_eq!(m.clip(IVec2::new(100, 9999), view).y, 640 - 400);
    }

    #[test]
    fn test_clip_content_smaller_than_view() {
        let m = map(4, 2);
        let clipped = m.clip(IVec2::new(500, 500), IVec2::new(768, 400));
        assert_eq!(clipped, IVec2::ZERO);
    }

    /// 2x1 sheet of 32px tiles: 0 black, 1 white
    fn two_tone() -> TileSet {
        let mut sheet = Surface::filled(64, 32, Rgba::BLACK);
        sheet.fill_rect(32, 0, 32, 32, Rgba::WHITE);
        TileSet::new(&sheet, 32, 32)
    }

    #[test]
    fn test_draw_clamps_offset() {
        let m = TileMap::new(vec![vec![0, 0, 1, 1]], 32, 32);
        let mut dst = Surface::new(64, 32);
        m.draw(&two_tone(), &mut dst, IVec2::new(9999, 0), IVec2::ZERO, IVec2::new(64, 32));
        // Clamped to the last full window: both visible tiles are white
        assert_eq!(dst.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(dst.pixel(63, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_wrapped_loops_past_the_end() {
        let m = TileMap::new(vec![vec![0, 0, 1, 1]], 32, 32);
        let tiles = two_tone();
        let view = IVec2::new(64, 32);

        let mut dst = Surface::new(64, 32);
        m.draw_wrapped(&tiles, &mut dst, 96, IVec2::ZERO, view);
        // Last column, then wraps to the first
        assert_eq!(dst.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(dst.pixel(32, 0), Some(Rgba::BLACK));

        let mut again = Surface::new(64, 32);
        m.draw_wrapped(&tiles, &mut again, 96 + m.width_px as i64 * 3, IVec2::ZERO, view);
        assert_eq!(dst, again);
    }

    #[test]
    fn test_tile_at_out_of_bounds() {
        let m = map(3, 3);
        assert_eq!(m.tile_at(2, 2), Some(8));
        assert_eq!(m.tile_at(3, 0), None);
        assert_eq!(m.tile_at(-1, 0), None);
        assert_eq!(TileMap::new(Vec::new(), 32, 32).tile_at(0, 0), None);
    }
}
