//! Sprite sheets
//!
//! Sheets are decoded from PNG files when available. Anything missing falls
//! back to a flat-colour placeholder so the hub always renders.
//! Tile 0 of every placeholder sheet is transparent.

use std::path::Path;

use super::surface::{Rgba, Surface};
use super::tiles::TileSet;
use crate::consts::*;
use crate::content::{SCROLLER_CHAR_WIDTH, SCROLLER_TILES_PER_GLYPH, tiles};
use crate::sim::HubWorld;

const SHEET_COLUMNS: i32 = 16;

/// Every tile set the scene draws with
#[derive(Debug, Clone)]
pub struct SpriteSheets {
    /// 32x32 level tiles
    pub level: TileSet,
    /// 64x64 character frames, 0..=9 facing right, 10..=19 facing left
    pub character: TileSet,
    /// 32x20 sine sprites
    pub sine: TileSet,
    /// 32x80 marquee font columns
    pub font: TileSet,
}

impl SpriteSheets {
    /// Placeholder sheets large enough for every index the world uses
    pub fn placeholder(world: &HubWorld) -> Self {
        Self::from_sheets(
            &level_sheet(level_tile_count(world)),
            &character_sheet(),
            &sine_sheet(),
            &font_sheet(font_tile_count(world)),
        )
    }

    /// Decode `tiles.png`, `dude.png`, `carebears.png` and `chrome.png` from
    /// `dir`, substituting a placeholder for each file that is missing or broken
    pub fn load(dir: impl AsRef<Path>, world: &HubWorld) -> Self {
        let dir = dir.as_ref();
        let sheet = |name: &str, fallback: &dyn Fn() -> Surface| {
            let path = dir.join(name);
            match load_png(&path) {
                Ok(surface) => {
                    log::info!("Loaded {} ({}x{})", path.display(), surface.width(), surface.height());
                    surface
                }
                Err(e) => {
                    log::warn!("Missing asset {} ({}), using placeholder", path.display(), e);
                    fallback()
                }
            }
        };

        Self::from_sheets(
            &sheet("tiles.png", &|| level_sheet(level_tile_count(world))),
            &sheet("dude.png", &character_sheet),
            &sheet("carebears.png", &sine_sheet),
            &sheet("chrome.png", &|| font_sheet(font_tile_count(world))),
        )
    }

    fn from_sheets(level: &Surface, character: &Surface, sine: &Surface, font: &Surface) -> Self {
        Self {
            level: TileSet::new(level, TILE_SIZE, TILE_SIZE),
            character: TileSet::new(character, DUDE_SIZE, DUDE_SIZE),
            sine: TileSet::new(sine, CAREBEAR_TILE_W, CAREBEAR_TILE_H),
            font: TileSet::new(font, SCROLL_TILE_W, SCROLL_TILE_H),
        }
    }
}

/// Decode a PNG into a surface
pub fn load_png(path: &Path) -> image::ImageResult<Surface> {
    let rgba = image::open(path)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    Surface::from_rgba8(w as i32, h as i32, rgba.as_raw()).ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })
}

fn level_tile_count(world: &HubWorld) -> i32 {
    (world.level.max_tile_index() as i32 + 1).max(tiles::DOOR_FRAME as i32 + 12)
}

fn font_tile_count(world: &HubWorld) -> i32 {
    (world.scroller.max_tile_index() as i32 + 1)
        .max((SCROLLER_CHAR_WIDTH.len() * SCROLLER_TILES_PER_GLYPH) as i32)
}

/// Lay out `count` tiles row-major, `columns` wide, painting each in place
fn build_sheet(count: i32, columns: i32, tile_w: i32, tile_h: i32, paint: impl Fn(i32, &mut Surface)) -> Surface {
    let rows = (count + columns - 1) / columns;
    let mut sheet = Surface::new(columns * tile_w, rows.max(1) * tile_h);
    for i in 1..count {
        let mut tile = Surface::new(tile_w, tile_h);
        paint(i, &mut tile);
        sheet.draw(&tile, (i % columns) * tile_w, (i / columns) * tile_h);
    }
    sheet
}

fn level_sheet(count: i32) -> Surface {
    build_sheet(count, SHEET_COLUMNS, TILE_SIZE, TILE_SIZE, |i, tile| {
        let i = i as u32;
        match i {
            tiles::BACKDROP => {
                tile.fill(Rgba::opaque(12, 14, 40));
                tile.fill_rect(0, 0, 16, 16, Rgba::opaque(16, 20, 52));
                tile.fill_rect(16, 16, 16, 16, Rgba::opaque(16, 20, 52));
            }
            FLOOR_TILE => {
                tile.fill(Rgba::opaque(96, 64, 32));
                tile.fill_rect(0, 0, TILE_SIZE, 6, Rgba::opaque(60, 200, 70));
            }
            tiles::EARTH => tile.fill(Rgba::opaque(96, 64, 32)),
            i if (tiles::DOOR_FRAME..tiles::DOOR_FRAME + 12).contains(&i) => {
                tile.fill(Rgba::opaque(150, 90, 200));
                tile.fill_rect(3, 3, TILE_SIZE - 6, TILE_SIZE - 6, Rgba::opaque(40, 10, 60));
            }
            _ => tile.fill(Rgba::opaque(
                (40 + (i * 7) % 180) as u8,
                (60 + (i * 11) % 160) as u8,
                (90 + (i * 13) % 120) as u8,
            )),
        }
    })
}

/// 10 x 2 frames: thrust 0..=1, walk 2..=9, then the same facing left
fn character_sheet() -> Surface {
    let mut sheet = Surface::new(10 * DUDE_SIZE, 2 * DUDE_SIZE);
    for frame in 0..20 {
        let left = frame >= 10;
        let pose = frame % 10;
        let mut tile = Surface::new(DUDE_SIZE, DUDE_SIZE);

        // Body and head
        tile.fill_rect(20, 24, 24, 28, Rgba::opaque(230, 200, 60));
        tile.fill_rect(22, 6, 20, 18, Rgba::opaque(250, 220, 170));
        let eye_x = if left { 24 } else { 36 };
        tile.fill_rect(eye_x, 12, 4, 4, Rgba::BLACK);

        if pose < 2 {
            // Jet flame, flickering between the two frames
            let len = if pose == 0 { 8 } else { 12 };
            tile.fill_rect(26, 52, 12, len, Rgba::opaque(255, 120, 20));
        } else {
            // Legs swing with the walk phase
            let stride = (pose - 2) % 4 * 2;
            tile.fill_rect(22 + stride, 52, 6, 12, Rgba::opaque(60, 60, 200));
            tile.fill_rect(36 - stride, 52, 6, 12, Rgba::opaque(60, 60, 200));
        }

        sheet.draw(&tile, (frame % 10) * DUDE_SIZE, (frame / 10) * DUDE_SIZE);
    }
    sheet
}

/// A row of twelve coloured blobs
fn sine_sheet() -> Surface {
    let mut sheet = Surface::new(12 * CAREBEAR_TILE_W, CAREBEAR_TILE_H);
    for i in 0..12 {
        let color = Rgba::opaque((80 + i * 12) as u8, (160 - i * 5) as u8, (120 + i * 8) as u8);
        let x = i * CAREBEAR_TILE_W;
        sheet.fill_rect(x + 4, 2, CAREBEAR_TILE_W - 8, CAREBEAR_TILE_H - 4, color);
        sheet.fill_rect(x + 2, 5, CAREBEAR_TILE_W - 4, CAREBEAR_TILE_H - 10, color);
    }
    sheet
}

/// Three columns per glyph; the space glyph (tiles 0..3) stays empty
fn font_sheet(count: i32) -> Surface {
    let slots = SCROLLER_TILES_PER_GLYPH as i32;
    build_sheet(count, SHEET_COLUMNS, SCROLL_TILE_W, SCROLL_TILE_H, |i, tile| {
        if i < slots {
            return;
        }
        let color = Rgba::opaque(
            (30 + (i * 9) % 180) as u8,
            (30 + (i * 5) % 140) as u8,
            (30 + (i * 7) % 200) as u8,
        );
        // Solid column with a per-glyph notch so neighbouring letters differ
        let top = 10;
        let bottom = SCROLL_TILE_H - 10;
        let notch = top + (i / slots) % 6 * 8;
        tile.fill_rect(2, top, SCROLL_TILE_W - 4, notch - top, color);
        tile.fill_rect(2, notch, 8, 8, color);
        tile.fill_rect(SCROLL_TILE_W - 10, notch, 8, 8, color);
        tile.fill_rect(2, notch + 8, SCROLL_TILE_W - 4, bottom - notch - 8, color);
    })
}
