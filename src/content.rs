//! Hub content tables
//!
//! The level grid, the door table and the marquee text are fixed data handed
//! to the simulation. A built-in set ships with the crate; alternative sets can
//! be read from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::FLOOR_TILE;

/// Errors raised while reading content tables from disk
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level map has no rows")]
    Empty,
    #[error("level row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A named door on the level. The hit-box spans 4x3 tiles from `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Tile column of the hit-box's left edge
    pub x: i32,
    /// Tile row of the hit-box's top edge
    pub y: i32,
    pub name: String,
}

impl Door {
    pub const WIDTH: i32 = 4;
    pub const HEIGHT: i32 = 3;

    pub fn new(x: i32, y: i32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: name.into(),
        }
    }

    /// Whether a tile coordinate is inside the hit-box
    pub fn contains_tile(&self, tile_x: i32, tile_y: i32) -> bool {
        tile_x >= self.x
            && tile_x <= self.x + Self::WIDTH - 1
            && tile_y >= self.y
            && tile_y < self.y + Self::HEIGHT
    }
}

/// Everything the hub needs besides sprite sheets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubContent {
    /// Level grid, row-major, rows of equal length
    pub level: Vec<Vec<u32>>,
    /// Doors in autopilot visiting order; the last entry is never auto-targeted
    #[serde(default)]
    pub doors: Vec<Door>,
    /// Marquee message
    #[serde(default)]
    pub scroller_text: String,
}

impl HubContent {
    /// Read a content set from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let json = fs::read_to_string(path.as_ref())?;
        let content = Self::from_json(&json)?;
        log::info!(
            "Loaded hub content from {}: {}x{} tiles, {} doors",
            path.as_ref().display(),
            content.level.first().map_or(0, Vec::len),
            content.level.len(),
            content.doors.len()
        );
        Ok(content)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    /// Check the level is a non-empty rectangle
    pub fn validate(&self) -> Result<(), ContentError> {
        let expected = self.level.first().map(Vec::len).ok_or(ContentError::Empty)?;
        if let Some((row, r)) = self.level.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ContentError::Ragged {
                row,
                expected,
                found: r.len(),
            });
        }
        Ok(())
    }

    /// The content set that ships with the hub
    pub fn builtin() -> Self {
        let doors = builtin_doors();
        Self {
            level: builtin_level(&doors),
            doors,
            scroller_text: SCROLL_TEXT.to_string(),
        }
    }
}

/// Level grid dimensions of the built-in map
pub const LEVEL_COLUMNS: usize = 464;
pub const LEVEL_ROWS: usize = 24;
/// Row holding the ground floor tiles
pub const GROUND_ROW: usize = 22;
/// Row holding the raised platforms that carry upper doors
pub const PLATFORM_ROW: usize = 14;
/// Row of the small floating ledges
pub const LEDGE_ROW: usize = 18;

/// Tile ids used by the built-in level
pub mod tiles {
    pub const EMPTY: u32 = 0;
    pub const BACKDROP: u32 = 1;
    pub const EARTH: u32 = 70;
    /// First tile of the 4x3 door frame block
    pub const DOOR_FRAME: u32 = 80;
}

fn builtin_doors() -> Vec<Door> {
    vec![
        Door::new(16, 19, "COPPER BARS"),
        Door::new(40, 11, "STARFIELD"),
        Door::new(70, 19, "PLASMA"),
        Door::new(100, 11, "ROTOZOOMER"),
        Door::new(135, 19, "VECTOR BALLS"),
        Door::new(170, 11, "TWISTER"),
        Door::new(210, 19, "DOT TUNNEL"),
        Door::new(250, 11, "FIRE"),
        Door::new(300, 19, "BIG SCROLLER"),
        Door::new(350, 11, "GLENZ VECTORS"),
        Door::new(400, 19, "CREDITS"),
    ]
}

const LEDGES: [(usize, usize); 6] = [
    (55, 60),
    (120, 125),
    (190, 195),
    (275, 280),
    (325, 330),
    (375, 380),
];

fn builtin_level(doors: &[Door]) -> Vec<Vec<u32>> {
    let mut level = vec![vec![tiles::EMPTY; LEVEL_COLUMNS]; LEVEL_ROWS];

    level[GROUND_ROW].fill(FLOOR_TILE);
    for row in level.iter_mut().skip(GROUND_ROW + 1) {
        row.fill(tiles::EARTH);
    }

    for &(from, to) in &LEDGES {
        level[LEDGE_ROW][from..=to].fill(FLOOR_TILE);
    }

    for door in doors {
        let (dx, dy) = (door.x.max(0) as usize, door.y.max(0) as usize);
        // Upper doors stand on a platform three rows below the hit-box top
        if dy + 3 == PLATFORM_ROW {
            let from = dx.saturating_sub(2);
            let to = (dx + 7).min(LEVEL_COLUMNS - 1);
            level[PLATFORM_ROW][from..=to].fill(FLOOR_TILE);
        }
        for fy in 0..Door::HEIGHT as usize {
            for fx in 0..Door::WIDTH as usize {
                if let Some(cell) = level.get_mut(dy + fy).and_then(|r| r.get_mut(dx + fx)) {
                    *cell = tiles::DOOR_FRAME + (fy * Door::WIDTH as usize + fx) as u32;
                }
            }
        }
    }

    level
}

/// Built-in marquee text. The font only covers ASCII 32..=90.
pub const SCROLL_TEXT: &str = "WELCOME TO THE DEMO HUB!   \
WALK OR FLY TO A DOOR AND PRESS SPACE TO ENTER...   \
ARROWS OR Z/X TO WALK, UP OR ENTER TO THRUST.   \
LEAVE THE KEYS ALONE FOR TWO MINUTES AND THE AUTOPILOT WILL GIVE YOU THE TOUR.   \
GREETINGS TO EVERYONE STILL CODING FOR FUN AT 50 FPS...   \
TEXT RESTARTS...      ";

/// Tile columns occupied by each glyph, indexed by `char - 32`
pub const SCROLLER_CHAR_WIDTH: [usize; 59] = [
    1, 1, 1, 2, 2, 2, 2, 1, 1, 1, 2, 2, 1, 2, 1, 2, // ' ' .. '/'
    2, 1, 2, 2, 2, 2, 2, 2, 2, 2, // '0' .. '9'
    1, 1, 2, 2, 2, 2, 3, // ':' .. '@'
    2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 3, // 'A' .. 'M'
    2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 2, 2, 2, // 'N' .. 'Z'
];

/// Tile slots reserved per glyph in the font sheet
pub const SCROLLER_TILES_PER_GLYPH: usize = 3;

/// Expand marquee text into a single row of font tile indices.
///
/// Line breaks are dropped. Glyph `p` (its code minus 32) occupies the tiles
/// `p * 3 ..` for as many columns as its width. Unknown glyphs render as space.
pub fn build_scroll_map(text: &str) -> Vec<u32> {
    text.chars()
        .filter(|&c| c != '\n' && c != '\r')
        .flat_map(|c| {
            let p = (c as usize)
                .checked_sub(32)
                .filter(|&p| p < SCROLLER_CHAR_WIDTH.len())
                .unwrap_or(0);
            (0..SCROLLER_CHAR_WIDTH[p]).map(move |j| (p * SCROLLER_TILES_PER_GLYPH + j) as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_scroll_map_expands_by_width() {
        // 'A' = 33 wide 2, ' ' = 0 wide 1, 'M' = 45 wide 3
        assert_eq!(build_scroll_map("A M"), vec![99, 100, 0, 135, 136, 137]);
    }

    #[test]
    fn test_scroll_map_strips_newlines_and_unknowns() {
        assert_eq!(build_scroll_map("I\r\nI"), vec![123, 123]);
        // lowercase is outside the font and falls back to space
        assert_eq!(build_scroll_map("a"), vec![0]);
    }

    #[test]
    fn test_door_hit_box() {
        let door = Door::new(10, 5, "TEST");
        assert!(door.contains_tile(10, 5));
        assert!(door.contains_tile(13, 7));
        assert!(!door.contains_tile(14, 7));
        assert!(!door.contains_tile(13, 8));
        assert!(!door.contains_tile(9, 5));
    }

    #[test]
    fn test_builtin_is_valid() {
        let content = HubContent::builtin();
        content.validate().unwrap();
        assert_eq!(content.level.len(), LEVEL_ROWS);
        assert!(content.doors.len() >= 2);
        assert!(content.level[GROUND_ROW].iter().all(|&t| t == FLOOR_TILE));
        // every upper door has floor under its centre
        for door in content.doors.iter().filter(|d| d.y as usize + 3 == PLATFORM_ROW) {
            assert_eq!(content.level[PLATFORM_ROW][door.x as usize + 2], FLOOR_TILE);
        }
    }

    #[test]
    fn test_from_json_rejects_ragged_rows() {
        let json = r#"{"level": [[1, 2], [3]], "doors": [], "scroller_text": ""}"#;
        match HubContent::from_json(json) {
            Err(ContentError::Ragged { row: 1, expected: 2, found: 1 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        let json = r#"{"level": [], "doors": [], "scroller_text": ""}"#;
        assert!(matches!(HubContent::from_json(json), Err(ContentError::Empty)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{"level": [[0, 69], [69, 69]], "doors": [{"x": 0, "y": 0, "name": "ONE"}], "scroller_text": "HI"}"#;
        file.write_all(json.as_bytes()).unwrap();

        let content = HubContent::load(file.path()).unwrap();
        assert_eq!(content.doors[0].name, "ONE");
        assert_eq!(content.level[1], vec![69, 69]);

        let missing = HubContent::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ContentError::Io(_))));
    }
}
