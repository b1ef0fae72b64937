//! Scene composition
//!
//! Draws one frame of the hub from a borrowed `HubState`: marquee, parallax
//! backdrop, level through the camera, the character, the sine sprites and,
//! while a door is loading, the darkened interstitial.

use glam::{IVec2, Vec2};

use super::sheets::SpriteSheets;
use super::sine::SineSprites;
use super::surface::{Rgba, Surface};
use crate::animation::{BOUNCING_ANIMATION, CharacterAnimations};
use crate::consts::*;
use crate::content::{build_scroll_map, tiles};
use crate::map::TileMap;
use crate::sim::{Facing, HubState, HubWorld, KinematicState};

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// Top-left of the visible map window (map pixels)
    pub map_offset: IVec2,
    /// Where the character sprite lands on the playfield canvas
    pub sprite_pos: IVec2,
}

/// Follow the character, keeping it centred except near the map edges
pub fn camera(position: Vec2, level: &TileMap) -> Camera {
    let pos = position.as_ivec2();
    let half_sprite = DUDE_SIZE / 2;
    let map_size = IVec2::new(level.width_px, level.height_px - MAP_BOTTOM_TRIM);
    let view = IVec2::new(GAME_WIDTH, GAME_HEIGHT);

    let axis = |p: i32, map: i32, view: i32| -> (i32, i32) {
        let centre = view / 2 - half_sprite;
        if p <= centre {
            (0, p)
        } else if p > map - view / 2 - half_sprite {
            (map - view, view - (map - p))
        } else {
            (p - centre, centre)
        }
    };

    let (map_x, screen_x) = axis(pos.x, map_size.x, view.x);
    let (map_y, screen_y) = axis(pos.y, map_size.y, view.y);
    Camera {
        map_offset: IVec2::new(map_x, map_y),
        sprite_pos: IVec2::new(screen_x, screen_y),
    }
}

/// Upward recoil (px) after a landing, scaled by how hard the character fell
pub fn bounce_offset(m: &KinematicState) -> f32 {
    let len = BOUNCING_ANIMATION.len() as i32;
    let index = len - m.bounce_displacement - 1;
    if !(0..len).contains(&index) {
        return 0.0;
    }
    let falling = m.falling_speed.max(3.0);
    BOUNCING_ANIMATION[index as usize] as f32 * (falling / BOUNCE_SPEED) * 0.9
}

/// Sprite frame for the character at `time` seconds
pub fn character_frame(m: &KinematicState, animations: &CharacterAnimations, time: f32) -> u32 {
    let left = m.facing == Facing::Left;
    if m.thrusting {
        let anim = if left { &animations.thrust_left } else { &animations.thrust_right };
        return anim.current(time);
    }
    if m.moving {
        let anim = if left { &animations.move_left } else { &animations.move_right };
        return anim.current(time);
    }
    let idle = m.current_frame % 10;
    if left { idle + 10 } else { idle }
}

/// Wrap the marquee accumulator into `0..length`
pub fn scroller_offset(accumulator: u64, length: i32) -> i64 {
    if length <= 0 {
        return 0;
    }
    (accumulator % length as u64) as i64
}

/// Marquee font tiles for `LOADING <name>` and where the row starts, centred
/// above the progress bar. Rows wider than the screen start at its left edge.
fn loading_caption(name: &str) -> (Vec<u32>, IVec2) {
    let caption = build_scroll_map(&format!("LOADING {}", name.to_uppercase()));
    let width = caption.len() as i32 * SCROLL_TILE_W;
    let origin = IVec2::new(((SCREEN_WIDTH - width) / 2).max(0), GAME_HEIGHT / 2 - SCROLL_TILE_H - 16);
    (caption, origin)
}

/// Owns the frame buffers and sheets, reused every frame
#[derive(Debug, Clone)]
pub struct Scene {
    screen: Surface,
    playfield: Surface,
    backdrop: Surface,
    sheets: SpriteSheets,
    sine: SineSprites,
}

impl Scene {
    pub fn new(world: &HubWorld, sheets: SpriteSheets) -> Self {
        // One extra tile each way so the parallax can shift by up to a tile
        let mut backdrop = Surface::new(GAME_WIDTH + TILE_SIZE, world.level.height_px + TILE_SIZE);
        let backdrop_tile = sheets.level.tile(tiles::BACKDROP as i32);
        for y in (0..backdrop.height()).step_by(TILE_SIZE as usize) {
            for x in (0..backdrop.width()).step_by(TILE_SIZE as usize) {
                backdrop.draw(backdrop_tile, x, y);
            }
        }

        Self {
            screen: Surface::filled(SCREEN_WIDTH, SCREEN_HEIGHT, Rgba::BLACK),
            playfield: Surface::filled(GAME_WIDTH, GAME_HEIGHT, Rgba::BLACK),
            backdrop,
            sheets,
            sine: SineSprites,
        }
    }

    /// Scene drawn with the built-in placeholder sheets
    pub fn placeholder(world: &HubWorld) -> Self {
        Self::new(world, SpriteSheets::placeholder(world))
    }

    /// The last rendered frame
    pub fn screen(&self) -> &Surface {
        &self.screen
    }

    /// Compose a full frame for `state`
    pub fn render(&mut self, state: &HubState, world: &HubWorld) -> &Surface {
        let m = &state.kinematics;
        let time = state.elapsed_secs();

        self.screen.fill(Rgba::BLACK);
        world.scroller.draw_wrapped(
            &self.sheets.font,
            &mut self.screen,
            scroller_offset(m.scroller_position, world.scroller_length()),
            IVec2::new(SCROLL_OFFSET_X, SCROLL_OFFSET_Y),
            IVec2::new(SCROLL_WIDTH, SCROLL_HEIGHT),
        );

        let cam = camera(m.position, &world.level);
        self.playfield.fill(Rgba::BLACK);
        self.draw_backdrop(cam.map_offset, world.level.height_px);
        world.level.draw(
            &self.sheets.level,
            &mut self.playfield,
            cam.map_offset,
            IVec2::ZERO,
            IVec2::new(GAME_WIDTH, GAME_HEIGHT),
        );

        let frame = character_frame(m, &state.animations, time);
        let y = (cam.sprite_pos.y as f32 - bounce_offset(m)).floor() as i32;
        self.playfield
            .draw(self.sheets.character.tile(frame as i32), cam.sprite_pos.x, y);

        self.sine.draw(&self.sheets.sine, &mut self.playfield, time);
        self.screen.draw(&self.playfield, GAME_OFFSET_X, GAME_OFFSET_Y);

        if state.loading.active {
            self.draw_loading(&state.loading.screen_name, state.loading.timer);
        }
        &self.screen
    }

    /// Backdrop scrolls at half the camera speed
    fn draw_backdrop(&mut self, map_offset: IVec2, level_height: i32) {
        let shift = (map_offset.max(IVec2::ZERO) / 2) % TILE_SIZE;
        self.playfield
            .draw_region(&self.backdrop, shift.x, shift.y, GAME_WIDTH, level_height, 0, 0);
    }

    /// Dim the whole frame, caption it with the screen name and show how far
    /// along the load is
    fn draw_loading(&mut self, name: &str, timer: i32) {
        self.screen
            .fill_rect(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, Rgba::new(0, 0, 0, 200));

        let (caption, origin) = loading_caption(name);
        for (i, &index) in caption.iter().enumerate() {
            let x = origin.x + i as i32 * SCROLL_TILE_W;
            self.screen.draw(self.sheets.font.tile(index as i32), x, origin.y);
        }

        let bar_w = SCREEN_WIDTH / 2;
        let bar_x = (SCREEN_WIDTH - bar_w) / 2;
        let bar_y = GAME_HEIGHT / 2;
        let done = (LOADING_TICKS - timer).clamp(0, LOADING_TICKS);
        self.screen.fill_rect(bar_x, bar_y, bar_w, 8, Rgba::opaque(40, 40, 40));
        self.screen
            .fill_rect(bar_x, bar_y, bar_w * done / LOADING_TICKS, 8, Rgba::WHITE);
    }
}
