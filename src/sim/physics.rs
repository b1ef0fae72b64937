//! Character integrator
//!
//! Walks, thrusts and drops the character one pixel at a time so it always
//! comes to rest exactly on a floor tile, whatever its falling speed.

use super::state::{Controls, Facing, KinematicState};
use crate::animation::BOUNCING_ANIMATION;
use crate::consts::*;
use crate::map::TileMap;

/// Advance the character by one fixed tick
pub fn integrate(m: &mut KinematicState, level: &TileMap, controls: Controls) {
    if m.bounce_displacement > 0 {
        m.bounce_displacement -= 1;
    }

    // Horizontal walk; both keys cancel out
    match (controls.left, controls.right) {
        (true, false) => {
            m.position.x -= BOUNCE_SPEED;
            m.facing = Facing::Left;
            m.moving = true;
        }
        (false, true) => {
            m.position.x += BOUNCE_SPEED;
            m.facing = Facing::Right;
            m.moving = true;
        }
        _ => m.moving = false,
    }

    if controls.thrust {
        m.thrusting = true;
        if m.thrust_speed <= 0.0 {
            m.thrust_speed = THRUST_START;
        }
        if m.thrust_speed < THRUST_MAX {
            m.thrust_speed += 1.0;
        }
        m.falling_speed = 0.0;
    } else {
        m.thrusting = false;
        // No leftover launch once we're against the ceiling
        if m.position.y < TILE_SIZE as f32 {
            m.thrust_speed = 0.0;
        }
    }

    // Gravity
    if m.thrust_speed <= 0.0 && !m.just_landed && m.falling_speed < BOUNCE_SPEED {
        m.falling_speed += 0.5;
    }

    // Step down a pixel at a time, testing for a floor before every step
    let steps = m.falling_speed.floor() as i32 + 1;
    for _ in 0..steps {
        if !have_landed(m, level) {
            m.position.y += 1.0;
            m.just_landed = false;
        } else if !m.just_landed {
            m.just_landed = true;
            m.bounce_displacement = BOUNCING_ANIMATION.len() as i32;
            m.thrust_speed = 0.0;
        }
    }

    if m.thrust_speed > 0.0 {
        m.thrust_speed -= 0.5;
    }
    if m.thrust_speed > 0.0 && m.ceiling_cooldown == 0 {
        m.position.y -= m.thrust_speed.floor();
    }

    clamp_to_bounds(m, level);

    m.scroller_position = m.scroller_position.wrapping_add(SCROLL_SPEED);
}

/// Keep the character inside the playable band and above the map floor
fn clamp_to_bounds(m: &mut KinematicState, level: &TileMap) {
    let floor_bound = (level.height_px - MAP_BOTTOM_TRIM - DUDE_SIZE) as f32;

    if m.position.x < MIN_X {
        m.position.x = MIN_X;
    }
    if m.position.y < 0.0 {
        m.position.y = 0.0;
        m.ceiling_cooldown = CEILING_COOLDOWN_TICKS;
    }
    if m.ceiling_cooldown > 0 {
        m.ceiling_cooldown -= 1;
        m.position.y += 2.0;
    }
    if m.position.x >= MAX_X {
        m.position.x = MAX_X;
    }
    if m.position.y >= floor_bound {
        m.position.y = floor_bound;
    }
}

/// Whether the character stands on a floor tile.
///
/// The sprite is two tiles wide, so the row two tiles below its top edge is
/// checked at its column, the next one and, when it exists, the one after.
/// Only exactly tile-aligned positions count as landed.
pub fn have_landed(m: &KinematicState, level: &TileMap) -> bool {
    if level.is_empty() {
        return false;
    }
    let px = m.position.x as i32;
    let py = m.position.y as i32;
    let x = px / TILE_SIZE;
    let y = py / TILE_SIZE;

    if y < 0 || (y + 2) as usize >= level.rows() {
        return false;
    }
    if x < 0 || (x + 1) as usize >= level.columns() {
        return false;
    }
    if py % TILE_SIZE != 0 {
        return false;
    }

    let row = &level.data[(y + 2) as usize];
    let is_floor = |col: i32| row.get(col as usize) == Some(&FLOOR_TILE);
    if is_floor(x) || is_floor(x + 1) {
        return true;
    }
    (x as usize) + 2 < row.len() && is_floor(x + 2)
}
