//! Demo Hub - the navigable menu screen of a demo showcase
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, autopilot, loading interstitial)
//! - `renderer`: Software frame buffer, tile blitting, sine sprites, scene composition
//! - `map`: Tile grid geometry shared by the simulation and the renderer
//! - `animation`: Time-driven sprite frame selection
//! - `content`: Level map, door table and scroller text
//! - `settings`: Data-driven runner configuration

pub mod animation;
pub mod content;
pub mod map;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use content::{ContentError, Door, HubContent};
pub use map::TileMap;
pub use settings::Settings;

/// Hub configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Full frame buffer handed to the host
    pub const SCREEN_WIDTH: i32 = 768;
    pub const SCREEN_HEIGHT: i32 = 536;

    /// Playfield canvas (map, character, sine sprites)
    pub const GAME_WIDTH: i32 = SCREEN_WIDTH;
    pub const GAME_HEIGHT: i32 = 400;
    pub const GAME_OFFSET_X: i32 = 0;
    pub const GAME_OFFSET_Y: i32 = 0;

    /// Marquee strip below the playfield
    pub const SCROLL_WIDTH: i32 = SCREEN_WIDTH;
    pub const SCROLL_HEIGHT: i32 = 80;
    pub const SCROLL_OFFSET_X: i32 = 0;
    pub const SCROLL_OFFSET_Y: i32 = GAME_HEIGHT + (SCREEN_HEIGHT - GAME_HEIGHT - SCROLL_HEIGHT) / 2;

    /// Sprite sheet cell sizes
    pub const TILE_SIZE: i32 = 32;
    pub const DUDE_SIZE: i32 = 64;
    pub const CAREBEAR_TILE_W: i32 = 32;
    pub const CAREBEAR_TILE_H: i32 = 20;
    pub const SCROLL_TILE_W: i32 = 32;
    pub const SCROLL_TILE_H: i32 = 80;

    /// Horizontal walk speed, also the cap on falling speed (px/tick)
    pub const BOUNCE_SPEED: f32 = 7.0;
    /// Marquee advance per tick (px)
    pub const SCROLL_SPEED: u64 = 8;
    /// Idle ticks before the autopilot takes over (two minutes)
    pub const AUTOPILOT_ACTIVATE_TICKS: i32 = 60 * 60 * 2;

    /// Tile index that the character can stand on
    pub const FLOOR_TILE: u32 = 69;

    /// Playable horizontal band (px)
    pub const MIN_X: f32 = (9 * TILE_SIZE) as f32;
    pub const MAX_X: f32 = (455 * TILE_SIZE) as f32;

    /// The bottom of the map is trimmed by this much for the floor bound and camera
    pub const MAP_BOTTOM_TRIM: i32 = TILE_SIZE - 4;

    /// Thrust accumulator bounds
    pub const THRUST_START: f32 = 3.0;
    pub const THRUST_MAX: f32 = 8.0;

    /// Ticks the character is pushed down after hitting the ceiling
    pub const CEILING_COOLDOWN_TICKS: u32 = 10;

    /// Ticks the loading interstitial is shown
    pub const LOADING_TICKS: i32 = 120;

    /// Every time-driven cycle repeats exactly after this many ticks (210 s):
    /// the 70 s sine show, the 21-tick walk loop and the 9-tick thrust pair
    pub const CLOCK_PERIOD_TICKS: u64 = 12_600;
}

/// Convert a tick count to elapsed seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}

/// Seconds into the current clock period.
///
/// The tick count is folded with integer math first, so the clock keeps full
/// `f32` resolution no matter how long the hub has been running.
#[inline]
pub fn clock_secs(ticks: u64) -> f32 {
    ticks_to_secs(ticks % consts::CLOCK_PERIOD_TICKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CLOCK_PERIOD_TICKS;

    #[test]
    fn test_clock_period_fits_every_cycle() {
        // sine show, walk loop (0.35 s) and two thrust frames (2 x 0.075 s)
        assert_eq!(CLOCK_PERIOD_TICKS % (70 * 60), 0);
        assert_eq!(CLOCK_PERIOD_TICKS % 21, 0);
        assert_eq!(CLOCK_PERIOD_TICKS % 9, 0);
    }

    #[test]
    fn test_clock_keeps_resolution_after_days() {
        for base in [0, 5_184_000, 20_000_000, u64::MAX / 2] {
            for k in 0..12 {
                let dt = clock_secs(base + k + 1) - clock_secs(base + k);
                // Skip the single step that wraps the period
                if (base + k + 1) % CLOCK_PERIOD_TICKS == 0 {
                    continue;
                }
                assert!((dt - consts::SIM_DT).abs() < 1e-4, "tick {}: dt = {dt}", base + k);
            }
        }
    }
}
