//! Sine sprite choreography
//!
//! Twelve small sprites dance across the playfield in seven acts. Each act
//! lasts ten seconds: one second sliding in from the right, eight seconds of
//! its formation, one second sliding out to the left. The whole show loops
//! every seventy seconds.

use glam::{IVec2, Vec2};

use super::surface::Surface;
use super::tiles::TileSet;
use crate::consts::{CAREBEAR_TILE_H, CAREBEAR_TILE_W};

pub const SPRITE_COUNT: usize = 12;
pub const ACT_COUNT: usize = 7;
/// Seconds an act's formation plays between its slides
pub const ACT_DURATION: f32 = 8.0;
/// Seconds spent sliding in (and again sliding out)
pub const SLIDE_DURATION: f32 = 1.0;
/// Length of one act including both slides
pub const CYCLE: f32 = ACT_DURATION + SLIDE_DURATION * 2.0;
/// The show repeats after this many seconds
pub const SHOW_LENGTH: f32 = ACT_COUNT as f32 * CYCLE;

const SLIDE_INDEX: f32 = 0.5;

/// Linear ramp from `min` to `max` repeating every `duration` seconds.
/// A zero duration yields `min`.
pub fn derive_from_time(time: f32, duration: f32, min: f32, max: f32) -> f32 {
    if duration == 0.0 {
        return min;
    }
    (time % duration) * (max - min) / duration + min
}

/// Fold raw time into the show and shift it so the first act starts sliding in
fn show_time(time: f32) -> f32 {
    let t = if time >= SHOW_LENGTH { time % SHOW_LENGTH } else { time };
    t + SLIDE_DURATION
}

/// One of the seven formations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choreography {
    /// A row jittering sideways while bobbing up and down
    Ripple,
    /// A snake tracing a twisting Lissajous figure
    Twister,
    /// Lissajous folded horizontally by a slow cosine
    FoldX,
    /// Lissajous folded vertically by a slow sine
    FoldY,
    /// Spiralling in and out from the centre
    Bloom,
    /// A tilting ellipse
    Orbit,
    /// An ellipse swept open and shut
    Sweep,
}

impl Choreography {
    pub const ALL: [Choreography; ACT_COUNT] = [
        Choreography::Ripple,
        Choreography::Twister,
        Choreography::FoldX,
        Choreography::FoldY,
        Choreography::Bloom,
        Choreography::Orbit,
        Choreography::Sweep,
    ];

    /// Act by index, wrapping around the show
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % ACT_COUNT]
    }

    /// Offset of sprite `slot` from the playfield centre at show time `t`
    pub fn point(self, t: f32, slot: usize, width: f32, height: f32) -> Vec2 {
        let i = slot as f32;
        let twist_of = |speed: f32, scale: f32| ((t * speed).sin() + (t * speed).cos()) * scale;

        match self {
            Choreography::Ripple => {
                let w = width * 0.5 * 0.5;
                let h = height * 0.25 * 0.25;
                let mut x = (i - (SPRITE_COUNT as f32 - 1.0) / 2.0) * 0.3 * w;
                let y = ((t - i * 0.15) * 4.5).cos() * h;
                let spin = 6.1;
                x += (t * spin + i * spin * 3.0).sin() * 25.0;
                Vec2::new(x * 2.1, y * 3.0)
            }
            Choreography::Twister => {
                let phase = t - i * 0.1;
                let twist = twist_of(1.6 * 0.7, 0.75);
                Vec2::new(
                    (phase * 2.5 * 0.7).sin() * width * 1.05,
                    (phase * 5.0 * 0.7).sin() * height * twist,
                )
            }
            Choreography::FoldX => {
                let phase = t - i * 0.07;
                let twist = twist_of(2.0, 0.75);
                let x = (phase * 4.0).sin() * width * 1.05;
                let y = (phase * 3.0).sin() * height * twist;
                Vec2::new(x * ((t - i) * 0.25).cos(), y)
            }
            Choreography::FoldY => {
                let phase = t - i * 0.07;
                let twist = twist_of(2.0, 0.73);
                let x = (phase * 4.0 * 0.7).sin() * width * twist;
                let y = (phase * 3.0 * 0.7).cos() * height;
                Vec2::new(x, y * ((t - i) * 0.25).sin())
            }
            Choreography::Bloom => {
                let phase = t - i * 0.1;
                let twist_y = (1.0 - (phase * 4.0).sin()) * 0.52;
                let twist_x = (1.0 - (phase * 4.5).sin()) * 0.52;
                Vec2::new(
                    phase.sin() * width * twist_x,
                    (phase * 1.2).cos() * height * twist_y,
                )
            }
            Choreography::Orbit => {
                let phase = t - i * 0.1;
                let twist = twist_of(3.0 * 0.5, 0.82);
                Vec2::new(
                    (phase * 3.5 * 0.7).cos() * width * 1.05,
                    (phase * 3.5 * 0.7).sin() * height * 0.9 * twist,
                )
            }
            Choreography::Sweep => {
                let phase = t - i * 0.1;
                let twist = twist_of(3.0, 0.75);
                let x = (phase * 4.0 * 0.7).cos() * width * 1.04;
                let y = (phase * 3.0 * 0.7).sin() * height * twist;
                Vec2::new(x * (phase * 0.5).sin(), y)
            }
        }
    }
}

/// Act playing at raw time `time` (seconds)
pub fn act_at(time: f32) -> Choreography {
    let t = show_time(time);
    let index = ((t - SLIDE_DURATION) / CYCLE).floor() as usize;
    Choreography::from_index(index)
}

/// Horizontal slide as a fraction of the playfield width: positive while
/// sliding in from the right, negative while sliding out to the left, zero
/// while the formation plays.
pub fn slide_fraction(time: f32) -> f32 {
    let t = show_time(time);
    let phase = derive_from_time(t, CYCLE, 0.0, CYCLE).floor();
    if phase <= SLIDE_DURATION - SLIDE_INDEX {
        -derive_from_time(t, SLIDE_DURATION, 0.0, 1.0)
    } else if phase <= SLIDE_DURATION * 2.0 - SLIDE_INDEX {
        derive_from_time(t, SLIDE_DURATION, 1.0, 0.0)
    } else {
        0.0
    }
}

/// Top-left pixel of every sprite at raw time `time` on an `area`-sized canvas
pub fn sprite_positions(time: f32, area: IVec2) -> [IVec2; SPRITE_COUNT] {
    let t = show_time(time);
    let act = act_at(time);
    let slide = slide_fraction(time) * area.x as f32;

    let center = area.as_vec2() * 0.5;
    let width = center.x * 0.9;
    let height = center.y * 0.88;
    let half_sprite = IVec2::new(CAREBEAR_TILE_W / 2, CAREBEAR_TILE_H / 2);

    std::array::from_fn(|slot| {
        let p = act.point(t, slot, width, height) + center + Vec2::new(slide, 0.0);
        p.floor().as_ivec2() - half_sprite
    })
}

/// Draws the choreography with one tile per sprite
#[derive(Debug, Clone, Copy, Default)]
pub struct SineSprites;

impl SineSprites {
    pub fn draw(&self, tiles: &TileSet, dst: &mut Surface, time: f32) {
        let area = IVec2::new(dst.width(), dst.height());
        for (slot, pos) in sprite_positions(time, area).into_iter().enumerate() {
            dst.draw(tiles.tile(slot as i32), pos.x, pos.y);
        }
    }
}
