//! Time-driven sprite frame selection
//!
//! An `Animation` maps elapsed seconds to one entry of an ordered list of
//! sprite sheet indices. Only linear progress is supported, optionally looping.

use serde::{Deserialize, Serialize};

/// Frame-index interpolation over a fixed duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Length of one pass through `indices` (seconds)
    pub duration: f32,
    /// Sprite sheet indices in playback order
    pub indices: Vec<u32>,
    /// Wrap around after `duration` instead of holding the last frame
    pub looping: bool,
}

impl Animation {
    pub fn new(duration: f32, indices: impl Into<Vec<u32>>, looping: bool) -> Self {
        Self {
            duration,
            indices: indices.into(),
            looping,
        }
    }

    /// Sprite index to show `elapsed` seconds into the animation
    pub fn current(&self, elapsed: f32) -> u32 {
        let Some(&last) = self.indices.last() else {
            return 0;
        };
        if self.duration <= 0.0 {
            return self.indices[0];
        }

        let mut t = elapsed.max(0.0);
        if !self.looping && t >= self.duration {
            return last;
        }
        if self.looping {
            t %= self.duration;
        }

        let progress = (t / self.duration).min(1.0);
        let frame = (self.indices.len() as f32 * progress).floor() as usize;
        self.indices
            .get(frame)
            .copied()
            .unwrap_or(last)
    }
}

/// The character's four motion cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterAnimations {
    pub move_right: Animation,
    pub move_left: Animation,
    pub thrust_right: Animation,
    pub thrust_left: Animation,
}

impl Default for CharacterAnimations {
    fn default() -> Self {
        Self {
            move_right: Animation::new(0.35, [2, 3, 4, 5, 6, 7, 8, 9], true),
            move_left: Animation::new(0.35, [12, 13, 14, 15, 16, 17, 18, 19], true),
            thrust_right: Animation::new(0.075, [0, 1], true),
            thrust_left: Animation::new(0.075, [10, 11], true),
        }
    }
}

/// Vertical recoil (px) played back after a landing, newest displacement last
pub const BOUNCING_ANIMATION: [i32; 13] = [0, 3, 5, 6, 5, 3, 0, 1, 2, 3, 2, 1, 0];
