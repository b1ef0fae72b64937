//! Hub state and core simulation types
//!
//! `HubState` is the mutable simulation context, `HubWorld` the immutable
//! content it runs against. Both are passed by reference to every tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::autopilot::AutoPilot;
use crate::animation::CharacterAnimations;
use crate::consts::*;
use crate::content::{Door, HubContent, build_scroll_map};
use crate::map::TileMap;
use crate::settings::Settings;

/// Which way the character is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Movement controls fed to the integrator, from the player or the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
}

/// The character's kinematic state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Top-left of the sprite in map pixels
    pub position: Vec2,
    pub facing: Facing,
    /// Walking this tick
    pub moving: bool,
    /// Thrust held this tick
    pub thrusting: bool,
    /// Upward speed accumulator, 0..=8
    pub thrust_speed: f32,
    /// Downward speed accumulator, 0..=BOUNCE_SPEED
    pub falling_speed: f32,
    /// Set on the tick the character touches a floor, cleared once it falls again
    pub just_landed: bool,
    /// Ticks of landing recoil left to play back
    pub bounce_displacement: i32,
    /// Sprite frame remembered for idle poses
    pub current_frame: u32,
    /// Marquee position in pixels; wrapped by the scroller length when drawn
    pub scroller_position: u64,
    /// Ticks left being pushed down after bumping the top of the map
    pub ceiling_cooldown: u32,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            position: Vec2::new(320.0, 450.0),
            facing: Facing::Right,
            moving: false,
            thrusting: false,
            thrust_speed: 0.0,
            falling_speed: 0.0,
            just_landed: false,
            bounce_displacement: 0,
            current_frame: 6,
            scroller_position: 0,
            ceiling_cooldown: 0,
        }
    }
}

/// Interstitial shown while a door's screen "loads"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    pub active: bool,
    pub screen_name: String,
    /// Ticks left before the hub resumes
    pub timer: i32,
}

/// Notifications for the host (audio, logging, screen switching)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubEvent {
    /// Character touched a floor
    Landed,
    /// Idle threshold passed, autopilot now drives the controls
    AutopilotEngaged,
    /// Player input returned, autopilot handed back control
    AutopilotReleased,
    /// Character entered a door's screen
    LoadStarted { name: String },
    /// Interstitial finished, hub simulation resumed
    LoadFinished,
}

/// Immutable content the simulation runs against
#[derive(Debug, Clone)]
pub struct HubWorld {
    /// Main level, 32x32 tiles
    pub level: TileMap,
    /// One-row marquee built from the scroller text
    pub scroller: TileMap,
    /// Doors in autopilot visiting order
    pub doors: Vec<Door>,
}

impl HubWorld {
    pub fn new(content: &HubContent) -> Self {
        let scroll_row = build_scroll_map(&content.scroller_text);
        Self {
            level: TileMap::new(content.level.clone(), TILE_SIZE, TILE_SIZE),
            scroller: TileMap::new(vec![scroll_row], SCROLL_TILE_W, SCROLL_TILE_H),
            doors: content.doors.clone(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(&HubContent::builtin())
    }

    /// Total marquee length in pixels
    #[inline]
    pub fn scroller_length(&self) -> i32 {
        self.scroller.width_px
    }

    /// Door whose hit-box contains the given map position
    pub fn door_at(&self, position: Vec2) -> Option<&Door> {
        let tile_x = position.x as i32 / TILE_SIZE;
        let tile_y = position.y as i32 / TILE_SIZE;
        self.doors.iter().find(|d| d.contains_tile(tile_x, tile_y))
    }
}

/// Complete hub simulation state
#[derive(Debug, Clone)]
pub struct HubState {
    /// Seed the RNG is rebuilt from on reset
    pub seed: u64,
    pub kinematics: KinematicState,
    pub autopilot: AutoPilot,
    pub loading: LoadingState,
    /// Ticks simulated outside the loading interstitial
    pub time_ticks: u64,
    pub animations: CharacterAnimations,
    /// Drives the autopilot's thrust rhythm
    pub rng: Pcg32,
}

impl HubState {
    /// Create a new hub state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            kinematics: KinematicState::default(),
            autopilot: AutoPilot::default(),
            loading: LoadingState::default(),
            time_ticks: 0,
            animations: CharacterAnimations::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut state = Self::new(settings.seed);
        state.autopilot.enabled = settings.autopilot;
        state.autopilot.idle_threshold = settings.idle_threshold_ticks;
        state.autopilot.activate_in = settings.idle_threshold_ticks;
        state
    }

    /// Put the character, autopilot and clocks back to their starting values.
    /// Autopilot configuration (enabled, idle threshold) is kept.
    pub fn reset(&mut self) {
        self.kinematics = KinematicState::default();
        self.autopilot = AutoPilot {
            enabled: self.autopilot.enabled,
            ..AutoPilot::with_threshold(self.autopilot.idle_threshold)
        };
        self.loading = LoadingState::default();
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        log::info!("Hub reset (seed {})", self.seed);
    }

    /// Animation clock in seconds, folded into the clock period so it stays
    /// smooth however long the hub runs
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        crate::clock_secs(self.time_ticks)
    }

    /// Borrowed view for traces and debugging
    pub fn snapshot(&self) -> HubSnapshot<'_> {
        HubSnapshot {
            tick: self.time_ticks,
            kinematics: &self.kinematics,
            autopilot: &self.autopilot,
            loading: &self.loading,
        }
    }
}

/// Serializable view of the mutable parts of `HubState`
#[derive(Debug, Serialize)]
pub struct HubSnapshot<'a> {
    pub tick: u64,
    pub kinematics: &'a KinematicState,
    pub autopilot: &'a AutoPilot,
    pub loading: &'a LoadingState,
}
