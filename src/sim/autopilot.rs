//! Idle autopilot
//!
//! When nobody has touched the controls for a while the autopilot flies the
//! character from door to door, entering each one in turn. It only ever
//! produces the same signals a player would.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::have_landed;
use super::state::{Controls, Facing, KinematicState};
use crate::consts::{AUTOPILOT_ACTIVATE_TICKS, TILE_SIZE};
use crate::content::Door;
use crate::map::TileMap;

/// Below this altitude (px from the map top) the character counts as low enough to leave STUCK
const STUCK_ALTITUDE: i32 = 550;
/// Ticks to keep walking off a ledge before giving up on STUCK
const KEEP_WALKING_TICKS: i32 = 30;
/// Ticks spent lined up with a door before entering it
const WAIT_TO_LOAD_TICKS: i32 = 80;
/// Period of the thrust duty cycle
const DONT_THRUST_PERIOD: i32 = 100;
/// Thrust is allowed while the duty counter is below this
const THRUST_WINDOW: i32 = 70;

/// Signals the autopilot substitutes for player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyntheticInput {
    pub controls: Controls,
    pub load: bool,
}

/// Autopilot timers and flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPilot {
    /// Disabled autopilots never engage
    pub enabled: bool,
    /// Idle ticks needed before engaging
    pub idle_threshold: i32,
    /// Countdown to activation; reset by any key
    pub activate_in: i32,
    /// Thrust duty counter, 100 down to 0
    pub dont_thrust_for_awhile: i32,
    /// Free-running thrust rhythm timer, re-randomised to 100..200
    pub time_since_last_thrust: i32,
    /// Countdown while lined up with the target door
    pub wait_to_load: i32,
    /// Assert load every tick until a screen loads
    pub now_load_screen: bool,
    /// Standing on something above the target; walk off it
    pub stuck: bool,
    pub keep_walking_for_awhile: i32,
    /// Index into the door table of the next door to visit
    pub next_screen: usize,
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self::with_threshold(AUTOPILOT_ACTIVATE_TICKS)
    }
}

impl AutoPilot {
    pub fn with_threshold(idle_threshold: i32) -> Self {
        Self {
            enabled: true,
            idle_threshold,
            activate_in: idle_threshold,
            dont_thrust_for_awhile: 0,
            time_since_last_thrust: 200,
            wait_to_load: WAIT_TO_LOAD_TICKS,
            now_load_screen: false,
            stuck: false,
            keep_walking_for_awhile: 0,
            next_screen: 0,
        }
    }

    /// Whether the idle countdown has run out
    #[inline]
    pub fn is_active(&self) -> bool {
        self.enabled && self.activate_in <= 0
    }

    /// Pixel centre of the 4x3 hit-box of the door currently targeted
    pub fn target(&self, doors: &[Door]) -> Option<Vec2> {
        let door = doors.get(self.next_screen).or_else(|| doors.first())?;
        Some(Vec2::new(
            (door.x * TILE_SIZE + 64) as f32,
            (door.y * TILE_SIZE + 64) as f32,
        ))
    }

    /// Run one tick. Returns `None` while the player is (recently) in control.
    pub fn tick(
        &mut self,
        any_key: bool,
        m: &KinematicState,
        level: &TileMap,
        doors: &[Door],
        rng: &mut Pcg32,
    ) -> Option<SyntheticInput> {
        if any_key {
            self.activate_in = self.idle_threshold;
        } else {
            self.activate_in = self.activate_in.saturating_sub(1);
        }
        if !self.is_active() {
            return None;
        }

        let controls = self.steer(m, level, doors);
        self.advance_rhythm(rng);

        Some(SyntheticInput {
            controls,
            load: self.now_load_screen,
        })
    }

    fn steer(&mut self, m: &KinematicState, level: &TileMap, doors: &[Door]) -> Controls {
        let mut controls = Controls::default();
        let Some(target) = self.target(doors) else {
            return controls;
        };

        // Coarse alignment: 16 px columns, 32 px rows for the stuck test
        let current_x = m.position.x as i32 & !0xf;
        let target_x = target.x as i32 & !0xf;
        let current_y = m.position.y as i32;
        let target_y = target.y as i32;

        let on_level = have_landed(m, level);
        if on_level && (current_y & !0x1f) < (target_y & !0xf) && current_y < STUCK_ALTITUDE {
            if !self.stuck {
                log::debug!("Autopilot stuck at {:?}, walking off", m.position);
            }
            self.stuck = true;
            self.keep_walking_for_awhile = KEEP_WALKING_TICKS;
        }
        if current_y >= STUCK_ALTITUDE {
            self.stuck = false;
        }

        if self.stuck {
            match m.facing {
                Facing::Left => controls.left = true,
                Facing::Right => controls.right = true,
            }
            if !on_level {
                self.keep_walking_for_awhile -= 1;
                if self.keep_walking_for_awhile <= 0 {
                    self.stuck = false;
                }
            }
        } else {
            if current_x == target_x {
                self.wait_to_load -= 1;
            }
            if self.wait_to_load <= 0 {
                self.now_load_screen = true;
            }
            controls.right = current_x < target_x;
            controls.left = current_x > target_x;
            controls.thrust = m.position.y > target.y && self.dont_thrust_for_awhile < THRUST_WINDOW;
        }

        controls
    }

    /// Free-running timers that vary the flight rhythm
    fn advance_rhythm(&mut self, rng: &mut Pcg32) {
        if self.time_since_last_thrust > 0 {
            self.time_since_last_thrust -= 1;
        }
        if self.time_since_last_thrust <= 0 {
            self.time_since_last_thrust = rng.random_range(100..200);
        }
        if self.dont_thrust_for_awhile > 0 {
            self.dont_thrust_for_awhile -= 1;
        }
        if self.dont_thrust_for_awhile <= 0 {
            self.dont_thrust_for_awhile = DONT_THRUST_PERIOD;
        }
    }

    /// A door's screen started loading: aim for the next door.
    ///
    /// The last door table entry is never targeted.
    pub fn on_screen_loaded(&mut self, door_count: usize) {
        self.now_load_screen = false;
        self.wait_to_load = WAIT_TO_LOAD_TICKS;
        let next = self.next_screen + 1;
        self.next_screen = if next >= door_count.saturating_sub(1) { 0 } else { next };
    }

    /// The loading interstitial ended
    pub fn on_loading_finished(&mut self) {
        self.now_load_screen = false;
        self.wait_to_load = WAIT_TO_LOAD_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn level() -> TileMap {
        // Ground floor on row 22, an upper platform on row 14 (cols 0..=19)
        let mut data = vec![vec![0; 60]; 24];
        data[22].fill(crate::consts::FLOOR_TILE);
        data[14][..20].fill(crate::consts::FLOOR_TILE);
        TileMap::new(data, TILE_SIZE, TILE_SIZE)
    }

    fn standing(x: f32, y: f32) -> KinematicState {
        KinematicState {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    fn active() -> AutoPilot {
        AutoPilot {
            activate_in: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_inactive_until_threshold() {
        let mut ap = AutoPilot::with_threshold(3);
        let mut rng = Pcg32::seed_from_u64(1);
        let m = standing(320.0, 640.0);
        let doors = [Door::new(30, 19, "A")];
        assert!(ap.tick(false, &m, &level(), &doors, &mut rng).is_none());
        assert!(ap.tick(false, &m, &level(), &doors, &mut rng).is_none());
        assert!(ap.tick(false, &m, &level(), &doors, &mut rng).is_some());

        // A key press hands control back
        assert!(ap.tick(true, &m, &level(), &doors, &mut rng).is_none());
        assert_eq!(ap.activate_in, 3);
    }

    #[test]
    fn test_disabled_never_engages() {
        let mut ap = AutoPilot {
            enabled: false,
            ..active()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let doors = [Door::new(30, 19, "A")];
        for _ in 0..10 {
            assert!(ap.tick(false, &standing(320.0, 640.0), &level(), &doors, &mut rng).is_none());
        }
    }

    #[test]
    fn test_walks_toward_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let doors = [Door::new(30, 19, "RIGHT"), Door::new(0, 0, "SENTINEL")];

        let mut ap = active();
        let input = ap.tick(false, &standing(320.0, 640.0), &level(), &doors, &mut rng).unwrap();
        assert!(input.controls.right && !input.controls.left);
        assert!(!input.controls.thrust);

        let mut ap = active();
        let input = ap.tick(false, &standing(1500.0, 640.0), &level(), &doors, &mut rng).unwrap();
        assert!(input.controls.left && !input.controls.right);
    }

    #[test]
    fn test_thrusts_when_below_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Door centre at y = 11 * 32 + 64 = 416, character on the ground at 640
        let doors = [Door::new(30, 11, "UP"), Door::new(0, 0, "SENTINEL")];
        let mut ap = active();
        let input = ap.tick(false, &standing(1024.0, 640.0), &level(), &doors, &mut rng).unwrap();
        assert!(input.controls.thrust);

        // Outside the duty window no thrust is asserted
        let mut ap = AutoPilot {
            dont_thrust_for_awhile: 80,
            ..active()
        };
        let input = ap.tick(false, &standing(1024.0, 640.0), &level(), &doors, &mut rng).unwrap();
        assert!(!input.controls.thrust);
    }

    #[test]
    fn test_waits_then_loads_when_aligned() {
        let mut rng = Pcg32::seed_from_u64(1);
        let doors = [Door::new(30, 19, "HERE"), Door::new(0, 0, "SENTINEL")];
        // Door centre x = 30 * 32 + 64 = 1024
        let m = standing(1030.0, 640.0);
        let mut ap = active();

        for _ in 0..WAIT_TO_LOAD_TICKS - 1 {
            let input = ap.tick(false, &m, &level(), &doors, &mut rng).unwrap();
            assert!(!input.load);
            assert!(!input.controls.left && !input.controls.right);
        }
        let input = ap.tick(false, &m, &level(), &doors, &mut rng).unwrap();
        assert!(input.load);
        // Keeps asserting load until something consumes it
        assert!(ap.tick(false, &m, &level(), &doors, &mut rng).unwrap().load);
    }

    #[test]
    fn test_stuck_on_platform_above_target_walks_off() {
        let mut rng = Pcg32::seed_from_u64(1);
        let doors = [Door::new(40, 19, "GROUND"), Door::new(0, 0, "SENTINEL")];
        // Standing on the row 14 platform: y = 12 * 32 = 384
        let mut m = standing(320.0, 384.0);
        m.facing = Facing::Left;
        let mut ap = active();

        let input = ap.tick(false, &m, &level(), &doors, &mut rng).unwrap();
        assert!(ap.stuck);
        assert_eq!(ap.keep_walking_for_awhile, KEEP_WALKING_TICKS);
        // Keeps walking the way it faces, even though the target is to the right
        assert!(input.controls.left && !input.controls.right);

        // Airborne: the walk-off countdown runs out and STUCK clears
        m.position.y = 400.0;
        for _ in 0..KEEP_WALKING_TICKS {
            ap.tick(false, &m, &level(), &doors, &mut rng);
        }
        assert!(!ap.stuck);
    }

    #[test]
    fn test_stuck_clears_below_altitude() {
        let mut ap = AutoPilot {
            stuck: true,
            keep_walking_for_awhile: 30,
            ..active()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let doors = [Door::new(40, 19, "GROUND"), Door::new(0, 0, "SENTINEL")];
        ap.tick(false, &standing(320.0, 560.0), &level(), &doors, &mut rng);
        assert!(!ap.stuck);
    }

    #[test]
    fn test_rhythm_timers_stay_in_range() {
        let mut ap = active();
        let mut rng = Pcg32::seed_from_u64(42);
        let doors = [Door::new(30, 19, "A"), Door::new(0, 0, "SENTINEL")];
        let m = standing(320.0, 640.0);
        for _ in 0..1000 {
            ap.tick(false, &m, &level(), &doors, &mut rng);
            assert!((1..=200).contains(&ap.time_since_last_thrust));
            assert!((1..=DONT_THRUST_PERIOD).contains(&ap.dont_thrust_for_awhile));
        }
    }

    #[test]
    fn test_next_screen_skips_sentinel() {
        let mut ap = AutoPilot::default();
        ap.on_screen_loaded(3);
        assert_eq!(ap.next_screen, 1);
        ap.on_screen_loaded(3);
        assert_eq!(ap.next_screen, 0);

        // Single-entry tables keep targeting the only door
        ap.on_screen_loaded(1);
        assert_eq!(ap.next_screen, 0);
    }

    #[test]
    fn test_target_falls_back_to_first_door() {
        let ap = AutoPilot {
            next_screen: 9,
            ..Default::default()
        };
        let doors = [Door::new(2, 3, "FIRST")];
        assert_eq!(ap.target(&doors), Some(Vec2::new(128.0, 160.0)));
        assert_eq!(ap.target(&[]), None);
    }
}
