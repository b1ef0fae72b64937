//! Fixed timestep hub tick
//!
//! Orders one tick of the hub: loading interstitial, autopilot override,
//! integration, animation bookkeeping and the door check.

use serde::{Deserialize, Serialize};

use super::physics::integrate;
use super::state::{Controls, Facing, HubEvent, HubState, HubWorld, LoadingState};
use crate::consts::LOADING_TICKS;

/// Input signals for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Walk left (Left / Z)
    pub left: bool,
    /// Walk right (Right / X)
    pub right: bool,
    /// Thrust upward (Up / Enter)
    pub thrust: bool,
    /// Enter the door the character stands in (Space)
    pub load: bool,
    /// Any key at all was held this tick
    pub any_key: bool,
}

impl TickInput {
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.left,
            right: self.right,
            thrust: self.thrust,
        }
    }
}

/// Advance the hub by one fixed timestep, returning what happened
pub fn tick(state: &mut HubState, world: &HubWorld, input: &TickInput) -> Vec<HubEvent> {
    let mut events = Vec::new();

    // The interstitial pauses everything else
    if state.loading.active {
        update_loading(state, &mut events);
        return events;
    }

    let was_active = state.autopilot.is_active();
    let mut controls = input.controls();
    let mut load = input.load;

    let synthetic = state.autopilot.tick(
        input.any_key,
        &state.kinematics,
        &world.level,
        &world.doors,
        &mut state.rng,
    );
    if let Some(synthetic) = synthetic {
        controls = synthetic.controls;
        load |= synthetic.load;
    }

    match (was_active, state.autopilot.is_active()) {
        (false, true) => {
            log::info!("Autopilot engaged after {} idle ticks", state.autopilot.idle_threshold);
            events.push(HubEvent::AutopilotEngaged);
        }
        (true, false) => {
            log::info!("Autopilot released");
            events.push(HubEvent::AutopilotReleased);
        }
        _ => {}
    }

    let was_landed = state.kinematics.just_landed;
    integrate(&mut state.kinematics, &world.level, controls);
    if state.kinematics.just_landed && !was_landed {
        events.push(HubEvent::Landed);
    }

    state.time_ticks += 1;
    remember_walk_frame(state);

    if load {
        handle_load(state, world, &mut events);
    }

    events
}

/// Keep the walk cycle's frame so the idle pose matches the last step
fn remember_walk_frame(state: &mut HubState) {
    let t = state.elapsed_secs();
    let m = &mut state.kinematics;
    if m.thrusting || !m.moving {
        return;
    }
    m.current_frame = match m.facing {
        Facing::Left => state.animations.move_left.current(t),
        Facing::Right => state.animations.move_right.current(t),
    };
}

/// Start loading the door the character stands in, if any
fn handle_load(state: &mut HubState, world: &HubWorld, events: &mut Vec<HubEvent>) {
    let Some(door) = world.door_at(state.kinematics.position) else {
        return;
    };
    log::info!("Loading screen {:?}", door.name);
    state.loading = LoadingState {
        active: true,
        screen_name: door.name.clone(),
        timer: LOADING_TICKS,
    };
    state.autopilot.on_screen_loaded(world.doors.len());
    events.push(HubEvent::LoadStarted {
        name: door.name.clone(),
    });
}

fn update_loading(state: &mut HubState, events: &mut Vec<HubEvent>) {
    state.loading.timer -= 1;
    if state.loading.timer > 0 {
        return;
    }
    log::info!("Finished loading {:?}", state.loading.screen_name);
    state.loading.active = false;
    state.autopilot.on_loading_finished();
    events.push(HubEvent::LoadFinished);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::content::{Door, HubContent};
    use glam::Vec2;

    fn small_world() -> HubWorld {
        // 40 x 24 tiles, ground floor on row 22, one door on the ground and a sentinel
        let mut level = vec![vec![0; 40]; 24];
        level[22].fill(FLOOR_TILE);
        HubWorld::new(&HubContent {
            level,
            doors: vec![Door::new(20, 19, "NEAR"), Door::new(30, 19, "LAST")],
            scroller_text: "HELLO ".to_string(),
        })
    }

    fn run_idle(state: &mut HubState, world: &HubWorld, ticks: usize) -> Vec<HubEvent> {
        let mut all = Vec::new();
        for _ in 0..ticks {
            all.extend(tick(state, world, &TickInput::default()));
        }
        all
    }

    #[test]
    fn test_idle_character_lands_once() {
        let world = small_world();
        let mut state = HubState::new(1);
        let events = run_idle(&mut state, &world, 120);
        assert_eq!(events.iter().filter(|e| **e == HubEvent::Landed).count(), 1);
        assert_eq!(state.kinematics.position, Vec2::new(320.0, 640.0));
        assert_eq!(state.time_ticks, 120);
    }

    #[test]
    fn test_autopilot_engages_after_exact_threshold() {
        let world = small_world();
        let mut state = HubState::new(1);
        let threshold = AUTOPILOT_ACTIVATE_TICKS as usize;

        let events = run_idle(&mut state, &world, threshold - 1);
        assert!(!events.contains(&HubEvent::AutopilotEngaged));
        let x_before = state.kinematics.position.x;
        assert_eq!(x_before, 320.0);

        let events = run_idle(&mut state, &world, 1);
        assert!(events.contains(&HubEvent::AutopilotEngaged));
        // No raw input was given, yet the character walked toward the first door
        assert!(state.kinematics.position.x > x_before);
    }

    #[test]
    fn test_any_key_releases_autopilot() {
        let world = small_world();
        let mut state = HubState::new(1);
        state.autopilot.activate_in = 1;
        let events = run_idle(&mut state, &world, 1);
        assert!(events.contains(&HubEvent::AutopilotEngaged));

        let input = TickInput {
            any_key: true,
            ..Default::default()
        };
        let x = state.kinematics.position.x;
        let events = tick(&mut state, &world, &input);
        assert!(events.contains(&HubEvent::AutopilotReleased));
        assert_eq!(state.kinematics.position.x, x);
    }

    #[test]
    fn test_load_inside_door_starts_interstitial() {
        let world = small_world();
        let mut state = HubState::new(1);
        state.kinematics.position = Vec2::new((21 * TILE_SIZE) as f32, 640.0);

        let input = TickInput {
            load: true,
            any_key: true,
            ..Default::default()
        };
        let events = tick(&mut state, &world, &input);
        assert!(events.contains(&HubEvent::LoadStarted {
            name: "NEAR".to_string()
        }));
        assert!(state.loading.active);
        assert_eq!(state.loading.timer, LOADING_TICKS);
        assert_eq!(state.autopilot.next_screen, 0);

        // The interstitial freezes the simulation until the timer runs out
        let frozen = state.kinematics.clone();
        let ticks = state.time_ticks;
        let events = run_idle(&mut state, &world, LOADING_TICKS as usize - 1);
        assert!(events.is_empty());
        assert_eq!(state.kinematics, frozen);
        assert_eq!(state.time_ticks, ticks);

        let events = run_idle(&mut state, &world, 1);
        assert_eq!(events, vec![HubEvent::LoadFinished]);
        assert!(!state.loading.active);
    }

    #[test]
    fn test_load_outside_door_does_nothing() {
        let world = small_world();
        let mut state = HubState::new(1);
        let input = TickInput {
            load: true,
            ..Default::default()
        };
        tick(&mut state, &world, &input);
        assert!(!state.loading.active);
    }

    #[test]
    fn test_autopilot_visits_door() {
        let world = small_world();
        let mut state = HubState::new(7);
        state.autopilot.activate_in = 1;

        let mut loaded = None;
        for _ in 0..2000 {
            for event in tick(&mut state, &world, &TickInput::default()) {
                if let HubEvent::LoadStarted { name } = event {
                    loaded = Some(name);
                }
            }
            if loaded.is_some() {
                break;
            }
        }
        assert_eq!(loaded.as_deref(), Some("NEAR"));
    }

    #[test]
    fn test_walk_frame_is_remembered() {
        let world = small_world();
        let mut state = HubState::new(1);
        run_idle(&mut state, &world, 100);
        let input = TickInput {
            left: true,
            any_key: true,
            ..Default::default()
        };
        tick(&mut state, &world, &input);
        assert!((12..=19).contains(&state.kinematics.current_frame));
    }

    #[test]
    fn test_determinism() {
        let world = HubWorld::builtin();
        let mut state1 = HubState::new(99999);
        let mut state2 = HubState::new(99999);
        state1.autopilot.activate_in = 1;
        state2.autopilot.activate_in = 1;

        for _ in 0..3000 {
            let e1 = tick(&mut state1, &world, &TickInput::default());
            let e2 = tick(&mut state2, &world, &TickInput::default());
            assert_eq!(e1, e2);
        }
        assert_eq!(state1.kinematics, state2.kinematics);
        assert_eq!(state1.autopilot, state2.autopilot);
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }
}
