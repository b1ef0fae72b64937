//! Deterministic simulation module
//!
//! All hub logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (the autopilot's thrust rhythm)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod physics;
pub mod state;
pub mod tick;

pub use autopilot::{AutoPilot, SyntheticInput};
pub use physics::{have_landed, integrate};
pub use state::{
    Controls, Facing, HubEvent, HubSnapshot, HubState, HubWorld, KinematicState, LoadingState,
};
pub use tick::{TickInput, tick};
