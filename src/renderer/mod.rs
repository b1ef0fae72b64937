//! Software rendering module
//!
//! Composes frames into an RGBA `Surface` the host presents however it likes.
//! Nothing here mutates simulation state.

pub mod scene;
pub mod sheets;
pub mod sine;
pub mod surface;
pub mod tiles;

pub use scene::{Camera, Scene, bounce_offset, camera, character_frame, scroller_offset};
pub use sheets::SpriteSheets;
pub use sine::{Choreography, SineSprites, derive_from_time};
pub use surface::{Rgba, Surface};
pub use tiles::TileSet;
