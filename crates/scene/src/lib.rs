//! Scene composer for the sun, earth and moon.
//!
//! Owns per-frame timing, the animation pause toggle, orbital transform
//! computation and the fixed draw order. Runs without a window or GPU: input
//! comes through [`solar_input::KeySource`] and draws go to a
//! [`solar_render::DrawSink`].
//!
//! # Invariants
//! - Every transform is a pure function of the animation clock.
//! - A paused animation leaves the animation clock untouched.
//! - Parents are placed before children within the same frame.

pub mod body;
pub mod clock;
pub mod composer;
pub mod error;
pub mod lighting;
pub mod snapshot;
pub mod system;

pub use body::{CelestialBody, OrbitPlane, Placement, Spin, earth_position, moon_position};
pub use clock::{AnimationState, FrameClock, TOGGLE_DEBOUNCE_SECS};
pub use composer::{
    CAMERA_ORBIT_RADIUS, CAMERA_ORBIT_STEP, FrameOutcome, InputOutcome, SceneComposer, SceneState,
};
pub use error::SceneError;
pub use snapshot::{BodySnapshot, FrameSnapshot};
pub use solar_common::BodyModels;
pub use system::{Drawable, Placements, SolarSystem};
