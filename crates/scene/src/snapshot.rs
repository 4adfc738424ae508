use glam::{Mat4, Vec3};
use serde::Serialize;
use solar_common::BodyKind;

/// Per-body state after a frame's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub body: BodyKind,
    /// Position before the body's scale is applied.
    pub orbit_position: Vec3,
    /// Where the model's origin lands in world space.
    pub world_position: Vec3,
    pub transform: Mat4,
}

/// Serialisable view of the scene after one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub time: f32,
    pub animation_clock: f32,
    pub animation_active: bool,
    pub camera_position: Vec3,
    pub bodies: Vec<BodySnapshot>,
}

impl FrameSnapshot {
    pub fn body(&self, kind: BodyKind) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.body == kind)
    }
}
