use glam::{Mat4, Vec3};
use serde::Serialize;
use solar_common::{BodyKind, ModelHandle, ProgramKind};
use solar_render::DrawSink;

use crate::system::{Drawable, Placements};

pub const SUN_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);
pub const EARTH_ORBIT_RADIUS: f32 = 100.0;
pub const MOON_ORBIT_RADIUS: f32 = 20.0;
/// Uniform scale applied to earth and moon before translation.
pub const PLANET_SCALE: f32 = 0.1;
pub const EARTH_SPIN_RATE: f32 = 1.5;
pub const EARTH_SPIN_DEGREES: f32 = -50.0;
/// Not unit length; normalised when the rotation is built.
pub const EARTH_SPIN_AXIS: Vec3 = Vec3::new(0.1, 1.0, 0.0);

/// Plane an orbit is traced in. The clock value is used directly as the angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrbitPlane {
    /// `(sin t, 0, cos t)`
    XZ,
    /// `(0, sin t, cos t)`
    YZ,
}

impl OrbitPlane {
    pub fn direction(self, t: f32) -> Vec3 {
        match self {
            OrbitPlane::XZ => Vec3::new(t.sin(), 0.0, t.cos()),
            OrbitPlane::YZ => Vec3::new(0.0, t.sin(), t.cos()),
        }
    }
}

/// `center + radius * plane.direction(t)`.
pub fn orbit_position(center: Vec3, radius: f32, plane: OrbitPlane, t: f32) -> Vec3 {
    center + plane.direction(t) * radius
}

/// Earth's orbit-space position at clock `t`.
pub fn earth_position(t: f32) -> Vec3 {
    orbit_position(SUN_POSITION, EARTH_ORBIT_RADIUS, OrbitPlane::XZ, t)
}

/// Moon's orbit-space position at clock `t`, around earth at the same `t`.
pub fn moon_position(t: f32) -> Vec3 {
    orbit_position(earth_position(t), MOON_ORBIT_RADIUS, OrbitPlane::YZ, t)
}

/// Where a body sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Placement {
    Fixed(Vec3),
    Orbit {
        parent: BodyKind,
        radius: f32,
        plane: OrbitPlane,
    },
}

/// Rotation about the body's own axis, applied in its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spin {
    /// Radians per unit of animation clock.
    pub rate: f32,
    pub axis: Vec3,
}

impl Spin {
    pub fn rotation(&self, t: f32) -> Mat4 {
        Mat4::from_axis_angle(self.axis.normalize(), t * self.rate)
    }
}

/// One of the sun, earth or moon.
///
/// Position and transform are cached results of the last
/// [`Drawable::update_transform`]; they hold no state of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub kind: BodyKind,
    pub placement: Placement,
    pub scale: f32,
    pub spin: Option<Spin>,
    pub program: ProgramKind,
    pub model: ModelHandle,
    position: Vec3,
    transform: Mat4,
}

impl CelestialBody {
    pub fn new(
        kind: BodyKind,
        placement: Placement,
        scale: f32,
        spin: Option<Spin>,
        program: ProgramKind,
        model: ModelHandle,
    ) -> Self {
        Self {
            kind,
            placement,
            scale,
            spin,
            program,
            model,
            position: Vec3::ZERO,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn sun(model: ModelHandle) -> Self {
        Self::new(
            BodyKind::Sun,
            Placement::Fixed(SUN_POSITION),
            1.0,
            None,
            ProgramKind::Sun,
            model,
        )
    }

    pub fn earth(model: ModelHandle) -> Self {
        Self::new(
            BodyKind::Earth,
            Placement::Orbit {
                parent: BodyKind::Sun,
                radius: EARTH_ORBIT_RADIUS,
                plane: OrbitPlane::XZ,
            },
            PLANET_SCALE,
            Some(Spin {
                rate: EARTH_SPIN_RATE * EARTH_SPIN_DEGREES.to_radians(),
                axis: EARTH_SPIN_AXIS,
            }),
            ProgramKind::Planet,
            model,
        )
    }

    pub fn moon(model: ModelHandle) -> Self {
        Self::new(
            BodyKind::Moon,
            Placement::Orbit {
                parent: BodyKind::Earth,
                radius: MOON_ORBIT_RADIUS,
                plane: OrbitPlane::YZ,
            },
            PLANET_SCALE,
            None,
            ProgramKind::Planet,
            model,
        )
    }

    /// Orbit-space position at clock `t` given the parent's position.
    /// Fixed bodies ignore `center`.
    pub fn position_at(&self, t: f32, center: Vec3) -> Vec3 {
        match self.placement {
            Placement::Fixed(p) => p,
            Placement::Orbit { radius, plane, .. } => orbit_position(center, radius, plane, t),
        }
    }

    /// Model matrix `scale * translate(position) * spin(t)`.
    pub fn model_matrix(&self, t: f32, position: Vec3) -> Mat4 {
        let spin = self.spin.map_or(Mat4::IDENTITY, |s| s.rotation(t));
        Mat4::from_scale(Vec3::splat(self.scale)) * Mat4::from_translation(position) * spin
    }
}

impl Drawable for CelestialBody {
    fn kind(&self) -> BodyKind {
        self.kind
    }

    fn parent(&self) -> Option<BodyKind> {
        match self.placement {
            Placement::Fixed(_) => None,
            Placement::Orbit { parent, .. } => Some(parent),
        }
    }

    fn update_transform(&mut self, t: f32, placed: &Placements) {
        let center = self
            .parent()
            .and_then(|parent| placed.get(parent))
            .unwrap_or(Vec3::ZERO);
        self.position = self.position_at(t, center);
        self.transform = self.model_matrix(t, self.position);
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        sink.bind_program(self.program);
        sink.draw(self.kind, self.model, self.transform);
    }
}
