use glam::{Mat4, Vec3};
use solar_common::{BodyKind, BodyModels};
use solar_render::DrawSink;

use crate::body::CelestialBody;
use crate::error::SceneError;

/// Something the composer can place and draw each frame.
pub trait Drawable {
    fn kind(&self) -> BodyKind;

    /// Body whose position this one is placed relative to, if any.
    fn parent(&self) -> Option<BodyKind>;

    /// Recompute the world transform for animation clock `t`. `placed` holds
    /// positions already computed earlier in the same pass.
    fn update_transform(&mut self, t: f32, placed: &Placements);

    fn position(&self) -> Vec3;

    fn transform(&self) -> Mat4;

    fn draw(&self, sink: &mut dyn DrawSink);
}

/// Positions resolved so far in the current update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placements {
    slots: [Option<Vec3>; 3],
}

impl Placements {
    pub fn get(&self, kind: BodyKind) -> Option<Vec3> {
        self.slots[kind.index()]
    }

    pub fn set(&mut self, kind: BodyKind, position: Vec3) {
        self.slots[kind.index()] = Some(position);
    }
}

/// Ordered list of drawables. Update and draw both walk it front to back, so
/// every parent must come before its children.
pub struct SolarSystem {
    bodies: Vec<Box<dyn Drawable>>,
}

impl std::fmt::Debug for SolarSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bodies.iter().map(|b| b.kind()))
            .finish()
    }
}

impl SolarSystem {
    /// Build from drawables in draw order.
    pub fn new(bodies: Vec<Box<dyn Drawable>>) -> Result<Self, SceneError> {
        let mut seen: Vec<BodyKind> = Vec::with_capacity(bodies.len());
        for body in &bodies {
            let kind = body.kind();
            if seen.contains(&kind) {
                return Err(SceneError::DuplicateBody(kind));
            }
            if let Some(parent) = body.parent() {
                if !seen.contains(&parent) {
                    return Err(SceneError::ParentNotPlaced { body: kind, parent });
                }
            }
            seen.push(kind);
        }
        Ok(Self { bodies })
    }

    /// Sun, earth, moon.
    pub fn standard(models: BodyModels) -> Self {
        Self {
            bodies: vec![
                Box::new(CelestialBody::sun(models.sun)),
                Box::new(CelestialBody::earth(models.earth)),
                Box::new(CelestialBody::moon(models.moon)),
            ],
        }
    }

    /// Recompute every transform for clock `t`, parents first.
    pub fn update(&mut self, t: f32) -> Placements {
        let mut placed = Placements::default();
        for body in &mut self.bodies {
            body.update_transform(t, &placed);
            placed.set(body.kind(), body.position());
        }
        placed
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        for body in &self.bodies {
            body.draw(sink);
        }
    }

    pub fn bodies(&self) -> impl Iterator<Item = &dyn Drawable> {
        self.bodies.iter().map(|b| b.as_ref())
    }

    pub fn get(&self, kind: BodyKind) -> Option<&dyn Drawable> {
        self.bodies().find(|b| b.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{earth_position, moon_position};
    use solar_common::{ModelHandle, ProgramKind};
    use solar_render::{FrameRecorder, FrameUniforms, NullSink, PointLight};

    fn models() -> BodyModels {
        BodyModels {
            sun: ModelHandle(0),
            earth: ModelHandle(1),
            moon: ModelHandle(2),
        }
    }

    /// Drawable that sits at a fixed point and draws nothing.
    struct Marker(BodyKind, Option<BodyKind>);

    impl Drawable for Marker {
        fn kind(&self) -> BodyKind {
            self.0
        }
        fn parent(&self) -> Option<BodyKind> {
            self.1
        }
        fn update_transform(&mut self, _t: f32, _placed: &Placements) {}
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn transform(&self) -> Mat4 {
            Mat4::IDENTITY
        }
        fn draw(&self, _sink: &mut dyn DrawSink) {}
    }

    #[test]
    fn moon_uses_earth_from_same_pass() {
        let mut system = SolarSystem::standard(models());
        for t in [0.0, 0.5, 3.0, 100.25] {
            let placed = system.update(t);
            assert_eq!(placed.get(BodyKind::Earth), Some(earth_position(t)));
            let moon = placed.get(BodyKind::Moon).unwrap();
            assert!((moon - moon_position(t)).length() < 1e-4);
        }
    }

    #[test]
    fn draws_in_fixed_order() {
        let mut system = SolarSystem::standard(models());
        system.update(1.0);

        let mut rec = FrameRecorder::new(
            [0.0; 4],
            FrameUniforms {
                projection: Mat4::IDENTITY,
                view: Mat4::IDENTITY,
                view_position: Vec3::ZERO,
                light: PointLight {
                    position: Vec3::ZERO,
                    ambient: Vec3::ZERO,
                    diffuse: Vec3::ZERO,
                    specular: Vec3::ZERO,
                    constant: 1.0,
                    linear: 0.0,
                    quadratic: 0.0,
                },
                shininess: 1.0,
            },
        );
        system.draw(&mut rec);
        let frame = rec.finish();

        let order: Vec<_> = frame.draws.iter().map(|d| (d.body, d.program)).collect();
        assert_eq!(
            order,
            vec![
                (BodyKind::Sun, ProgramKind::Sun),
                (BodyKind::Earth, ProgramKind::Planet),
                (BodyKind::Moon, ProgramKind::Planet),
            ]
        );
    }

    #[test]
    fn runs_headless_with_null_sink() {
        let mut system = SolarSystem::standard(models());
        system.update(0.0);
        let mut sink = NullSink::default();
        system.draw(&mut sink);
        assert_eq!(sink.draws, 3);
    }

    #[test]
    fn rejects_child_before_parent() {
        let err = SolarSystem::new(vec![
            Box::new(CelestialBody::moon(ModelHandle(2))),
            Box::new(CelestialBody::earth(ModelHandle(1))),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            SceneError::ParentNotPlaced {
                body: BodyKind::Moon,
                parent: BodyKind::Earth
            }
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let err = SolarSystem::new(vec![
            Box::new(Marker(BodyKind::Sun, None)),
            Box::new(Marker(BodyKind::Sun, None)),
        ])
        .unwrap_err();
        assert!(matches!(err, SceneError::DuplicateBody(BodyKind::Sun)));
    }

    #[test]
    fn accepts_substitute_drawables() {
        let mut system = SolarSystem::new(vec![
            Box::new(Marker(BodyKind::Sun, None)),
            Box::new(CelestialBody::earth(ModelHandle(1))),
        ])
        .unwrap();
        let placed = system.update(0.0);
        // Earth orbits wherever the substitute sun says it is.
        assert_eq!(placed.get(BodyKind::Earth), Some(Vec3::new(0.0, 0.0, 100.0)));
        assert_eq!(system.len(), 2);
    }
}
