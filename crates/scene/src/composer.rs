use glam::Vec3;
use solar_common::{BodyKind, BodyModels};
use solar_input::{Action, KeySource, poll_actions};
use solar_render::{Frame, FrameRecorder, FrameUniforms, OrbitCamera};

use crate::body::SUN_POSITION;
use crate::clock::{AnimationState, FrameClock};
use crate::lighting::{CLEAR_COLOR, MATERIAL_SHININESS, sun_light};
use crate::snapshot::{BodySnapshot, FrameSnapshot};
use crate::system::{Placements, SolarSystem};

/// Distance the camera keeps from its target while orbiting.
pub const CAMERA_ORBIT_RADIUS: f32 = 30.0;
/// Degrees per frame while an orbit key is held.
pub const CAMERA_ORBIT_STEP: f32 = 1.0;

/// Everything that changes from frame to frame. Owned by the composer.
#[derive(Debug)]
pub struct SceneState {
    pub clock: FrameClock,
    pub animation: AnimationState,
    pub camera: OrbitCamera,
    pub system: SolarSystem,
    pub frame_index: u64,
}

impl SceneState {
    pub fn new(system: SolarSystem) -> Self {
        Self {
            clock: FrameClock::new(),
            animation: AnimationState::default(),
            camera: OrbitCamera::default(),
            system,
            frame_index: 0,
        }
    }
}

/// What polling input did this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub quit_requested: bool,
    pub toggled: bool,
}

/// Result of one composed frame.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub frame: Frame,
    pub delta_time: f32,
    pub input: InputOutcome,
}

/// Drives the scene: timing, input, transforms and draw recording.
///
/// Each frame runs in a fixed order: advance the clock, apply polled input,
/// recompute transforms parents-first, then record draws sun, earth, moon.
#[derive(Debug)]
pub struct SceneComposer {
    state: SceneState,
    placed: Placements,
}

impl SceneComposer {
    pub fn new(models: BodyModels) -> Self {
        Self::with_system(SolarSystem::standard(models))
    }

    pub fn with_system(system: SolarSystem) -> Self {
        let mut composer = Self {
            state: SceneState::new(system),
            placed: Placements::default(),
        };
        composer.placed = composer.state.system.update(0.0);
        composer
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    /// Run one frame at `now` seconds since start.
    pub fn frame(&mut self, now: f32, input: &impl KeySource) -> FrameOutcome {
        let delta_time = self.state.clock.tick(now, &self.state.animation);
        let input = self.handle_input(input);
        self.placed = self
            .state
            .system
            .update(self.state.clock.animation_clock());
        let frame = self.record();
        self.state.frame_index += 1;

        tracing::trace!(
            frame = self.state.frame_index,
            delta_time,
            clock = self.state.clock.animation_clock(),
            "frame composed"
        );

        FrameOutcome {
            frame,
            delta_time,
            input,
        }
    }

    /// Poll `input` and apply every resulting action.
    pub fn handle_input(&mut self, input: &impl KeySource) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        for action in poll_actions(input) {
            let applied = self.apply(action);
            outcome.quit_requested |= applied.quit_requested;
            outcome.toggled |= applied.toggled;
        }
        outcome
    }

    pub fn apply(&mut self, action: Action) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        match action {
            Action::Quit => outcome.quit_requested = true,
            Action::OrbitCamera(direction) => {
                self.state
                    .camera
                    .orbit(direction, CAMERA_ORBIT_RADIUS, CAMERA_ORBIT_STEP);
            }
            Action::ToggleAnimation => {
                let state = &mut self.state;
                if state.clock.try_toggle(&mut state.animation) {
                    outcome.toggled = true;
                    tracing::info!(
                        active = state.animation.active,
                        clock = state.clock.animation_clock(),
                        "animation toggled"
                    );
                }
            }
        }
        outcome
    }

    fn sun_position(&self) -> Vec3 {
        self.placed.get(BodyKind::Sun).unwrap_or(SUN_POSITION)
    }

    pub fn uniforms(&self) -> FrameUniforms {
        let camera = &self.state.camera;
        FrameUniforms {
            projection: camera.projection_matrix(),
            view: camera.view_matrix(),
            view_position: camera.position,
            light: sun_light(self.sun_position()),
            shininess: MATERIAL_SHININESS,
        }
    }

    /// Record draws for the transforms computed by the last update.
    pub fn record(&self) -> Frame {
        let mut recorder = FrameRecorder::new(CLEAR_COLOR, self.uniforms());
        self.state.system.draw(&mut recorder);
        recorder.finish()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let state = &self.state;
        FrameSnapshot {
            frame: state.frame_index,
            time: state.clock.current_time(),
            animation_clock: state.clock.animation_clock(),
            animation_active: state.animation.active,
            camera_position: state.camera.position,
            bodies: state
                .system
                .bodies()
                .map(|b| BodySnapshot {
                    body: b.kind(),
                    orbit_position: b.position(),
                    world_position: b.transform().transform_point3(Vec3::ZERO),
                    transform: b.transform(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{earth_position, moon_position};
    use solar_common::{ModelHandle, ProgramKind};
    use solar_input::{Key, KeyboardState};
    use std::f32::consts::FRAC_PI_2;

    fn composer() -> SceneComposer {
        SceneComposer::new(BodyModels {
            sun: ModelHandle(0),
            earth: ModelHandle(1),
            moon: ModelHandle(2),
        })
    }

    fn held(keys: &[Key]) -> KeyboardState {
        let mut state = KeyboardState::new();
        for key in keys {
            state.press(*key);
        }
        state
    }

    fn earth(c: &SceneComposer) -> Vec3 {
        c.snapshot().body(BodyKind::Earth).unwrap().orbit_position
    }

    #[test]
    fn earth_starts_at_sun_plus_z() {
        let c = composer();
        assert!((earth(&c) - (SUN_POSITION + Vec3::new(0.0, 0.0, 100.0))).length() < 1e-4);
    }

    #[test]
    fn earth_reaches_positive_x_after_quarter_turn() {
        let mut c = composer();
        c.frame(FRAC_PI_2, &KeyboardState::new());
        assert!((c.state().clock.animation_clock() - FRAC_PI_2).abs() < 1e-6);
        assert!((earth(&c) - (SUN_POSITION + Vec3::new(100.0, 0.0, 0.0))).length() < 1e-4);
    }

    #[test]
    fn moon_tracks_current_earth() {
        let mut c = composer();
        let keys = KeyboardState::new();
        for i in 1..=20 {
            c.frame(i as f32 * 0.1, &keys);
            let t = c.state().clock.animation_clock();
            let snap = c.snapshot();
            let earth = snap.body(BodyKind::Earth).unwrap().orbit_position;
            let moon = snap.body(BodyKind::Moon).unwrap().orbit_position;
            assert!((earth - earth_position(t)).length() < 1e-4);
            assert!((moon - moon_position(t)).length() < 1e-4);
        }
    }

    #[test]
    fn pausing_freezes_motion() {
        let mut c = composer();
        c.frame(0.5, &KeyboardState::new());
        let out = c.frame(0.6, &held(&[Key::Space]));
        assert!(out.input.toggled);
        assert!(!c.state().animation.active);

        let frozen_clock = c.state().clock.animation_clock();
        let frozen_earth = earth(&c);
        for now in [0.7, 1.5, 4.0] {
            c.frame(now, &KeyboardState::new());
            assert_eq!(c.state().clock.animation_clock(), frozen_clock);
            assert_eq!(earth(&c), frozen_earth);
        }
    }

    #[test]
    fn held_space_toggles_once_within_debounce() {
        let mut c = composer();
        let space = held(&[Key::Space]);
        assert!(c.frame(0.05, &space).input.toggled);
        assert!(!c.frame(0.10, &space).input.toggled);
        assert!(!c.frame(0.15, &space).input.toggled);
        assert!(!c.state().animation.active);

        // 0.3s after the first toggle.
        assert!(c.frame(0.35, &space).input.toggled);
        assert!(c.state().animation.active);
    }

    #[test]
    fn one_frame_of_orbit_up_is_one_step() {
        for now in [0.001, 0.5, 3.0] {
            let mut c = composer();
            let before = c.state().camera.pitch;
            c.frame(now, &held(&[Key::W]));
            assert_eq!(c.state().camera.pitch - before, CAMERA_ORBIT_STEP);
            assert_eq!(c.state().camera.radius, CAMERA_ORBIT_RADIUS);
        }
    }

    #[test]
    fn escape_requests_quit() {
        let mut c = composer();
        assert!(!c.frame(0.1, &KeyboardState::new()).input.quit_requested);
        assert!(c.frame(0.2, &held(&[Key::Escape])).input.quit_requested);
    }

    #[test]
    fn frame_draws_sun_earth_moon() {
        let mut c = composer();
        let out = c.frame(0.3, &KeyboardState::new());
        let draws: Vec<_> = out
            .frame
            .draws
            .iter()
            .map(|d| (d.body, d.program, d.model))
            .collect();
        assert_eq!(
            draws,
            vec![
                (BodyKind::Sun, ProgramKind::Sun, ModelHandle(0)),
                (BodyKind::Earth, ProgramKind::Planet, ModelHandle(1)),
                (BodyKind::Moon, ProgramKind::Planet, ModelHandle(2)),
            ]
        );
        assert_eq!(out.frame.clear_color, CLEAR_COLOR);
        assert_eq!(out.frame.uniforms.light.position, SUN_POSITION);
        assert_eq!(out.frame.uniforms.view_position, c.state().camera.position);
    }

    #[test]
    fn recording_twice_is_identical() {
        let mut c = composer();
        c.frame(1.7, &KeyboardState::new());
        assert_eq!(c.record(), c.record());
    }

    #[test]
    fn snapshot_serializes() {
        let mut c = composer();
        c.frame(0.25, &KeyboardState::new());
        let json = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(json["frame"], 1);
        assert_eq!(json["bodies"].as_array().unwrap().len(), 3);
        assert_eq!(json["bodies"][1]["body"], "Earth");
    }
}
