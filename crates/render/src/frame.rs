use glam::{Mat4, Vec3};
use serde::Serialize;
use solar_common::{BodyKind, ModelHandle, ProgramKind};

/// Point light with distance attenuation `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

/// Uniforms shared by every draw in a frame.
///
/// The sun program only reads the matrices; the planet program also reads
/// the lighting block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub view_position: Vec3,
    pub light: PointLight,
    pub shininess: f32,
}

/// One model drawn with one program and model matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCommand {
    pub program: ProgramKind,
    pub body: BodyKind,
    pub model: ModelHandle,
    pub transform: Mat4,
}

/// Everything a backend needs to render one frame, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub uniforms: FrameUniforms,
    pub draws: Vec<DrawCommand>,
}

/// Target that drawables record into.
pub trait DrawSink {
    /// Make `program` the active program for subsequent draws.
    fn bind_program(&mut self, program: ProgramKind);

    /// Draw `model` for `body` with the active program.
    fn draw(&mut self, body: BodyKind, model: ModelHandle, transform: Mat4);
}

/// Records draws into a [`Frame`].
#[derive(Debug)]
pub struct FrameRecorder {
    frame: Frame,
    bound: Option<ProgramKind>,
}

impl FrameRecorder {
    pub fn new(clear_color: [f32; 4], uniforms: FrameUniforms) -> Self {
        Self {
            frame: Frame {
                clear_color,
                uniforms,
                draws: Vec::new(),
            },
            bound: None,
        }
    }

    pub fn bound_program(&self) -> Option<ProgramKind> {
        self.bound
    }

    pub fn finish(self) -> Frame {
        self.frame
    }
}

impl DrawSink for FrameRecorder {
    fn bind_program(&mut self, program: ProgramKind) {
        self.bound = Some(program);
    }

    fn draw(&mut self, body: BodyKind, model: ModelHandle, transform: Mat4) {
        let Some(program) = self.bound else {
            tracing::warn!(%body, "draw issued with no program bound, skipped");
            return;
        };
        self.frame.draws.push(DrawCommand {
            program,
            body,
            model,
            transform,
        });
    }
}

/// Sink that discards everything but counts draws.
#[derive(Debug, Default)]
pub struct NullSink {
    pub draws: usize,
}

impl DrawSink for NullSink {
    fn bind_program(&mut self, _program: ProgramKind) {}

    fn draw(&mut self, _body: BodyKind, _model: ModelHandle, _transform: Mat4) {
        self.draws += 1;
    }
}
