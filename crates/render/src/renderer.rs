use crate::frame::Frame;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a recorded [`Frame`] and produces output. It never
/// touches scene state; the composer owns the truth.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one recorded frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Renders a frame as human-readable text.
///
/// Used by the headless CLI and in tests where no GPU is available.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let eye = frame.uniforms.view_position;
        let light = frame.uniforms.light.position;
        let _ = writeln!(out, "=== Frame ({} draws) ===", frame.draws.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) light=({:.2}, {:.2}, {:.2})",
            eye.x, eye.y, eye.z, light.x, light.y, light.z
        );

        for draw in &frame.draws {
            let p = draw.transform.w_axis;
            let _ = writeln!(
                out,
                "  {:<6} program={:<6} model={} world=({:.2}, {:.2}, {:.2})",
                draw.body, draw.program, draw.model.0, p.x, p.y, p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DrawSink, FrameRecorder, FrameUniforms, PointLight};
    use glam::{Mat4, Vec3};
    use solar_common::{BodyKind, ModelHandle, ProgramKind};

    fn empty_frame() -> FrameRecorder {
        FrameRecorder::new(
            [0.1, 0.1, 0.1, 1.0],
            FrameUniforms {
                projection: Mat4::IDENTITY,
                view: Mat4::IDENTITY,
                view_position: Vec3::new(0.0, 0.0, 30.0),
                light: PointLight {
                    position: Vec3::new(0.0, -1.0, 0.0),
                    ambient: Vec3::splat(0.25),
                    diffuse: Vec3::splat(1.8),
                    specular: Vec3::ONE,
                    constant: 1.0,
                    linear: 0.045,
                    quadratic: 0.0075,
                },
                shininess: 32.0,
            },
        )
    }

    #[test]
    fn debug_renderer_empty_frame() {
        let frame = empty_frame().finish();
        let output = DebugTextRenderer::new().render(&frame);
        assert!(output.contains("0 draws"));
        assert!(output.contains("eye=(0.00, 0.00, 30.00)"));
    }

    #[test]
    fn debug_renderer_lists_draws() {
        let mut rec = empty_frame();
        rec.bind_program(ProgramKind::Sun);
        rec.draw(
            BodyKind::Sun,
            ModelHandle(0),
            Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        );
        let output = DebugTextRenderer::new().render(&rec.finish());
        assert!(output.contains("1 draws"));
        assert!(output.contains("sun"));
        assert!(output.contains("world=(0.00, -1.00, 0.00)"));
    }
}
