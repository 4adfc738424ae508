//! Rendering interface shared by every backend.
//!
//! # Invariants
//! - Renderers never mutate scene state.
//! - A [`Frame`] lists draws in submission order; backends must not reorder.
//!
//! The wgpu backend lives in `solar-render-wgpu`; [`DebugTextRenderer`] is
//! the headless stand-in.

mod camera;
mod frame;
mod renderer;

pub use camera::OrbitCamera;
pub use frame::{DrawCommand, DrawSink, Frame, FrameRecorder, FrameUniforms, NullSink, PointLight};
pub use renderer::{DebugTextRenderer, Renderer};
