//! wgpu render backend for the solar system scene.
//!
//! Consumes recorded [`solar_render::Frame`]s and draws them with two
//! programs: an unlit one for the sun and a point-lit one for the planets.
//!
//! # Invariants
//! - Draws are submitted in the order they were recorded.
//! - The renderer never mutates scene state.
//! - Every model in the [`solar_assets::ModelLibrary`] is uploaded once, up front.

mod error;
mod gpu;
mod mesh;
pub mod shaders;

pub use error::RenderError;
pub use gpu::WgpuRenderer;
