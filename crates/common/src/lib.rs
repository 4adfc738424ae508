//! Shared identifiers used across the solar system crates.

pub mod types;

pub use types::{BodyKind, BodyModels, ModelHandle, OrbitDirection, ProgramKind};
