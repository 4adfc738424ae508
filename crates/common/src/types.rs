use serde::{Deserialize, Serialize};
use std::fmt;

/// The three bodies the scene knows about, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyKind {
    Sun,
    Earth,
    Moon,
}

impl BodyKind {
    pub const ALL: [BodyKind; 3] = [BodyKind::Sun, BodyKind::Earth, BodyKind::Moon];

    /// Dense index, usable for fixed-size per-body tables.
    pub fn index(self) -> usize {
        match self {
            BodyKind::Sun => 0,
            BodyKind::Earth => 1,
            BodyKind::Moon => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Sun => "sun",
            BodyKind::Earth => "earth",
            BodyKind::Moon => "moon",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Direction the camera orbits its target in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbitDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Shader program a body is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramKind {
    /// Unlit, emissive.
    Sun,
    /// Lit by the point light sitting at the sun.
    Planet,
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramKind::Sun => f.pad("sun"),
            ProgramKind::Planet => f.pad("planet"),
        }
    }
}

/// Opaque handle to a loaded model. The renderer resolves handles, the scene
/// only passes them along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelHandle(pub u32);

/// Model handles for the three bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyModels {
    pub sun: ModelHandle,
    pub earth: ModelHandle,
    pub moon: ModelHandle,
}

impl BodyModels {
    pub fn get(&self, kind: BodyKind) -> ModelHandle {
        match kind {
            BodyKind::Sun => self.sun,
            BodyKind::Earth => self.earth,
            BodyKind::Moon => self.moon,
        }
    }
}
