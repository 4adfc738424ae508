use solar_common::ProgramKind;

/// Unlit program used for the sun.
pub const SUN_SHADER: &str = include_str!("shaders/sun.wgsl");

/// Point-lit program used for the earth and moon.
pub const PLANET_SHADER: &str = include_str!("shaders/planet.wgsl");

pub fn source(program: ProgramKind) -> &'static str {
    match program {
        ProgramKind::Sun => SUN_SHADER,
        ProgramKind::Planet => PLANET_SHADER,
    }
}
