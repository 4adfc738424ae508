use glam::Vec3;
use solar_render::PointLight;

pub const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
pub const MATERIAL_SHININESS: f32 = 32.0;

pub const LIGHT_AMBIENT: f32 = 0.25;
pub const LIGHT_DIFFUSE: f32 = 1.8;
pub const LIGHT_SPECULAR: f32 = 1.0;

pub const ATTENUATION_CONSTANT: f32 = 1.0;
pub const ATTENUATION_LINEAR: f32 = 0.045;
pub const ATTENUATION_QUADRATIC: f32 = 0.0075;

/// The single point light, placed at `position` (the sun).
pub fn sun_light(position: Vec3) -> PointLight {
    PointLight {
        position,
        ambient: Vec3::splat(LIGHT_AMBIENT),
        diffuse: Vec3::splat(LIGHT_DIFFUSE),
        specular: Vec3::splat(LIGHT_SPECULAR),
        constant: ATTENUATION_CONSTANT,
        linear: ATTENUATION_LINEAR,
        quadratic: ATTENUATION_QUADRATIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uses_fixed_attenuation() {
        let light = sun_light(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(light.position, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(light.constant, 1.0);
        assert_eq!(light.linear, 0.045);
        assert_eq!(light.quadratic, 0.0075);
        assert_eq!(light.diffuse, Vec3::splat(1.8));
    }
}
