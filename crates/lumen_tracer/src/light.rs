use crate::Vec3;

/// Kinds of light source. Only point lights are shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Point,
}

/// A light in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    /// Unused by point lights
    pub direction: Vec3,
    /// Linear RGB in [0, 1]
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    /// A point light at `position`.
    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            direction: Vec3::ZERO,
            color,
            intensity,
            kind: LightKind::Point,
        }
    }

    /// Light color scaled by intensity.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::point(Vec3::ZERO, Vec3::ONE, 1.0)
    }
}
