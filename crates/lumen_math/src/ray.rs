use crate::Vec3;

/// A ray in 3D space with origin, direction, and bounce generation.
///
/// The direction is not required to be unit length; intersection code
/// normalizes where it needs to. `generation` counts recursive bounces:
/// primary camera rays are generation 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub generation: u32,
}

impl Ray {
    /// Create a new generation-0 ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            generation: 0,
        }
    }

    /// Create a ray tagged with an explicit generation.
    pub fn with_generation(origin: Vec3, direction: Vec3, generation: u32) -> Self {
        Self {
            origin,
            direction,
            generation,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.generation, 0);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_generation() {
        let ray = Ray::with_generation(Vec3::ZERO, Vec3::Y, 3);
        assert_eq!(ray.generation, 3);
    }
}
