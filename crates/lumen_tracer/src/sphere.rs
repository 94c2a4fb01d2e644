//! Sphere primitive centered at the object-space origin.

use crate::{Aabb, LocalHit, Primitive, Ray, RenderResult, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl Primitive for Sphere {
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>> {
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(ray.origin);
        let c = ray.origin.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Ok(None);
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        let far = (-b + sqrtd) / (2.0 * a);

        // Smaller positive root; the far one when starting inside
        let t = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return Ok(None);
        };

        let point = ray.at(t);
        Ok(Some(LocalHit {
            t,
            point,
            normal: point,
            uvw: point / self.radius,
        }))
    }

    fn bound_points(&self) -> Vec<Vec3> {
        let r = Vec3::splat(self.radius);
        Aabb::from_points(-r, r).corners().to_vec()
    }
}
