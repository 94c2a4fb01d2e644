//! Capped cylinder around the object-space Y axis.
//!
//! The hit interval is the overlap of two intervals: where the ray is
//! inside the infinite cylinder `x^2 + z^2 <= r^2`, and where it is
//! between the cap planes `y = +/-h/2`. Entry is the later of the two
//! entries, exit the earlier of the two exits. Whichever interval
//! supplied the chosen bound decides between a cap and a side normal.

use crate::{Aabb, LocalHit, Primitive, Ray, RenderError, RenderResult, Vec3};

/// Slack allowed on the cap planes before a hit counts as corrupt.
const CAP_TOLERANCE: f32 = 1e-4;

const PARALLEL_EPSILON: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub height: f32,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
        }
    }
}

impl Cylinder {
    fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Parameter interval inside the infinite side surface.
    fn side_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (o, d) = (ray.origin, ray.direction);
        let a = d.x * d.x + d.z * d.z;
        let c = o.x * o.x + o.z * o.z - self.radius * self.radius;

        if a < PARALLEL_EPSILON {
            // Running along the axis: inside for all t or never
            return (c <= 0.0).then_some((f32::NEG_INFINITY, f32::INFINITY));
        }

        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();
        Some(((-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)))
    }

    /// Parameter interval between the two cap planes.
    fn cap_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let half = self.half_height();
        let (oy, dy) = (ray.origin.y, ray.direction.y);

        if dy.abs() < PARALLEL_EPSILON {
            return (oy.abs() <= half).then_some((f32::NEG_INFINITY, f32::INFINITY));
        }

        let t3 = (-half - oy) / dy;
        let t4 = (half - oy) / dy;
        Some((t3.min(t4), t3.max(t4)))
    }
}

impl Primitive for Cylinder {
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>> {
        let Some((side_in, side_out)) = self.side_interval(ray) else {
            return Ok(None);
        };
        let Some((cap_in, cap_out)) = self.cap_interval(ray) else {
            return Ok(None);
        };

        let t_enter = side_in.max(cap_in);
        let t_exit = side_out.min(cap_out);
        if t_enter > t_exit {
            return Ok(None);
        }

        let (t, on_cap) = if t_enter > 0.0 {
            (t_enter, cap_in > side_in)
        } else if t_exit > 0.0 {
            (t_exit, cap_out < side_out)
        } else {
            return Ok(None);
        };

        let point = ray.at(t);
        let half = self.half_height();
        if point.y.abs() > half + CAP_TOLERANCE {
            return Err(RenderError::CylinderInvariant {
                y: point.y,
                half_height: half,
            });
        }

        let normal = if on_cap {
            Vec3::new(0.0, point.y.signum(), 0.0)
        } else {
            Vec3::new(point.x, 0.0, point.z)
        };

        Ok(Some(LocalHit {
            t,
            point,
            normal,
            uvw: point,
        }))
    }

    fn bound_points(&self) -> Vec<Vec3> {
        let extent = Vec3::new(self.radius, self.half_height(), self.radius);
        Aabb::from_points(-extent, extent).corners().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn test_cylinder_top_cap() {
        let cylinder = Shape::cylinder();
        let ray = Ray::new(Vec3::new(10.0, 11.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        let hit = cylinder.intersect(&ray, true).unwrap();

        assert!((hit.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_cylinder_bottom_cap() {
        let cylinder = Shape::cylinder();
        let ray = Ray::new(Vec3::new(10.0, -11.0, 0.0), Vec3::new(-1.0, 1.0, 0.0));
        let hit = cylinder.intersect(&ray, true).unwrap();

        assert!((hit.position - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_cylinder_side() {
        let cylinder = Shape::cylinder();
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = cylinder.intersect(&ray, true).unwrap();

        assert!((hit.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::X).length() < 1e-5);
        assert!((hit.hit_distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_cylinder_along_axis() {
        let ray = Ray::new(Vec3::new(0.5, 10.0, 0.0), Vec3::NEG_Y);
        let hit = Cylinder::default().intersect_local(&ray).unwrap().unwrap();
        assert!((hit.t - 9.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);

        let outside = Ray::new(Vec3::new(1.5, 10.0, 0.0), Vec3::NEG_Y);
        assert!(Cylinder::default().intersect_local(&outside).unwrap().is_none());
    }

    #[test]
    fn test_cylinder_passes_over_top() {
        let ray = Ray::new(Vec3::new(10.0, 1.5, 0.0), Vec3::NEG_X);
        assert!(Cylinder::default().intersect_local(&ray).unwrap().is_none());
    }

    #[test]
    fn test_cylinder_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = Cylinder::default().intersect_local(&ray).unwrap().unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_cylinder_scaled_height() {
        let mut cylinder = Shape::cylinder();
        cylinder.scale(Vec3::new(1.0, 3.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let hit = cylinder.intersect(&ray, true).unwrap();

        assert!((hit.position - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-4);
        assert!((hit.hit_distance - 7.0).abs() < 1e-4);
    }
}
