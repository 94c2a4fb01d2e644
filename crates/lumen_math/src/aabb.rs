use crate::{Ray, Vec3};

/// Axis-aligned bounding box used as a cheap reject test before the
/// analytic shape intersection.
///
/// Stored as min/max corners; `origin()` and `size()` give the
/// corner-plus-extent view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from its minimum corner and extent.
    pub fn from_origin_size(origin: Vec3, size: Vec3) -> Self {
        Self::from_points(origin, origin + size)
    }

    /// Smallest box enclosing every point of the iterator.
    ///
    /// Returns `None` for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Minimum corner.
    pub fn origin(&self) -> Vec3 {
        self.min
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box by `delta` on every side.
    pub fn pad(&self, delta: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(delta),
            max: self.max + Vec3::splat(delta),
        }
    }

    /// Test if a ray intersects this AABB in front of its origin.
    ///
    /// Uses the slab method. Zero direction components produce infinite
    /// slab bounds, which reject rays outside the slab and accept rays
    /// inside it.
    pub fn hit(&self, r: &Ray) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let inv_d = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max < t_min {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_origin_size(Vec3::splat(-1.0), Vec3::splat(2.0))
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max, Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_origin_size() {
        let aabb = unit_box();
        assert_eq!(aabb.origin(), Vec3::splat(-1.0));
        assert_eq!(aabb.size(), Vec3::splat(2.0));
    }

    #[test]
    fn test_aabb_enclosing() {
        let aabb = Aabb::enclosing([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_aabb_miss_outside_slab() {
        // Passes above the box, parallel to the x axis
        let ray = Ray::new(Vec3::new(10.0, 2.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(!unit_box().hit(&ray));
    }

    #[test]
    fn test_aabb_hit_through_center() {
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(unit_box().hit(&ray));
    }

    #[test]
    fn test_aabb_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!unit_box().hit(&ray));
    }

    #[test]
    fn test_aabb_origin_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.2, 1.0));
        assert!(unit_box().hit(&ray));
    }

    #[test]
    fn test_aabb_pad() {
        let padded = unit_box().pad(0.5);
        assert_eq!(padded.size(), Vec3::splat(3.0));
    }
}
