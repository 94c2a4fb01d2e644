//! Axis-aligned cube spanning [-1, 1] on every axis in object space.

use crate::{Aabb, LocalHit, Primitive, Ray, RenderResult, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cube;

/// Face normals in tie-break order.
const FACES: [Vec3; 6] = [
    Vec3::NEG_X,
    Vec3::X,
    Vec3::NEG_Y,
    Vec3::Y,
    Vec3::NEG_Z,
    Vec3::Z,
];

impl Cube {
    /// Face whose plane lies nearest `p`. Earlier faces win ties.
    fn nearest_face(p: Vec3) -> usize {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (i, n) in FACES.iter().enumerate() {
            // Plane of face i is n·p = 1
            let distance = (n.dot(p) - 1.0).abs();
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        best
    }

    /// Hit point projected onto its face.
    fn face_uvw(face: usize, p: Vec3) -> Vec3 {
        match face {
            0 => Vec3::new(-1.0, p.z, p.y),
            1 => Vec3::new(1.0, p.z, p.y),
            2 => Vec3::new(p.x, -1.0, p.z),
            3 => Vec3::new(p.x, 1.0, p.z),
            4 => Vec3::new(p.x, p.y, -1.0),
            _ => Vec3::new(p.x, p.y, 1.0),
        }
    }
}

impl Primitive for Cube {
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (-1.0 - ray.origin[axis]) * inv_d;
            let mut t1 = (1.0 - ray.origin[axis]) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t_min > t1 || t0 > t_max {
                return Ok(None);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }

        let t = if t_min > 0.0 { t_min } else { t_max };
        if t <= 0.0 {
            return Ok(None);
        }

        let point = ray.at(t);
        let face = Self::nearest_face(point);
        Ok(Some(LocalHit {
            t,
            point,
            normal: FACES[face],
            uvw: Self::face_uvw(face, point),
        }))
    }

    fn bound_points(&self) -> Vec<Vec3> {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE).corners().to_vec()
    }
}
