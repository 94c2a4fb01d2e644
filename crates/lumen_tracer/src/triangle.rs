//! Single triangle with vertices given in object space.

use crate::{LocalHit, Primitive, Ray, RenderResult, Vec3};

/// Margin around the flat bounding box so the slab test never sees a
/// zero-thickness box.
const BOUNDS_PADDING: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Vec3; 3],
    plane_normal: Vec3,
    plane_offset: f32,
}

impl Triangle {
    /// Counter-clockwise vertices give a normal facing the viewer.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let plane_normal = (v1 - v0).cross(v2 - v0).normalize();
        Self {
            vertices: [v0, v1, v2],
            plane_normal,
            plane_offset: plane_normal.dot(v0),
        }
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.plane_normal
    }
}

impl Primitive for Triangle {
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>> {
        let n = self.plane_normal;
        let denom = ray.direction.dot(n);
        if denom == 0.0 {
            return Ok(None);
        }

        let t = (self.plane_offset - ray.origin.dot(n)) / denom;
        if t < 0.0 {
            return Ok(None);
        }

        let p = ray.at(t);
        let [v0, v1, v2] = self.vertices;

        // Signed sub-triangle areas; all must agree with the face normal
        let w0 = n.dot((v2 - v1).cross(p - v1));
        let w1 = n.dot((v0 - v2).cross(p - v2));
        let w2 = n.dot((v1 - v0).cross(p - v0));
        if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
            return Ok(None);
        }

        let area = w0 + w1 + w2;
        let barycentric = if area > 0.0 {
            Vec3::new(w0, w1, w2) / area
        } else {
            Vec3::ZERO
        };

        Ok(Some(LocalHit {
            t,
            point: p,
            normal: n,
            uvw: barycentric,
        }))
    }

    fn bound_points(&self) -> Vec<Vec3> {
        self.vertices.to_vec()
    }

    fn bounds_padding(&self) -> f32 {
        BOUNDS_PADDING
    }
}
