// Transform utilities for Mat4
//
// glam already separates transform_point3 (w=1) from transform_vector3
// (w=0); this adds normals and bounds for moving between object and
// world space.

use glam::{Mat3, Mat4, Vec3};
use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse-transpose of the upper 3x3, the matrix that carries normals.
    fn normal_matrix(&self) -> Mat3;

    /// Transform a normal by the inverse-transpose and renormalize.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;

    /// Bounding box of a set of object-space points after transformation.
    fn transform_bounds(&self, points: &[Vec3]) -> Option<Aabb>;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }

    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        (self.normal_matrix() * normal).normalize()
    }

    fn transform_bounds(&self, points: &[Vec3]) -> Option<Aabb> {
        Aabb::enclosing(points.iter().map(|&p| self.transform_point3(p)))
    }
}

/// The eight corners of the box spanned by `min` and `max`.
pub(crate) fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

impl Aabb {
    /// Corners of this box, useful for re-bounding under a transform.
    pub fn corners(&self) -> [Vec3; 8] {
        box_corners(self.min, self.max)
    }
}
